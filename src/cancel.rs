//! Cancellation scoped to the lifetime of whatever view started a request.
//!
//! A [`CancelScope`] is owned by the view. Every call made on its behalf takes
//! a [`CancelToken`]. Cancelling the scope, or dropping it, resolves all
//! outstanding tokens so late results are discarded instead of written back.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::FetchError;

#[derive(Debug)]
pub struct CancelScope {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    _owner: Option<Arc<watch::Sender<bool>>>,
}

impl CancelScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
            _owner: None,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelToken {
    /// A token that is never cancelled, for callers without a view.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            rx,
            _owner: Some(Arc::new(tx)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Runs `fut` unless the scope goes away first.
    ///
    /// A result that arrives after cancellation is dropped and
    /// [`FetchError::Cancelled`] is returned in its place.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let mut token = self.clone();
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(FetchError::Cancelled),
            r = fut => r,
        };

        if self.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_completes_when_not_cancelled() {
        let scope = CancelScope::new();
        let token = scope.token();

        let result = token.run(async { Ok::<_, FetchError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_result() {
        let scope = CancelScope::new();
        let token = scope.token();

        let handle = tokio::spawn(async move {
            token
                .run(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok::<_, FetchError>(1)
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        scope.cancel();

        let result = handle.await.unwrap();
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_dropping_scope_cancels_tokens() {
        let scope = CancelScope::new();
        let token = scope.token();
        assert!(!token.is_cancelled());

        drop(scope);
        assert!(token.is_cancelled());
        let result = token.run(async { Ok::<_, FetchError>(()) }).await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_never_token_runs() {
        let token = CancelToken::never();
        assert!(!token.is_cancelled());
        assert_eq!(token.run(async { Ok::<_, FetchError>("ok") }).await.unwrap(), "ok");
    }
}
