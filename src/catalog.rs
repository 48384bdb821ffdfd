//! Suggestion lists derived from a page of records.
//!
//! These only reflect the records passed in (normally the default page of at
//! most 100), not the full upstream catalog.

use std::collections::{BTreeSet, HashSet};

use crate::models::PriceRecord;

/// Distinct commodity names, sorted ascending.
pub fn categories(records: &[PriceRecord]) -> Vec<String> {
    sorted_distinct(records.iter().map(|r| r.commodity.as_str()))
}

/// Distinct market names, sorted ascending.
pub fn markets(records: &[PriceRecord]) -> Vec<String> {
    sorted_distinct(records.iter().map(|r| r.market.as_str()))
}

/// The first `n` distinct commodities in source order.
pub fn leading_commodities(records: &[PriceRecord], n: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.commodity.as_str()))
        .take(n)
        .map(|r| r.commodity.clone())
        .collect()
}

fn sorted_distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;

    fn page() -> Vec<PriceRecord> {
        vec![
            record("Wheat", "Rajkot", 2000.0),
            record("Cotton", "Amreli", 6500.0),
            record("Wheat", "Khanna", 2100.0),
            record("Onion", "Lasalgaon", 1200.0),
            record("Cotton", "Rajkot", 6400.0),
            record("Bajra", "Amreli", 2400.0),
        ]
    }

    fn assert_strictly_ascending(items: &[String]) {
        assert!(items.windows(2).all(|w| w[0] < w[1]), "{items:?}");
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let cats = categories(&page());
        assert_eq!(cats, vec!["Bajra", "Cotton", "Onion", "Wheat"]);
        assert_strictly_ascending(&cats);
    }

    #[test]
    fn test_markets_sorted_and_distinct() {
        let m = markets(&page());
        assert_eq!(m, vec!["Amreli", "Khanna", "Lasalgaon", "Rajkot"]);
        assert_strictly_ascending(&m);
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let m = markets(&[record("Wheat", "", 1.0)]);
        assert!(m.is_empty());
    }

    #[test]
    fn test_leading_commodities_source_order() {
        assert_eq!(leading_commodities(&page(), 3), vec!["Wheat", "Cotton", "Onion"]);
        assert_eq!(leading_commodities(&page(), 10).len(), 4);
        assert!(leading_commodities(&[], 6).is_empty());
    }
}
