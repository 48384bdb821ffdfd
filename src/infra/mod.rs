pub mod datagov;
