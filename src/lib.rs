//! Compact query-filter language for flat records.
//!
//! `dsl` turns text such as `gold>3,fl=1,name!=head` into include and
//! exclude predicate maps; `store` applies them to an in-memory collection.

pub mod config;
pub mod dsl;
pub mod store;
