//! Accessor types generated from the schemas in `schemas/`.
//!
//! ```
//! use std::collections::HashMap;
//! use paramspec_demos::SearchParams;
//!
//! let mut query = HashMap::new();
//! query.insert("query".to_string(), "rust".to_string());
//! let params = SearchParams::from_lookup(&query).unwrap();
//! assert_eq!(params.query(), "rust");
//! assert_eq!(params.limit(), 10);
//! ```

include!(concat!(env!("OUT_DIR"), "/params.rs"));
