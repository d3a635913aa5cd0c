//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestDataset;
//!
//! #[test]
//! fn test_load() {
//!     let dataset = TestDataset::create().unwrap();
//!     let summary = sparkify_etl::run_etl(&dataset.config()).unwrap();
//!     assert_eq!(summary.failed_files(), 0);
//! }
//! ```

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::{count, TestDataset};
