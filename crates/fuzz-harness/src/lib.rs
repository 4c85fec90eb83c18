//! Coverage Fuzz Harness
//!
//! Reusable property-based testing infrastructure for the coverage workspace.
//! Provides coordinate, area, RF-parameter and tower strategies.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(area in geo_area()) {
//!         prop_assert!(area.validate().is_ok());
//!     }
//! }
//! ```

pub mod generators;

pub mod prelude {
    pub use crate::generators::*;
    pub use crate::fuzz_config;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;

use proptest::test_runner::Config as ProptestConfig;

/// Default number of cases per property
pub const DEFAULT_CASES: u32 = 64;

/// Proptest configuration; `FUZZ_CASES` overrides the case count
pub fn fuzz_config() -> ProptestConfig {
    let cases = std::env::var("FUZZ_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CASES);
    ProptestConfig::with_cases(cases)
}
