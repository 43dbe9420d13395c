//! openHAB log lookup, library crate for the `ohl-lookup` binary.
//!
//! Re-exports all modules so external crates (e.g. `ohl-e2e-tests`) can
//! drive `LookupService`, `ItemDirectory` and the renderers directly.

pub mod cli;
pub mod config;
pub mod directory;
pub mod lookup;
pub mod output;
