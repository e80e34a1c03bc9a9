//! Test helpers shared across Strata crates.

pub mod fixtures;

pub use fixtures::{fixture_dir, write_fixture};
