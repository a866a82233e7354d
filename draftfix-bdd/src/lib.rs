//! BDD harness (cucumber-rs).
//!
//! Scenarios live in `features/` and run through `tests/cucumber.rs`; this crate keeps them
//! isolated from the production crates.
