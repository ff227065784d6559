//! End-to-end tests against mock catalogs

mod error_scenarios;
mod pipeline_test;
