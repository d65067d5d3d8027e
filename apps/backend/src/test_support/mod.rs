//! Test harness pieces shared by unit and integration tests.

pub mod app_builder;
pub mod decisions;

pub use app_builder::create_test_app_builder;
pub use decisions::{GatedDecisions, ScriptPlan, ScriptedDecisions};
