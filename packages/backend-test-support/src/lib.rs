//! Backend test support utilities
//!
//! Shared by the engine's integration tests: one-time logging setup and
//! Problem Details assertions that do not depend on engine types.

pub mod logging;
pub mod problem_details;
