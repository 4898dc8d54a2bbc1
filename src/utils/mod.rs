//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_check`] - Target URL acceptance rules

pub mod code_generator;
pub mod url_check;
