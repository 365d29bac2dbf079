//! Shared utilities.
//!
//! This module provides:
//! - Header text sanitization for hand-built requests

pub mod sanitize;

pub use sanitize::{sanitize_header_name, sanitize_header_value};
