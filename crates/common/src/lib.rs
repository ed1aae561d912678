//! fortiform common library
//!
//! Shared value types and errors for the fortiform provider.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ClientError, Error, Operation, Result};
pub use types::*;
