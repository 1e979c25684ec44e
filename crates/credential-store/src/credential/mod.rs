//! Credential identity and secret value types

mod types;

pub use types::*;
