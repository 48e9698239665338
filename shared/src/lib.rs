//! Shared types and logic for the N2K logistics booking system
//!
//! Used by the backend server and, through WASM, by the booking pages.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
