//! keepsake Core Library
//! 
//! Core types, traits, and abstractions shared by the keepsake persistence layer.
//! This crate provides the vocabulary: identifiers, capability traits, errors and settings.

pub mod types;
pub mod traits;
pub mod error;
pub mod config;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use config::*;
