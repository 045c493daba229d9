//! keepsake todo demo
//!
//! A small todo list whose state survives restarts through keepsake.

pub mod commands;
pub mod todo;

pub use commands::*;
pub use todo::*;
