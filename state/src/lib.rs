//! keepsake State Persistence
//! 
//! Restores, migrates and saves reducer state as versioned JSON snapshots.
//! Layout: `{base}/{state_id}/version.json` and `{base}/{state_id}/{version}/{state_id}.json`

pub mod layout;
pub mod codec;
pub mod config;
pub mod snapshot;
pub mod marker;
pub mod migration;
pub mod reducer;
pub mod store;

pub use layout::*;
pub use codec::*;
pub use config::*;
pub use snapshot::*;
pub use marker::*;
pub use migration::*;
pub use reducer::*;
pub use store::*;
