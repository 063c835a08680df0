//! Content-addressed hard-link store.
//!
//! - [`layout`]: fingerprint + extension → [`StorePath`]
//! - [`placer`]: shard creation and hard-link placement

pub mod layout;
pub mod placer;

pub use layout::StorePath;
pub use placer::{PlaceError, Placement, Placer};
