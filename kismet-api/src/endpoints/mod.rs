//! API endpoint modules organized by category.
//!
//! Each module adds methods to [`KismetClient`](crate::client::KismetClient)
//! for a group of related server endpoints.

pub mod datasources;
pub mod devices;
pub mod gps;
pub mod phy80211;
pub mod system;
