//! Remote service access.
//!
//! Splits the MemoryDB surface into the [`MemoryDb`] call trait and the
//! plain description types its calls return.

mod client;
mod types;

pub use client::{MemoryDb, SdkMemoryDb};
pub use types::{AclDescription, ClusterDescription, Page, SubnetGroupDescription, UserDescription};

#[cfg(test)]
pub(crate) use client::MockMemoryDb;
