// ABOUTME: Composable capability traits for cloud providers.
// ABOUTME: Defines ObjectStore, DistributionOps, DnsOps and the combined CloudProvider.

mod distribution;
mod dns;
mod object_store;
pub(crate) mod sealed;
mod shared_types;

pub use distribution::{CdnError, DistributionOps};
pub use dns::{DnsError, DnsOps};
pub use object_store::{ObjectStore, StoreError};
pub use shared_types::*;

/// Every capability a deployment run needs.
///
/// Implemented automatically for any type providing all three traits.
pub trait CloudProvider: ObjectStore + DistributionOps + DnsOps {}

impl<T: ObjectStore + DistributionOps + DnsOps> CloudProvider for T {}
