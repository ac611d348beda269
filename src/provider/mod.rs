// ABOUTME: Cloud provider abstraction for origins, distributions and DNS.
// ABOUTME: Ships an AWS implementation and an in-memory cloud used by tests.

pub mod aws;
mod error;
pub mod memory;
pub mod traits;

pub use aws::{AwsProvider, connect};
pub use error::ConnectError;
pub use memory::{MemoryCloud, Operation};
pub use traits::*;
