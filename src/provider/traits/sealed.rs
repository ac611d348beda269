// ABOUTME: Sealed trait pattern for provider traits.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only the providers shipped in this crate (AWS and the in-memory cloud)
/// can implement the provider traits, so methods can be added without
/// breaking downstream code.
pub trait Sealed {}
