//! Cryptographic primitives for request verification.

pub mod digest;
pub mod freshness;
pub mod verify;
