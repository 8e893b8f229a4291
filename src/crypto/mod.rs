//! Cryptographic functions for the address book
//!
//! Provides salted Argon2id password digests and a zeroizing string for
//! secrets entered at the prompt.

pub mod hasher;
pub mod secure_memory;

pub use hasher::{CredentialHasher, HashCost};
pub use secure_memory::SecureString;
