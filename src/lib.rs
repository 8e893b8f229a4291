//! aba - a single-user-at-a-time command-line address book
//!
//! Each account keeps its own address-book records; an administrator
//! manages accounts and reads the audit trail but can never touch records.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and persisted settings
//! - `error`: Custom error types
//! - `crypto`: Password hashing and zeroizing secret strings
//! - `models`: Identifiers, accounts and address records
//! - `storage`: Account and record stores with atomic file writes
//! - `audit`: Security audit log
//! - `services`: Session state machine, authorization gate and operations
//! - `export`: CSV export
//! - `display`: Terminal formatting
//! - `cli`: The interactive `ABA>` prompt
//!
//! # Example
//!
//! ```rust,ignore
//! use aba::cli::{Console, Dispatcher};
//! use aba::config::{AbaPaths, Settings};
//! use aba::crypto::CredentialHasher;
//! use aba::storage::Storage;
//!
//! let paths = AbaPaths::resolve(None)?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, &settings, CredentialHasher::new())?;
//! Dispatcher::new(storage).run(&mut Console::stdio())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AbaError, AbaResult};
