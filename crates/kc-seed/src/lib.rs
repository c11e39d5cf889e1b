//! # kc-seed
//!
//! Bulk user provisioning for Keycloak realms.
//!
//! This crate provides:
//! - Admin authentication via the password grant
//! - Idempotent realm creation
//! - Deterministic synthetic user records
//! - A concurrent batch executor that refreshes an expired admin token
//!   and stops at the first unrecoverable error

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod realm;
pub mod seed;
pub mod token;
pub mod user;

#[cfg(test)]
mod testing;

pub use batch::{run_batch, BatchReport};
pub use cli::Cli;
pub use client::{AdminApi, AdminClient, CreateUserResponse};
pub use config::{RawConfig, SeedConfig};
pub use error::{SeedError, SeedResult};
pub use realm::{ensure_realm, RealmStatus};
pub use seed::{seed, SeedOptions};
pub use token::{AccessToken, TokenCell};
pub use user::{build_user, UserRecord};
