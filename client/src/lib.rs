//! # Acres Client
//!
//! Remote sync gateway and application state for the Acres real-estate CRM.
//!
//! The remote store is a spreadsheet-backed web endpoint; this crate owns the
//! wire contract ([`RemoteGateway`]) and the local snapshot of its data
//! ([`AppClient`]). All domain logic lives in `acres-engine` and operates on
//! the store this crate keeps in sync.
//!
//! The sync model is deliberately simple: mutations write one full record
//! through the gateway and are followed by a full reload, so the local store
//! always mirrors exactly what the remote returned last. There is no
//! incremental patching and no offline queue.

pub mod app;
pub mod config;
pub mod error;
pub mod gateway;

pub use app::AppClient;
pub use config::{Config, ConfigError};
pub use error::{ClientError, GatewayError, Result};
pub use gateway::{EntityType, Environment, RemoteGateway};
