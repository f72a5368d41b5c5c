//! Remote settlement store. Only present when an endpoint is configured.

pub mod config;
pub mod settlement_repository;

pub use config::RemoteConfig;
pub use settlement_repository::{RemoteError, RemoteSettlementRepository};
