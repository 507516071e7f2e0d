//! Client for The Things Network v3 API
//!
//! Wraps the HTTP resource collections (applications, devices, gateways,
//! stored uplink messages) and the live uplink websocket stream behind typed
//! operations. The client holds no state beyond its configuration: every read
//! goes to the remote service and responses are returned as sent.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod stream;

pub use client::{Health, HealthReport, TtnClient};
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{Result, TtnError};
