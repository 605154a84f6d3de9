//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the gateway:
//! configuration, the unified error type, secret resolution, and the
//! transport layer.

pub mod config;
pub mod error;
pub mod secrets;
pub mod transport;

pub use config::AppConfig;
pub use error::{GatewayError, Result};
pub use secrets::{SecretRef, resolve_secret};
