//! Tenants domain: configuration records and their backing store.

pub mod model;
pub mod store;

pub use model::{AuthMode, MaxauthSettings, OauthSettings, OslcOptions, RedactedTenant, TenantConfig};
pub use store::TenantStore;
