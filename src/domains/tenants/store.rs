//! File-backed tenant store.
//!
//! The store is an explicit, injected object owned by the composition root;
//! the core never reads tenant configuration from ambient state. Reads come
//! from an in-memory snapshot loaded at startup; writes (admin surface only)
//! validate, update the snapshot, and persist the whole file atomically.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::info;

use super::model::{RedactedTenant, TenantConfig};
use crate::core::error::{GatewayError, Result};

/// Tenant configuration store.
pub struct TenantStore {
    path: PathBuf,
    tenants: RwLock<Vec<TenantConfig>>,
}

impl TenantStore {
    /// Load the store from a JSON file.
    ///
    /// The file may contain either a bare array of tenant records or an
    /// object with a `tenants` array. A missing file is not an error: the
    /// store starts empty and remembers the path for later persistence.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Tenants file {} not found, starting empty", path.display());
                return Ok(Self {
                    path,
                    tenants: RwLock::new(Vec::new()),
                });
            }
            Err(e) => {
                return Err(GatewayError::TenantsLoadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let parsed: Value =
            serde_json::from_str(&raw).map_err(|e| GatewayError::TenantsLoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let records = match parsed {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("tenants") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let mut tenants = Vec::with_capacity(records.len());
        for record in records {
            let tenant: TenantConfig = serde_json::from_value(record)
                .map_err(|e| GatewayError::TenantInvalid(e.to_string()))?;
            tenant.validate()?;
            tenants.push(tenant);
        }

        info!("Loaded {} tenant(s) from {}", tenants.len(), path.display());
        Ok(Self {
            path,
            tenants: RwLock::new(tenants),
        })
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Vec<TenantConfig>> {
        self.tenants
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Vec<TenantConfig>> {
        self.tenants
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of configured tenants.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    /// Whether the store has no tenants.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up one tenant by id.
    pub fn get(&self, tenant_id: &str) -> Option<TenantConfig> {
        self.read_guard()
            .iter()
            .find(|t| t.tenant_id == tenant_id)
            .cloned()
    }

    /// Redacted listing of all tenants.
    pub fn list(&self) -> Vec<RedactedTenant> {
        self.read_guard()
            .iter()
            .map(TenantConfig::redacted)
            .collect()
    }

    /// Insert or replace a tenant record, then persist.
    ///
    /// New tenants are prepended so recently-touched records list first.
    pub fn upsert(&self, tenant: TenantConfig) -> Result<Vec<RedactedTenant>> {
        tenant.validate()?;
        let snapshot = {
            let mut tenants = self.write_guard();
            match tenants.iter_mut().find(|t| t.tenant_id == tenant.tenant_id) {
                Some(slot) => *slot = tenant,
                None => tenants.insert(0, tenant),
            }
            tenants.clone()
        };
        self.persist(&snapshot)?;
        Ok(snapshot.iter().map(TenantConfig::redacted).collect())
    }

    /// Delete a tenant record, then persist.
    pub fn delete(&self, tenant_id: &str) -> Result<Vec<RedactedTenant>> {
        let snapshot = {
            let mut tenants = self.write_guard();
            let before = tenants.len();
            tenants.retain(|t| t.tenant_id != tenant_id);
            if tenants.len() == before {
                return Err(GatewayError::TenantNotFound {
                    tenant_id: tenant_id.to_string(),
                });
            }
            tenants.clone()
        };
        self.persist(&snapshot)?;
        Ok(snapshot.iter().map(TenantConfig::redacted).collect())
    }

    fn persist(&self, tenants: &[TenantConfig]) -> Result<()> {
        let write_err = |reason: String| GatewayError::TenantsWriteFailed {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
            }
        }
        let content =
            serde_json::to_string_pretty(tenants).map_err(|e| write_err(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| write_err(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tenants::model::api_key_tenant;

    #[test]
    fn missing_file_bootstraps_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        let store = TenantStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert!(store.get("t1").is_none());
    }

    #[test]
    fn upsert_persists_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        let store = TenantStore::load(&path).unwrap();

        store.upsert(api_key_tenant("t1")).unwrap();
        store.upsert(api_key_tenant("t2")).unwrap();
        // New tenants are prepended.
        assert_eq!(store.list()[0].tenant_id, "t2");

        let reloaded = TenantStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("t1").unwrap().tenant_id, "t1");
    }

    #[test]
    fn upsert_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenantStore::load(dir.path().join("tenants.json")).unwrap();
        store.upsert(api_key_tenant("t1")).unwrap();

        let mut updated = api_key_tenant("t1");
        updated.base_url = "https://other.example.com".to_string();
        store.upsert(updated).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("t1").unwrap().base_url, "https://other.example.com");
    }

    #[test]
    fn delete_unknown_tenant_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = TenantStore::load(dir.path().join("tenants.json")).unwrap();
        store.upsert(api_key_tenant("t1")).unwrap();

        assert!(matches!(
            store.delete("nope"),
            Err(GatewayError::TenantNotFound { .. })
        ));
        store.delete("t1").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn accepts_wrapped_tenants_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        let wrapped = serde_json::json!({
            "tenants": [serde_json::to_value(api_key_tenant("t9")).unwrap()]
        });
        std::fs::write(&path, wrapped.to_string()).unwrap();

        let store = TenantStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("t9").is_some());
    }

    #[test]
    fn invalid_record_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, r#"[{"tenantId": "", "authMode": "apiKey", "baseUrl": "https://x"}]"#)
            .unwrap();
        assert!(TenantStore::load(&path).is_err());
    }
}
