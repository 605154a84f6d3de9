//! Per-tenant schema discovery cache.
//!
//! Field sets are inferred from the keys of one representative record
//! returned by a 1-row probe query. The result is a sample, not a complete
//! schema: a sparse record omits normally-present-but-null fields, and
//! queries naming those fields are rejected until the next refresh picks a
//! denser sample. Changing that (multi-record sampling, static fallback
//! schemas) changes observable validation behavior and needs a product
//! decision first.
//!
//! Concurrency: this is a read-through cache with no deduplication of
//! concurrent refreshes. The lock is dropped before the probe await, so two
//! stale readers may both probe and both write; the last writer wins. The
//! schema is eventually-consistent metadata, and single-flighting would
//! change latency under load, so the race stays.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::client::{OslcClient, QueryArgs};
use crate::core::error::Result;

/// Bound on cached (tenant, resource type) entries.
const MAX_ENTRIES: usize = 256;

/// Discovered field set for one (tenant, resource type) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaShape {
    /// Resource type the shape was sampled from.
    pub resource_type: String,
    /// Sorted field names of the sampled record.
    pub fields: Vec<String>,
    /// Discovery timestamp, epoch milliseconds.
    pub discovered_at: i64,
}

struct CacheEntry {
    shape: SchemaShape,
    last_used: i64,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn cache_key(tenant_id: &str, resource_type: &str) -> String {
    format!("{tenant_id}::{resource_type}")
}

/// Drop oldest-used entries until the map fits its capacity.
fn evict_to_capacity(entries: &mut HashMap<String, CacheEntry>, max_entries: usize) {
    while entries.len() > max_entries {
        let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone())
        else {
            return;
        };
        debug!("schema cache evicting {oldest}");
        entries.remove(&oldest);
    }
}

/// Process-wide cache of discovered schema shapes.
pub struct SchemaCache {
    default_ttl_seconds: u64,
    max_entries: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SchemaCache {
    /// Create a cache with the process-default TTL.
    pub fn new(default_ttl_seconds: u64) -> Self {
        Self::with_capacity(default_ttl_seconds, MAX_ENTRIES)
    }

    /// Create a cache with an explicit entry bound.
    pub fn with_capacity(default_ttl_seconds: u64, max_entries: usize) -> Self {
        Self {
            default_ttl_seconds,
            max_entries,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the shape for `(tenant_id, resource_type)`, probing the remote
    /// system when the cached entry is stale or absent.
    ///
    /// `ttl_seconds` is the tenant-level override; the process default
    /// applies when it is `None`. A fresh entry (age strictly below the TTL)
    /// is returned without any remote call.
    pub async fn get_shape(
        &self,
        tenant_id: &str,
        resource_type: &str,
        client: &OslcClient,
        ttl_seconds: Option<u64>,
    ) -> Result<SchemaShape> {
        let ttl_ms = ttl_seconds.unwrap_or(self.default_ttl_seconds).saturating_mul(1000) as i64;
        let key = cache_key(tenant_id, resource_type);

        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(&key) {
                let now = now_ms();
                if now - entry.shape.discovered_at < ttl_ms {
                    entry.last_used = now;
                    return Ok(entry.shape.clone());
                }
            }
        }

        // Discovery deliberately sends no filter: the native query parser
        // rejects always-true filter idioms.
        let page = client
            .query(
                resource_type,
                &QueryArgs {
                    where_clause: None,
                    select: "*".to_string(),
                    order_by: None,
                    page_size: 1,
                    start: 0,
                },
            )
            .await?;

        let mut fields: Vec<String> = page
            .items
            .first()
            .and_then(Value::as_object)
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default();
        fields.sort();

        let now = now_ms();
        let shape = SchemaShape {
            resource_type: resource_type.to_string(),
            fields,
            discovered_at: now,
        };

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                shape: shape.clone(),
                last_used: now,
            },
        );
        evict_to_capacity(&mut entries, self.max_entries);
        Ok(shape)
    }

    /// Pre-populate an entry, bypassing discovery. Test hook.
    #[cfg(test)]
    pub(crate) async fn seed(&self, tenant_id: &str, shape: SchemaShape) {
        let mut entries = self.entries.write().await;
        let now = now_ms();
        entries.insert(
            cache_key(tenant_id, &shape.resource_type),
            CacheEntry {
                shape,
                last_used: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tenants::model::api_key_tenant;

    /// Client whose base URL refuses connections: any probe fails loudly.
    fn unroutable_client() -> OslcClient {
        let mut tenant = api_key_tenant("t1");
        tenant.base_url = "http://127.0.0.1:1".to_string();
        OslcClient::new(tenant, reqwest::Client::new())
    }

    #[tokio::test]
    async fn fresh_entry_short_circuits_without_probe() {
        let cache = SchemaCache::new(60);
        cache
            .seed(
                "t1",
                SchemaShape {
                    resource_type: "mxasset".to_string(),
                    fields: vec!["assetnum".to_string(), "status".to_string()],
                    discovered_at: now_ms() - 30_000,
                },
            )
            .await;

        // The client cannot reach anything; success proves no probe ran.
        let shape = cache
            .get_shape("t1", "mxasset", &unroutable_client(), Some(60))
            .await
            .unwrap();
        assert_eq!(shape.fields, vec!["assetnum", "status"]);
    }

    #[tokio::test]
    async fn stale_entry_probes_once_and_restamps() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let probes = Arc::new(AtomicUsize::new(0));
        let counter = probes.clone();
        let app = axum::Router::new().route(
            "/oslc/os/{os}",
            axum::routing::get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    axum::Json(serde_json::json!({
                        "member": [{ "assetnum": "A1", "siteid": "HQ", "status": "OPERATING" }]
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut tenant = api_key_tenant("t1");
        tenant.base_url = base;
        let client = OslcClient::new(tenant, reqwest::Client::new());

        let stale_stamp = now_ms() - 61_000;
        let cache = SchemaCache::new(60);
        cache
            .seed(
                "t1",
                SchemaShape {
                    resource_type: "mxasset".to_string(),
                    fields: vec!["assetnum".to_string()],
                    discovered_at: stale_stamp,
                },
            )
            .await;

        let shape = cache
            .get_shape("t1", "mxasset", &client, Some(60))
            .await
            .unwrap();
        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert!(shape.discovered_at > stale_stamp);
        assert_eq!(shape.fields, vec!["assetnum", "siteid", "status"]);

        // The refreshed entry is fresh again: no second probe.
        cache
            .get_shape("t1", "mxasset", &client, Some(60))
            .await
            .unwrap();
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_entry_requires_refresh() {
        let cache = SchemaCache::new(60);
        cache
            .seed(
                "t1",
                SchemaShape {
                    resource_type: "mxasset".to_string(),
                    fields: vec!["assetnum".to_string()],
                    discovered_at: now_ms() - 61_000,
                },
            )
            .await;

        // Stale: the cache must attempt a probe, which fails against the
        // unroutable client instead of returning the stale entry.
        let result = cache
            .get_shape("t1", "mxasset", &unroutable_client(), Some(60))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn ttl_override_beats_process_default() {
        let cache = SchemaCache::new(3600);
        cache
            .seed(
                "t1",
                SchemaShape {
                    resource_type: "mxwo".to_string(),
                    fields: vec!["wonum".to_string()],
                    discovered_at: now_ms() - 120_000,
                },
            )
            .await;

        // Process default (1h) would keep the entry fresh, but the per-call
        // override of 60s marks it stale.
        assert!(
            cache
                .get_shape("t1", "mxwo", &unroutable_client(), Some(60))
                .await
                .is_err()
        );
        // Without the override the default applies and the entry is fresh.
        assert!(
            cache
                .get_shape("t1", "mxwo", &unroutable_client(), None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn entries_are_tenant_scoped() {
        let cache = SchemaCache::new(3600);
        cache
            .seed(
                "t1",
                SchemaShape {
                    resource_type: "mxasset".to_string(),
                    fields: vec!["assetnum".to_string()],
                    discovered_at: now_ms(),
                },
            )
            .await;

        // Same resource type under a different tenant misses.
        assert!(
            cache
                .get_shape("t2", "mxasset", &unroutable_client(), None)
                .await
                .is_err()
        );
    }

    #[test]
    fn eviction_drops_oldest_used() {
        let mut entries = HashMap::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            entries.insert(
                format!("t1::{name}"),
                CacheEntry {
                    shape: SchemaShape {
                        resource_type: (*name).to_string(),
                        fields: Vec::new(),
                        discovered_at: 0,
                    },
                    last_used: i as i64,
                },
            );
        }
        evict_to_capacity(&mut entries, 2);
        assert_eq!(entries.len(), 2);
        assert!(!entries.contains_key("t1::a"));
        assert!(entries.contains_key("t1::c"));
    }
}
