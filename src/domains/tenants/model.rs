//! Tenant configuration records.
//!
//! A tenant binds a remote system base URL to one of three mutually
//! exclusive authentication modes plus optional query defaults. Records are
//! validated on the way into the store; credential material is only checked
//! at call time by the auth layer, so a record may legally reference secrets
//! that do not resolve yet.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::error::{GatewayError, Result};
use crate::core::secrets::SecretRef;

/// Authentication mode for outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    /// OAuth2 client-credentials grant against a token endpoint.
    Oauth,
    /// Single `apikey` header.
    ApiKey,
    /// Single `maxauth` header carrying base64(username:password).
    Maxauth,
}

impl AuthMode {
    /// Wire name of the mode, used in error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oauth => "oauth",
            Self::ApiKey => "apiKey",
            Self::Maxauth => "maxauth",
        }
    }
}

/// Per-tenant query defaults for the native OSLC dialect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OslcOptions {
    /// Filter substituted when a query translates to an empty conjunction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_default: Option<String>,

    /// Default page size (1-200).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// OAuth2 client-credentials settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OauthSettings {
    /// Token endpoint URL.
    pub token_url: String,
    /// Reference to the client id.
    pub client_id_ref: SecretRef,
    /// Reference to the client secret.
    pub client_secret_ref: SecretRef,
    /// Optional scope sent with the grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Basic-credential settings for the `maxauth` header.
///
/// Either inline values or secret references; references win at resolution
/// time only when the inline value is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaxauthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_ref: Option<SecretRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_ref: Option<SecretRef>,
}

/// One tenant's configuration record, as stored and as accepted over the
/// admin surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Unique, stable tenant identity.
    pub tenant_id: String,

    /// Which auth mode authorizes outbound calls.
    pub auth_mode: AuthMode,

    /// Base URL of the remote system.
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Native-dialect defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oslc: Option<OslcOptions>,

    /// Per-tenant schema-discovery TTL override in seconds (>= 30).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_ttl_seconds: Option<u64>,

    /// Inline API key (apiKey mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Referenced API key (apiKey mode); inline value wins when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_ref: Option<SecretRef>,

    /// OAuth2 settings (oauth mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OauthSettings>,

    /// Basic-credential settings (maxauth mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxauth: Option<MaxauthSettings>,

    /// Explicit allowlist of resource-type names to expose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<String>>,
}

/// Minimum accepted per-tenant schema TTL.
pub const MIN_METADATA_TTL_SECONDS: u64 = 30;

impl TenantConfig {
    /// Validate the structural invariants of a record.
    ///
    /// Credential material is deliberately not resolved here; a record may
    /// reference secrets that only exist in the serving environment.
    pub fn validate(&self) -> Result<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(GatewayError::TenantInvalid(
                "tenantId must be non-empty".to_string(),
            ));
        }
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(GatewayError::TenantInvalid(format!(
                "baseUrl is not a valid URL: {}",
                self.base_url
            )));
        }
        if let Some(ttl) = self.metadata_ttl_seconds {
            if ttl < MIN_METADATA_TTL_SECONDS {
                return Err(GatewayError::TenantInvalid(format!(
                    "metadataTtlSeconds must be >= {MIN_METADATA_TTL_SECONDS}"
                )));
            }
        }
        if let Some(oslc) = &self.oslc {
            if let Some(size) = oslc.page_size {
                if !(1..=200).contains(&size) {
                    return Err(GatewayError::TenantInvalid(
                        "oslc.pageSize must be within 1..=200".to_string(),
                    ));
                }
            }
        }
        match self.auth_mode {
            AuthMode::Oauth => {
                let Some(oauth) = &self.oauth else {
                    return Err(GatewayError::TenantInvalid(
                        "oauth settings required for authMode=oauth".to_string(),
                    ));
                };
                if reqwest::Url::parse(&oauth.token_url).is_err() {
                    return Err(GatewayError::TenantInvalid(format!(
                        "oauth.tokenUrl is not a valid URL: {}",
                        oauth.token_url
                    )));
                }
            }
            AuthMode::ApiKey | AuthMode::Maxauth => {}
        }
        Ok(())
    }

    /// Redacted view for listings: identity and non-secret fields plus
    /// credential references, never resolved secret values.
    pub fn redacted(&self) -> RedactedTenant {
        RedactedTenant {
            tenant_id: self.tenant_id.clone(),
            auth_mode: self.auth_mode,
            base_url: self.base_url.clone(),
            org: self.org.clone(),
            site: self.site.clone(),
            oslc: self.oslc.clone(),
            metadata_ttl_seconds: self.metadata_ttl_seconds,
            resource_types: self.resource_types.clone(),
            api_key_ref: self.api_key_ref.clone(),
        }
    }
}

/// Public projection of a tenant record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedactedTenant {
    pub tenant_id: String,
    pub auth_mode: AuthMode,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oslc: Option<OslcOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_ttl_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<String>>,
    // Safe to expose: this is a reference, not the secret itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_ref: Option<SecretRef>,
}

/// Test fixture: a minimal apiKey-mode tenant.
#[cfg(test)]
pub(crate) fn api_key_tenant(id: &str) -> TenantConfig {
    TenantConfig {
        tenant_id: id.to_string(),
        auth_mode: AuthMode::ApiKey,
        base_url: "https://eam.example.com/api".to_string(),
        org: None,
        site: None,
        oslc: None,
        metadata_ttl_seconds: None,
        api_key: Some("k-123".to_string()),
        api_key_ref: None,
        oauth: None,
        maxauth: None,
        resource_types: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_is_camel_case() {
        let t: TenantConfig = serde_json::from_value(json!({
            "tenantId": "t1",
            "authMode": "apiKey",
            "baseUrl": "https://host/maximo",
            "metadataTtlSeconds": 60,
            "oslc": { "whereDefault": "status!='X'", "pageSize": 25 },
            "resourceTypes": ["mxasset"]
        }))
        .unwrap();
        assert_eq!(t.tenant_id, "t1");
        assert_eq!(t.auth_mode, AuthMode::ApiKey);
        assert_eq!(t.metadata_ttl_seconds, Some(60));
        assert_eq!(t.oslc.as_ref().unwrap().page_size, Some(25));
        t.validate().unwrap();
    }

    #[test]
    fn ttl_below_minimum_is_rejected() {
        let mut t = api_key_tenant("t1");
        t.metadata_ttl_seconds = Some(10);
        assert!(matches!(
            t.validate(),
            Err(GatewayError::TenantInvalid(_))
        ));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut t = api_key_tenant("t1");
        t.base_url = "not a url".to_string();
        assert!(t.validate().is_err());
    }

    #[test]
    fn oauth_mode_requires_settings() {
        let mut t = api_key_tenant("t1");
        t.auth_mode = AuthMode::Oauth;
        assert!(t.validate().is_err());

        t.oauth = Some(OauthSettings {
            token_url: "https://auth.example.com/token".to_string(),
            client_id_ref: SecretRef::Env {
                name: "CID".to_string(),
            },
            client_secret_ref: SecretRef::Env {
                name: "CSEC".to_string(),
            },
            scope: None,
        });
        t.validate().unwrap();
    }

    #[test]
    fn redaction_never_leaks_secret_material() {
        let mut t = api_key_tenant("t1");
        t.maxauth = Some(MaxauthSettings {
            username: Some("admin".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        });
        let redacted = serde_json::to_string(&t.redacted()).unwrap();
        assert!(!redacted.contains("k-123"));
        assert!(!redacted.contains("hunter2"));
        assert!(!redacted.contains("admin"));
        assert!(redacted.contains("\"tenantId\":\"t1\""));
    }
}
