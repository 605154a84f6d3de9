//! Per-tenant authentication for outbound calls.
//!
//! Exactly one of three modes applies per tenant: a raw `apikey` header, a
//! `maxauth` header carrying base64(username:password), or an OAuth2
//! client-credentials bearer token. Credential checks happen here, before
//! any call to the remote query endpoints; the OAuth2 path fetches a fresh
//! token on every invocation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::client::body_snippet;
use crate::core::error::{GatewayError, Result};
use crate::core::secrets::resolve_secret;
use crate::domains::tenants::{AuthMode, TenantConfig};

const APIKEY_HEADER: HeaderName = HeaderName::from_static("apikey");
const MAXAUTH_HEADER: HeaderName = HeaderName::from_static("maxauth");

fn missing(tenant: &TenantConfig, detail: &str) -> GatewayError {
    GatewayError::MissingCredential {
        tenant_id: tenant.tenant_id.clone(),
        mode: tenant.auth_mode.as_str(),
        detail: detail.to_string(),
    }
}

fn header_value(tenant: &TenantConfig, value: &str) -> Result<HeaderValue> {
    let mut v = HeaderValue::from_str(value).map_err(|_| {
        GatewayError::internal(format!(
            "credential for tenant {} contains non-header-safe bytes",
            tenant.tenant_id
        ))
    })?;
    v.set_sensitive(true);
    Ok(v)
}

/// Build the headers that authorize one outbound call for this tenant.
pub async fn auth_headers(http: &reqwest::Client, tenant: &TenantConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    match tenant.auth_mode {
        AuthMode::ApiKey => {
            let key = tenant
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .or_else(|| tenant.api_key_ref.as_ref().map(resolve_secret))
                .unwrap_or_default();
            if key.is_empty() {
                return Err(missing(tenant, "apiKey or apiKeyRef not configured"));
            }
            headers.insert(APIKEY_HEADER, header_value(tenant, &key)?);
        }
        AuthMode::Maxauth => {
            let settings = tenant.maxauth.clone().unwrap_or_default();
            let username = settings
                .username
                .filter(|u| !u.is_empty())
                .or_else(|| settings.username_ref.as_ref().map(resolve_secret))
                .unwrap_or_default();
            let password = settings
                .password
                .filter(|p| !p.is_empty())
                .or_else(|| settings.password_ref.as_ref().map(resolve_secret))
                .unwrap_or_default();
            if username.is_empty() || password.is_empty() {
                return Err(missing(
                    tenant,
                    "maxauth username/password not configured",
                ));
            }
            let token = BASE64.encode(format!("{username}:{password}"));
            headers.insert(MAXAUTH_HEADER, header_value(tenant, &token)?);
        }
        AuthMode::Oauth => {
            let token = fetch_oauth_token(http, tenant).await?;
            headers.insert(AUTHORIZATION, header_value(tenant, &format!("Bearer {token}"))?);
        }
    }
    Ok(headers)
}

/// Run the client-credentials grant and return the access token.
async fn fetch_oauth_token(http: &reqwest::Client, tenant: &TenantConfig) -> Result<String> {
    let Some(oauth) = &tenant.oauth else {
        return Err(missing(tenant, "oauth settings not configured"));
    };
    let client_id = resolve_secret(&oauth.client_id_ref);
    let client_secret = resolve_secret(&oauth.client_secret_ref);
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(missing(tenant, "oauth clientId/clientSecret not configured"));
    }

    let mut form = vec![("grant_type", "client_credentials")];
    if let Some(scope) = oauth.scope.as_deref() {
        form.push(("scope", scope));
    }
    let body = serde_urlencoded::to_string(&form)
        .map_err(|e| GatewayError::internal(format!("token form encoding failed: {e}")))?;

    let basic = BASE64.encode(format!("{client_id}:{client_secret}"));
    let response = http
        .post(&oauth.token_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(AUTHORIZATION, format!("Basic {basic}"))
        .body(body)
        .send()
        .await
        .map_err(|e| {
            debug!("token endpoint unreachable: {e}");
            GatewayError::TokenRequestFailed {
                token_url: oauth.token_url.clone(),
                status: None,
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::TokenRequestFailed {
            token_url: oauth.token_url.clone(),
            status: Some(status.as_u16()),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let text = response.text().await.map_err(GatewayError::Upstream)?;
    let envelope: Value =
        serde_json::from_str(&text).map_err(|_| GatewayError::TokenParseFailed {
            status: status.as_u16(),
            content_type,
            body_snippet: body_snippet(&text, 200),
        })?;

    let access = envelope
        .get("access_token")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if access.is_empty() {
        return Err(GatewayError::TokenMissing);
    }
    Ok(access.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secrets::SecretRef;
    use crate::domains::tenants::model::api_key_tenant;
    use crate::domains::tenants::{MaxauthSettings, OauthSettings};

    #[tokio::test]
    async fn api_key_mode_emits_apikey_header() {
        let http = reqwest::Client::new();
        let tenant = api_key_tenant("t1");
        let headers = auth_headers(&http, &tenant).await.unwrap();
        assert_eq!(headers.get("apikey").unwrap(), "k-123");
    }

    #[tokio::test]
    async fn empty_api_key_fails_without_network() {
        let http = reqwest::Client::new();
        let mut tenant = api_key_tenant("t1");
        tenant.api_key = None;
        let err = auth_headers(&http, &tenant).await.unwrap_err();
        assert_eq!(err.code(), "MISSING_CREDENTIAL");
        assert!(err.to_string().contains("apiKey"));
    }

    #[tokio::test]
    async fn maxauth_mode_base64_encodes_pair() {
        let http = reqwest::Client::new();
        let mut tenant = api_key_tenant("t1");
        tenant.auth_mode = AuthMode::Maxauth;
        tenant.maxauth = Some(MaxauthSettings {
            username: Some("maxadmin".to_string()),
            password: Some("passw0rd".to_string()),
            ..Default::default()
        });
        let headers = auth_headers(&http, &tenant).await.unwrap();
        let expected = BASE64.encode("maxadmin:passw0rd");
        assert_eq!(headers.get("maxauth").unwrap(), expected.as_str());
    }

    #[tokio::test]
    async fn maxauth_missing_half_fails() {
        let http = reqwest::Client::new();
        let mut tenant = api_key_tenant("t1");
        tenant.auth_mode = AuthMode::Maxauth;
        tenant.maxauth = Some(MaxauthSettings {
            username: Some("maxadmin".to_string()),
            ..Default::default()
        });
        let err = auth_headers(&http, &tenant).await.unwrap_err();
        assert_eq!(err.code(), "MISSING_CREDENTIAL");
    }

    #[tokio::test]
    async fn oauth_with_unresolvable_refs_fails_before_token_fetch() {
        let http = reqwest::Client::new();
        let mut tenant = api_key_tenant("t1");
        tenant.auth_mode = AuthMode::Oauth;
        tenant.oauth = Some(OauthSettings {
            // Port 1 would refuse the connection; the refs resolve empty so
            // the call must fail before any request is attempted.
            token_url: "http://127.0.0.1:1/token".to_string(),
            client_id_ref: SecretRef::Env {
                name: "GATEWAY_TEST_UNSET_CLIENT_ID".to_string(),
            },
            client_secret_ref: SecretRef::Env {
                name: "GATEWAY_TEST_UNSET_CLIENT_SECRET".to_string(),
            },
            scope: None,
        });
        let err = auth_headers(&http, &tenant).await.unwrap_err();
        assert_eq!(err.code(), "MISSING_CREDENTIAL");
    }
}
