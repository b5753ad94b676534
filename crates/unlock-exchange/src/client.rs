use crate::{classify_unlock_response, ClearPolicy, ExchangeResult, UnlockRequestResult};
use account_auth::AuthSession;
use async_trait::async_trait;
use fastboot_ops::DeviceFacts;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

const CLIENT_ID: &str = "2";
const APP_ID: &str = "1";

/// Seam between the workflow and the unlock service.
#[async_trait]
pub trait UnlockService: Send + Sync {
    /// Look up whether unlocking `product` wipes user data.
    ///
    /// Never fails: any error is reported as [`ClearPolicy::Unknown`].
    async fn check_clear_policy(&self, product: &str) -> ClearPolicy;

    /// Exchange device facts and a session for an unlock credential.
    async fn request_unlock_credential(
        &self,
        facts: &DeviceFacts,
        session: &AuthSession,
    ) -> ExchangeResult<UnlockRequestResult>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRequest<T: Serialize> {
    app_id: &'static str,
    data: T,
}

#[derive(Debug, Serialize)]
struct ClearRequest<'a> {
    product: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlockRequest<'a> {
    client_id: &'static str,
    language: &'static str,
    operate: &'static str,
    product: &'a str,
    device_info: DeviceInfo<'a>,
    device_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceInfo<'a> {
    product: &'a str,
    soc_family: fastboot_ops::SocFamily,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClearResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    clean_or_not: i64,
}

/// Unlock service client over HTTPS with JSON bodies.
#[derive(Clone)]
pub struct HttpUnlockService {
    http_client: reqwest::Client,
    api_url: Url,
}

impl HttpUnlockService {
    pub fn new(api_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.as_str().trim_end_matches('/'), path)
    }

    async fn fetch_clear_flag(&self, product: &str) -> ExchangeResult<Option<i64>> {
        let body = ServiceRequest {
            app_id: APP_ID,
            data: ClearRequest { product },
        };
        let response = self
            .http_client
            .post(self.endpoint("/api/v2/unlock/device/clear"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<ClearResponse>(&text) {
            Ok(parsed) if status.is_success() && parsed.code == 0 => Ok(Some(parsed.clean_or_not)),
            Ok(parsed) => {
                warn!(status = %status, code = parsed.code, "Clear-policy lookup refused");
                Ok(None)
            }
            Err(err) => {
                warn!(status = %status, error = %err, "Clear-policy response unreadable");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl UnlockService for HttpUnlockService {
    async fn check_clear_policy(&self, product: &str) -> ClearPolicy {
        match self.fetch_clear_flag(product).await {
            Ok(Some(flag)) => {
                let policy = ClearPolicy::from_flag(flag);
                debug!(product = %product, policy = ?policy, "Clear policy resolved");
                policy
            }
            Ok(None) => ClearPolicy::Unknown,
            Err(err) => {
                warn!(error = %err, "Clear-policy lookup failed");
                ClearPolicy::Unknown
            }
        }
    }

    async fn request_unlock_credential(
        &self,
        facts: &DeviceFacts,
        session: &AuthSession,
    ) -> ExchangeResult<UnlockRequestResult> {
        let product = facts.product.as_deref().unwrap_or_default();
        let body = ServiceRequest {
            app_id: APP_ID,
            data: UnlockRequest {
                client_id: CLIENT_ID,
                language: "en",
                operate: "unlock",
                product,
                device_info: DeviceInfo {
                    product,
                    soc_family: facts.soc_family,
                },
                device_token: facts.hardware_token.as_deref().unwrap_or_default(),
            },
        };

        info!(product = %product, "Requesting unlock credential");
        let response = self
            .http_client
            .post(self.endpoint("/api/v3/ahaUnlock"))
            .header("Cookie", format!("userId={}", session.remote_user_id))
            .header("X-Nonce", &session.nonce)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let result = classify_unlock_response(&text);
        debug!(status = %status, result = %result_kind(&result), "Unlock response classified");
        Ok(result)
    }
}

fn result_kind(result: &UnlockRequestResult) -> &'static str {
    match result {
        UnlockRequestResult::Granted { .. } => "granted",
        UnlockRequestResult::Denied { .. } => "denied",
        UnlockRequestResult::RateLimited { .. } => "rate_limited",
        UnlockRequestResult::Malformed { .. } => "malformed",
    }
}
