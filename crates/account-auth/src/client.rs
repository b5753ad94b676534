use crate::{AuthError, AuthResult, AuthSession, LoginRequest};
use async_trait::async_trait;
use md5::{Digest, Md5};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

/// Guard prefix the account service puts in front of its JSON bodies.
const RESPONSE_GUARD: &str = "&&&START&&&";
const SERVICE_ID: &str = "unlockApi";

/// Seam between the workflow and the account service.
#[async_trait]
pub trait AccountAuthenticator: Send + Sync {
    async fn authenticate(&self, request: LoginRequest<'_>) -> AuthResult<AuthSession>;
}

/// Uppercase hex MD5 of the credential, the form the login endpoint expects.
pub fn hash_credential(credential: &str) -> String {
    hex::encode_upper(Md5::digest(credential.as_bytes()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    security_status: Option<i64>,
    #[serde(default)]
    notification_url: Option<String>,
    #[serde(default)]
    ssecurity: Option<String>,
    #[serde(default)]
    nonce: serde_json::Value,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    pass_token: Option<String>,
    #[serde(default)]
    user_id: serde_json::Value,
}

/// Account service client over HTTPS.
#[derive(Clone)]
pub struct HttpAccountAuthenticator {
    http_client: reqwest::Client,
    account_url: Url,
}

impl HttpAccountAuthenticator {
    pub fn new(account_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            account_url,
        }
    }

    fn login_endpoint(&self) -> String {
        format!(
            "{}/pass/serviceLoginAuth2",
            self.account_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl AccountAuthenticator for HttpAccountAuthenticator {
    async fn authenticate(&self, request: LoginRequest<'_>) -> AuthResult<AuthSession> {
        let hash = hash_credential(request.credential);
        debug!(account = %request.account, "Posting login to account service");

        let response = self
            .http_client
            .post(self.login_endpoint())
            .header("Cookie", format!("deviceId={}", request.web_device_id))
            .form(&[
                ("user", request.account),
                ("hash", hash.as_str()),
                ("sid", SERVICE_ID),
                ("_json", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, "Account service answered with an HTTP error");
        }

        let session = parse_login_body(&body)?;
        info!(remote_user_id = %session.remote_user_id, "Account login accepted");
        Ok(session)
    }
}

fn parse_login_body(body: &str) -> AuthResult<AuthSession> {
    let json = body.trim_start().trim_start_matches(RESPONSE_GUARD);
    let response: LoginResponse = serde_json::from_str(json)?;

    if response.code != 0 {
        let description = [response.desc, response.description]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| "login failed".to_string());
        return Err(AuthError::Rejected {
            code: response.code,
            description,
        });
    }

    let security_status = response.security_status.unwrap_or_default();
    if security_status != 0 {
        return Err(AuthError::VerificationRequired {
            status: security_status,
            url: response.notification_url.unwrap_or_default(),
        });
    }

    let remote_user_id = scalar_to_string(&response.user_id);
    if remote_user_id.is_empty() {
        return Err(AuthError::Incomplete("userId"));
    }

    Ok(AuthSession {
        remote_user_id,
        security_token: response.ssecurity.unwrap_or_default(),
        nonce: scalar_to_string(&response.nonce),
        pass_token: response.pass_token.unwrap_or_default(),
        redirect_location: response.location.unwrap_or_default(),
    })
}

/// The service sends some ids as numbers and some as strings.
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
