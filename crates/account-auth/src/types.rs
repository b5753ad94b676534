use serde::Serialize;

/// Identity presented to the account service.
#[derive(Debug, Clone, Copy)]
pub struct LoginRequest<'a> {
    pub account: &'a str,
    pub credential: &'a str,
    pub web_device_id: &'a str,
}

/// Authenticated session returned by a successful login.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub remote_user_id: String,
    #[serde(skip_serializing)]
    pub security_token: String,
    #[serde(skip_serializing)]
    pub nonce: String,
    #[serde(skip_serializing)]
    pub pass_token: String,
    /// Where the service redirects after login.
    pub redirect_location: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("remote_user_id", &self.remote_user_id)
            .field("redirect_location", &self.redirect_location)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_tokens() {
        let session = AuthSession {
            remote_user_id: "42".to_string(),
            security_token: "s3cr3t".to_string(),
            nonce: "n0nce".to_string(),
            pass_token: "pass".to_string(),
            redirect_location: "https://example.com".to_string(),
        };
        let rendered = format!("{session:?}");
        assert!(rendered.contains("42"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(!rendered.contains("n0nce"));
    }
}
