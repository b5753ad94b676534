//! The persisted session record.

use serde::{Deserialize, Serialize};

/// Value written for a confirmed login.
const LOGIN_CONFIRMED: &str = "ok";

/// Session data that survives between runs.
///
/// Fields are filled incrementally and persisted after each fill, so a
/// restarted run resumes at the first missing field. The serialized keys
/// are kept compatible with existing `miunlockdata.json` files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Account login identifier (ID, email or phone).
    #[serde(rename = "user", default)]
    pub account: String,
    /// Account secret, stored as entered.
    #[serde(rename = "pwd", default)]
    pub credential: String,
    /// Opaque identifier obtained from the browser identity flow.
    #[serde(rename = "wb_id", default)]
    pub web_device_id: String,
    /// True once authentication has succeeded at least once.
    #[serde(rename = "login", default, with = "login_flag")]
    pub login_confirmed: bool,
    /// Remote user id. Only set together with `login_confirmed`.
    #[serde(rename = "uid", default)]
    pub remote_user_id: String,
}

impl SessionRecord {
    /// True when no field has been populated yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record a successful authentication.
    pub fn confirm_login(&mut self, remote_user_id: impl Into<String>) {
        self.login_confirmed = true;
        self.remote_user_id = remote_user_id.into();
    }

    /// A remote user id without a confirmed login cannot be trusted.
    pub fn is_consistent(&self) -> bool {
        self.remote_user_id.is_empty() || self.login_confirmed
    }

    /// Drop state that violates the record invariant.
    pub(crate) fn normalized(mut self) -> Self {
        if !self.is_consistent() {
            self.remote_user_id.clear();
        }
        self
    }

    /// The credential with everything but its length hidden.
    pub fn masked_credential(&self) -> String {
        "*".repeat(self.credential.chars().count())
    }
}

mod login_flag {
    use super::LOGIN_CONFIRMED;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(confirmed: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *confirmed { LOGIN_CONFIRMED } else { "" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref() == Some(LOGIN_CONFIRMED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_flag_serializes_as_ok_or_empty() {
        let mut record = SessionRecord {
            account: "user@example.com".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["login"], "");

        record.confirm_login("123456789");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["login"], "ok");
        assert_eq!(json["uid"], "123456789");
    }

    #[test]
    fn test_deserialize_uses_legacy_keys() {
        let record: SessionRecord = serde_json::from_str(
            r#"{"user":"u","pwd":"p","wb_id":"wb-123456789","login":"ok","uid":"42"}"#,
        )
        .unwrap();

        assert_eq!(record.account, "u");
        assert_eq!(record.credential, "p");
        assert_eq!(record.web_device_id, "wb-123456789");
        assert!(record.login_confirmed);
        assert_eq!(record.remote_user_id, "42");
    }

    #[test]
    fn test_partial_record_defaults_missing_fields() {
        let record: SessionRecord = serde_json::from_str(r#"{"user":"u"}"#).unwrap();
        assert_eq!(record.account, "u");
        assert!(record.credential.is_empty());
        assert!(!record.login_confirmed);
    }

    #[test]
    fn test_unknown_login_value_is_not_confirmed() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"login":"yes","uid":"42"}"#).unwrap();
        assert!(!record.login_confirmed);
        assert!(!record.is_consistent());

        let normalized = record.normalized();
        assert!(normalized.remote_user_id.is_empty());
        assert!(normalized.is_consistent());
    }

    #[test]
    fn test_null_login_value_is_not_confirmed() {
        let record: SessionRecord = serde_json::from_str(r#"{"login":null}"#).unwrap();
        assert!(!record.login_confirmed);
    }

    #[test]
    fn test_masked_credential_hides_content() {
        let record = SessionRecord {
            credential: "hunter2".to_string(),
            ..Default::default()
        };
        assert_eq!(record.masked_credential(), "*******");
        assert!(SessionRecord::default().is_empty());
        assert!(!record.is_empty());
    }
}
