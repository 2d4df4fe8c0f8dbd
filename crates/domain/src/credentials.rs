//! Per-platform credential documents.
//!
//! The JSON key names are part of the stored document format and must not
//! change; crawl workers read them verbatim into request headers.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Platform-specific credential bag stored alongside an account.
pub trait CredentialSet:
    Clone + Default + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Merges the non-empty fields of `patch` into this set.
    fn merge(&mut self, patch: &Self);
}

/// Twitter request headers captured from an authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterCredentials {
    #[serde(default)]
    pub authorization: String,
    #[serde(rename = "x-csrf-token", default)]
    pub x_csrf_token: String,
    #[serde(default)]
    pub cookie: String,
    #[serde(rename = "x-client-transaction-id", default)]
    pub x_client_transaction_id: String,
}

impl CredentialSet for TwitterCredentials {
    fn merge(&mut self, patch: &Self) {
        if !patch.authorization.is_empty() {
            self.authorization = patch.authorization.clone();
        }
        if !patch.x_csrf_token.is_empty() {
            self.x_csrf_token = patch.x_csrf_token.clone();
        }
        if !patch.cookie.is_empty() {
            self.cookie = patch.cookie.clone();
        }
        if !patch.x_client_transaction_id.is_empty() {
            self.x_client_transaction_id = patch.x_client_transaction_id.clone();
        }
    }
}

/// Instagram session headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramCredentials {
    #[serde(default)]
    pub cookie: String,
    #[serde(rename = "x-csrftoken", default)]
    pub x_csrftoken: String,
}

impl CredentialSet for InstagramCredentials {
    fn merge(&mut self, patch: &Self) {
        if !patch.cookie.is_empty() {
            self.cookie = patch.cookie.clone();
        }
        if !patch.x_csrftoken.is_empty() {
            self.x_csrftoken = patch.x_csrftoken.clone();
        }
    }
}

/// TikTok open header and parameter maps.
///
/// Keys are not fixed; provided entries merge into the stored maps rather
/// than replacing them wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TikTokCredentials {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl CredentialSet for TikTokCredentials {
    fn merge(&mut self, patch: &Self) {
        for (name, value) in &patch.headers {
            self.headers.insert(name.clone(), value.clone());
        }
        for (name, value) in &patch.params {
            self.params.insert(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_document_uses_exact_header_keys() {
        let credentials = TwitterCredentials {
            authorization: "Bearer abc".to_owned(),
            x_csrf_token: "csrf".to_owned(),
            cookie: "session".to_owned(),
            x_client_transaction_id: "txn".to_owned(),
        };

        let document = serde_json::to_value(&credentials).unwrap();
        assert_eq!(document["authorization"], "Bearer abc");
        assert_eq!(document["x-csrf-token"], "csrf");
        assert_eq!(document["cookie"], "session");
        assert_eq!(document["x-client-transaction-id"], "txn");
    }

    #[test]
    fn instagram_document_uses_exact_header_keys() {
        let credentials = InstagramCredentials {
            cookie: "session".to_owned(),
            x_csrftoken: "csrf".to_owned(),
        };

        let document = serde_json::to_value(&credentials).unwrap();
        assert_eq!(document["cookie"], "session");
        assert_eq!(document["x-csrftoken"], "csrf");
    }

    #[test]
    fn twitter_merge_keeps_unset_fields() {
        let mut stored = TwitterCredentials {
            authorization: "Bearer old".to_owned(),
            x_csrf_token: "old-csrf".to_owned(),
            cookie: "old-cookie".to_owned(),
            x_client_transaction_id: "old-txn".to_owned(),
        };

        stored.merge(&TwitterCredentials {
            authorization: "Bearer new".to_owned(),
            ..TwitterCredentials::default()
        });

        assert_eq!(stored.authorization, "Bearer new");
        assert_eq!(stored.x_csrf_token, "old-csrf");
        assert_eq!(stored.cookie, "old-cookie");
        assert_eq!(stored.x_client_transaction_id, "old-txn");
    }

    #[test]
    fn tiktok_merge_extends_maps_without_replacing() {
        let mut stored = TikTokCredentials {
            headers: HashMap::from([
                ("user-agent".to_owned(), "old-agent".to_owned()),
                ("cookie".to_owned(), "old-cookie".to_owned()),
            ]),
            params: HashMap::from([("device_id".to_owned(), "123".to_owned())]),
        };

        stored.merge(&TikTokCredentials {
            headers: HashMap::from([("cookie".to_owned(), "new-cookie".to_owned())]),
            params: HashMap::from([("odin_id".to_owned(), "456".to_owned())]),
        });

        assert_eq!(stored.headers["cookie"], "new-cookie");
        assert_eq!(stored.headers["user-agent"], "old-agent");
        assert_eq!(stored.params["device_id"], "123");
        assert_eq!(stored.params["odin_id"], "456");
    }

    #[test]
    fn missing_document_keys_deserialize_as_defaults() {
        let credentials: TwitterCredentials = serde_json::from_str("{}").unwrap();
        assert!(credentials.authorization.is_empty());

        let credentials: TikTokCredentials = serde_json::from_str("{}").unwrap();
        assert!(credentials.headers.is_empty());
        assert!(credentials.params.is_empty());
    }
}
