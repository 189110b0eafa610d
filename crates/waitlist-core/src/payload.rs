use crate::fields::FormFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key carrying the challenge token.
pub const TOKEN_KEY: &str = "cf-turnstile-response";

/// Key carrying the static passthrough tag.
pub const TAG_KEY: &str = "tags";

/// Keys with a fixed meaning; a honeypot may not reuse them.
pub const RESERVED_KEYS: &[&str] = &["EMAIL", "FNAME", "LNAME", TOKEN_KEY, TAG_KEY];

/// Outbound signup data.
///
/// The field names follow the mailing-list form schema the payload is
/// posted to. Dynamically named entries (the honeypot) sit in `extra` and
/// are flattened into the same JSON object on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupPayload {
    #[serde(rename = "EMAIL")]
    pub email: String,
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
    #[serde(
        rename = "cf-turnstile-response",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verification_token: Option<String>,
    #[serde(rename = "tags", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SignupPayload {
    /// Field values plus the optional token and honeypot entries.
    pub fn build(
        fields: &FormFields,
        token: Option<&str>,
        honeypot_field: Option<&str>,
    ) -> Self {
        let mut extra = BTreeMap::new();
        if let (Some(name), Some(value)) = (honeypot_field, fields.honeypot.as_deref()) {
            if RESERVED_KEYS.contains(&name) {
                tracing::warn!(field = name, "Honeypot field name collides with a payload key; skipping");
            } else {
                extra.insert(name.to_string(), value.to_string());
            }
        }

        Self {
            email: fields.email.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            verification_token: token.map(str::to_string),
            tag: None,
            extra,
        }
    }

    /// Attach the static tag sent with uncontrolled posts.
    pub fn with_tag(mut self, tag: Option<&str>) -> Self {
        self.tag = tag.map(str::to_string);
        self
    }
}
