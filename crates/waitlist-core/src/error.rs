use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback text shown when an error has no user-facing wording of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Categorization of waitlist errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WaitlistErrorKind {
    /// The request never produced a response (DNS, connection, CORS, ...).
    Transport,
    /// The endpoint answered with a non-2xx status.
    HttpStatus,
    /// The challenge script global never appeared.
    WidgetUnavailable,
    /// The challenge script rejected the render call.
    WidgetRender,
    /// Configuration could not be parsed.
    Config,
}

impl fmt::Display for WaitlistErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistErrorKind::Transport => write!(f, "Transport"),
            WaitlistErrorKind::HttpStatus => write!(f, "HttpStatus"),
            WaitlistErrorKind::WidgetUnavailable => write!(f, "WidgetUnavailable"),
            WaitlistErrorKind::WidgetRender => write!(f, "WidgetRender"),
            WaitlistErrorKind::Config => write!(f, "Config"),
        }
    }
}

/// Structured error for every recoverable failure outside field validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitlistError {
    pub kind: WaitlistErrorKind,
    pub message: String,
    /// HTTP status code, set only for [`WaitlistErrorKind::HttpStatus`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl WaitlistError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: WaitlistErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: WaitlistErrorKind::HttpStatus,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn widget_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: WaitlistErrorKind::WidgetUnavailable,
            message: message.into(),
            status: None,
        }
    }

    pub fn widget_render(message: impl Into<String>) -> Self {
        Self {
            kind: WaitlistErrorKind::WidgetRender,
            message: message.into(),
            status: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: WaitlistErrorKind::Config,
            message: message.into(),
            status: None,
        }
    }

    /// Text suitable for showing next to the form.
    ///
    /// Transport and status failures carry backend wording that is not meant
    /// for visitors, so they collapse to [`GENERIC_FAILURE_MESSAGE`].
    pub fn friendly_message(&self) -> String {
        match self.kind {
            WaitlistErrorKind::HttpStatus if self.status == Some(429) => {
                "Too many attempts. Please wait a moment and try again.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for WaitlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} ({}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for WaitlistError {}

impl From<toml::de::Error> for WaitlistError {
    fn from(e: toml::de::Error) -> Self {
        WaitlistError::config(e.to_string())
    }
}
