use crate::error::WaitlistError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval between checks for the challenge script's global entry point.
pub const WIDGET_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the wait for the challenge script. After this the widget
/// area stays empty and nothing is surfaced to the visitor.
pub const WIDGET_POLL_CEILING: Duration = Duration::from_secs(10);

/// Delay used to fake a successful submission when no action URL is set.
pub const SIMULATED_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// How long the success notice stays fully visible.
pub const NOTICE_VISIBLE: Duration = Duration::from_millis(2000);

/// Length of the notice's exit transition.
pub const NOTICE_EXIT: Duration = Duration::from_millis(300);

/// Total time the success notice is on screen, exit included.
pub const NOTICE_LIFETIME: Duration = NOTICE_VISIBLE.saturating_add(NOTICE_EXIT);

/// Colour scheme requested from the challenge widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TurnstileTheme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl TurnstileTheme {
    /// Value passed to the widget's `theme` render option.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnstileTheme::Light => "light",
            TurnstileTheme::Dark => "dark",
            TurnstileTheme::Auto => "auto",
        }
    }
}

/// Footprint requested from the challenge widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TurnstileSize {
    #[default]
    Normal,
    Compact,
}

impl TurnstileSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnstileSize::Normal => "normal",
            TurnstileSize::Compact => "compact",
        }
    }
}

/// External challenge widget settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TurnstileConfig {
    #[serde(default)]
    pub site_key: String,
    #[serde(default)]
    pub theme: TurnstileTheme,
    #[serde(default)]
    pub size: TurnstileSize,
    /// Analytics tag forwarded to the widget as its `action` option.
    #[serde(default)]
    pub action: Option<String>,
    /// Render hidden and let the server decide pass/fail.
    #[serde(default)]
    pub managed: bool,
}

/// Visible copy on the card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaitlistText {
    pub title: String,
    pub subtitle: String,
    pub success_title: String,
    pub success_message: String,
    pub submit_label: String,
    pub submitting_label: String,
    pub done_label: String,
    pub notice: String,
}

impl Default for WaitlistText {
    fn default() -> Self {
        Self {
            title: "Join the waitlist".to_string(),
            subtitle: "Be the first to know when we launch.".to_string(),
            success_title: "You're on the list!".to_string(),
            success_message: "Thanks for signing up. We'll be in touch soon.".to_string(),
            submit_label: "Join waitlist".to_string(),
            submitting_label: "Joining...".to_string(),
            done_label: "Done".to_string(),
            notice: "Successfully joined the waitlist".to_string(),
        }
    }
}

/// Every inbound option the form recognises.
///
/// All fields default so that a partial TOML document or a bare
/// `WaitlistConfig::default()` yields an uncontrolled form with no widget,
/// no honeypot and no action URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WaitlistConfig {
    #[serde(default)]
    pub text: WaitlistText,
    /// Endpoint for the uncontrolled POST. Absent means simulate success.
    #[serde(default)]
    pub action_url: Option<String>,
    /// Static tag forwarded with uncontrolled submissions.
    #[serde(default)]
    pub tag: Option<String>,
    /// Name of the hidden bot-trap field; absent disables the trap.
    #[serde(default)]
    pub honeypot_field: Option<String>,
    #[serde(default)]
    pub turnstile: Option<TurnstileConfig>,
    #[serde(default)]
    pub dismissible: bool,
}

impl WaitlistConfig {
    /// Parse a TOML document and normalise it.
    pub fn from_toml_str(contents: &str) -> Result<Self, WaitlistError> {
        let config: WaitlistConfig = toml::from_str(contents)?;
        Ok(config.normalized())
    }

    /// Treat blank strings as "not configured".
    pub fn normalized(mut self) -> Self {
        self.action_url = non_blank(self.action_url);
        self.tag = non_blank(self.tag);
        self.honeypot_field = non_blank(self.honeypot_field);
        self.turnstile = self.turnstile.and_then(|mut t| {
            t.action = non_blank(t.action);
            if t.site_key.trim().is_empty() {
                None
            } else {
                Some(t)
            }
        });
        self
    }

    /// Widget settings, only when a site key is present.
    pub fn widget(&self) -> Option<&TurnstileConfig> {
        self.turnstile
            .as_ref()
            .filter(|t| !t.site_key.trim().is_empty())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
