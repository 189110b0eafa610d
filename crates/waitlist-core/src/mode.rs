/// Who owns the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// The host supplied both a submit callback and an explicit success
    /// flag, and drives `submitting`/`succeeded`/`failed` itself.
    Controlled,
    /// The form posts (or simulates) and tracks its own status.
    Uncontrolled,
}

impl OperatingMode {
    /// Classify from what the host supplied.
    ///
    /// Both a callback and a success flag are needed for controlled mode.
    /// Either one alone stays uncontrolled; this is silent and total.
    pub fn resolve(has_submit_callback: bool, success_flag: Option<bool>) -> Self {
        match (has_submit_callback, success_flag) {
            (true, Some(_)) => OperatingMode::Controlled,
            _ => OperatingMode::Uncontrolled,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, OperatingMode::Controlled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Controlled => "controlled",
            OperatingMode::Uncontrolled => "uncontrolled",
        }
    }
}
