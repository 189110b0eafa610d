use crate::fields::{FieldErrors, FieldKey, FormFields};
use crate::verification::VerificationState;

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const VERIFICATION_REQUIRED: &str = "Please complete the verification";
pub const VERIFICATION_FAILED: &str = "Verification failed, please try again";
pub const VERIFICATION_EXPIRED: &str = "Verification expired, please verify again";

static NO_WIDGET: VerificationState = VerificationState::Disabled;

/// What the validator needs to know about the challenge widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationGate<'a> {
    /// A site key is configured.
    pub configured: bool,
    /// Widget is hidden and the server decides.
    pub managed: bool,
    pub state: &'a VerificationState,
}

impl<'a> VerificationGate<'a> {
    /// No widget configured.
    pub fn disabled() -> Self {
        Self {
            configured: false,
            managed: false,
            state: &NO_WIDGET,
        }
    }

    /// Whether a client-side token is required before submitting.
    pub fn blocks(&self) -> bool {
        self.configured && !self.managed && self.state.token().is_none()
    }

    /// Inline message for a blocking gate, specific to how it got there.
    pub fn message(&self) -> &'static str {
        verification_message(self.state)
    }
}

pub fn verification_message(state: &VerificationState) -> &'static str {
    match state {
        VerificationState::Failed => VERIFICATION_FAILED,
        VerificationState::Expired => VERIFICATION_EXPIRED,
        _ => VERIFICATION_REQUIRED,
    }
}

/// Validate the form. Pure: the same inputs always give the same map.
///
/// The honeypot is deliberately absent here; a filled trap aborts the
/// submission silently rather than producing an error.
pub fn validate(fields: &FormFields, gate: VerificationGate<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if fields.first_name.trim().is_empty() {
        errors.insert(FieldKey::FirstName, FIRST_NAME_REQUIRED);
    }
    if fields.last_name.trim().is_empty() {
        errors.insert(FieldKey::LastName, LAST_NAME_REQUIRED);
    }
    if fields.email.trim().is_empty() {
        errors.insert(FieldKey::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(&fields.email) {
        errors.insert(FieldKey::Email, EMAIL_INVALID);
    }
    if gate.blocks() {
        errors.insert(FieldKey::Verification, gate.message());
    }

    errors
}

/// Permissive `local@domain.tld` shape check.
///
/// Exactly one `@`, a non-empty local part, and a domain with no whitespace
/// containing a `.` that is neither its first nor its last character. The
/// raw value is checked, so surrounding whitespace fails.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let len = domain.len();
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < len)
}
