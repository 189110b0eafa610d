/// A visitor action that may close a dismissible card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    /// Pointer down on the backdrop, outside the card.
    OutsideClick,
    /// Pointer down anywhere inside the card.
    InsideClick,
    /// Escape / cancel key.
    CancelKey,
}

impl DismissTrigger {
    /// Map a `KeyboardEvent.key` value; only the cancel key qualifies.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" | "Esc" => Some(DismissTrigger::CancelKey),
            _ => None,
        }
    }
}

/// Whether the trigger should notify the host. The form never hides itself;
/// visibility stays with the host.
pub fn should_dismiss(dismissible: bool, trigger: DismissTrigger) -> bool {
    dismissible && matches!(trigger, DismissTrigger::OutsideClick | DismissTrigger::CancelKey)
}
