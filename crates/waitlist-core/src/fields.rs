use std::collections::BTreeMap;
use std::fmt;

/// An input the visitor can type into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    FirstName,
    LastName,
    /// Hidden bot-trap input. Never has an error of its own.
    Honeypot,
}

impl Field {
    /// The error slot this input clears when edited.
    pub fn error_key(&self) -> Option<FieldKey> {
        match self {
            Field::Email => Some(FieldKey::Email),
            Field::FirstName => Some(FieldKey::FirstName),
            Field::LastName => Some(FieldKey::LastName),
            Field::Honeypot => None,
        }
    }
}

/// A slot in the error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Email,
    FirstName,
    LastName,
    Verification,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Email => "email",
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Verification => "verification",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `Some` only when a honeypot field name is configured.
    pub honeypot: Option<String>,
}

impl FormFields {
    /// Empty values, with a honeypot slot when the trap is configured.
    pub fn new(honeypot_enabled: bool) -> Self {
        Self {
            honeypot: honeypot_enabled.then(String::new),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Honeypot => self.honeypot.as_deref().unwrap_or(""),
        }
    }

    /// Set one value. Honeypot writes are dropped when the trap is disabled.
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Email => self.email = value,
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Honeypot => {
                if let Some(slot) = self.honeypot.as_mut() {
                    *slot = value;
                }
            }
        }
    }

    /// Empty every value, keeping the honeypot slot if present.
    pub fn clear(&mut self) {
        *self = Self::new(self.honeypot.is_some());
    }

    /// Whether the bot trap holds anything.
    pub fn honeypot_tripped(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Per-field error messages. An empty map means the form is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<FieldKey, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Drop a single entry, leaving the rest untouched.
    pub fn clear(&mut self, key: FieldKey) -> bool {
        self.0.remove(&key).is_some()
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
