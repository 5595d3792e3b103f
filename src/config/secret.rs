//! Secure credential handling using the secrecy crate
//!
//! The Notion integration token is the only secret the collector holds. It is
//! wrapped in [`SecretString`] so it is zeroed on drop, redacted in `Debug`
//! output, and only readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use notion_collector::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("ntn_0123456789abcdef".to_string());
//! assert_eq!(token.expose_secret(), "ntn_0123456789abcdef");
//! assert!(!format!("{token:?}").contains("0123456789"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty (after trimming)
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Masked form safe for display: the token prefix followed by asterisks
    ///
    /// Notion tokens start with `secret_` or `ntn_`; only that prefix is kept.
    pub fn masked(&self) -> String {
        let prefix = self
            .0
            .find('_')
            .map(|idx| &self.0[..=idx])
            .filter(|p| p.len() <= 8)
            .unwrap_or("");
        format!("{prefix}********")
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
