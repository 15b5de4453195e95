use std::fmt;

/// Email of the account that should receive ownership.
///
/// Only emptiness is checked here; the provider validates the address and
/// rejects malformed ones. Casing is kept as given for the API call,
/// comparisons ignore case, including non-ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalEmail(String);

impl PrincipalEmail {
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err("Target email must not be empty".to_string());
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for PrincipalEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
