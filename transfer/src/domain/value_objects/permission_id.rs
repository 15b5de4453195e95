use std::fmt;

/// Provider-assigned permission id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionId(String);

impl PermissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
