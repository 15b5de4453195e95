use std::fmt;

/// Opaque identifier of a Drive file. Existence is only checked by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err("File id must not be empty".to_string());
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
