use std::fmt;

/// Drive permission role. Unknown roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRole {
    Reader,
    Commenter,
    Writer,
    FileOrganizer,
    Organizer,
    Owner,
    Other(String),
}

impl PermissionRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reader => "reader",
            Self::Commenter => "commenter",
            Self::Writer => "writer",
            Self::FileOrganizer => "fileOrganizer",
            Self::Organizer => "organizer",
            Self::Owner => "owner",
            Self::Other(role) => role,
        }
    }

    pub fn parse(role: &str) -> Self {
        match role {
            "reader" => Self::Reader,
            "commenter" => Self::Commenter,
            "writer" => Self::Writer,
            "fileOrganizer" => Self::FileOrganizer,
            "organizer" => Self::Organizer,
            "owner" => Self::Owner,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for PermissionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
