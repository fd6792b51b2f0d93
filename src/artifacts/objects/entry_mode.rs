//! Tree entry modes
//!
//! Modes are octal text tags in the tree payload. Known tags map to variants;
//! anything else is kept verbatim so a parsed tree serializes back to the
//! exact bytes it came from.

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Directory,
    Symlink,
    Submodule,
    /// Unrecognized mode, kept as written on the wire
    Other(String),
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Directory => "40000",
            EntryMode::Symlink => "120000",
            EntryMode::Submodule => "160000",
            EntryMode::Other(raw) => raw,
        }
    }

    /// Parse a mode tag exactly as it appears in a tree payload
    pub fn from_octal_str(value: &str) -> Self {
        match value {
            "100644" => EntryMode::File(FileMode::Regular),
            "100755" => EntryMode::File(FileMode::Executable),
            "40000" => EntryMode::Directory,
            "120000" => EntryMode::Symlink,
            "160000" => EntryMode::Submodule,
            other => EntryMode::Other(other.to_string()),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Name of the object kind an entry with this mode points to
    pub fn object_kind(&self) -> &'static str {
        match self {
            EntryMode::Directory => "tree",
            EntryMode::Submodule => "commit",
            _ => "blob",
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
