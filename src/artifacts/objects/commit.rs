//! Git commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Only the tree id matters to checkout; author and committer lines are
//! carried through as written.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{BitError, BitResult};
use anyhow::Context;
use bytes::Bytes;

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Signature line as written after `author `/`committer `
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE
    /// (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`). Without a date the current time
    /// is used.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }
}

/// Git commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for initial commit, multiple for merge commits)
    parents: Vec<ObjectId>,
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    /// Signature lines, kept verbatim
    author: String,
    committer: String,
    /// Commit message
    message: String,
}

impl Commit {
    /// Create a new commit where the author is also the committer
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        let signature = author.display();
        Commit {
            parents,
            tree_oid,
            author: signature.clone(),
            committer: signature,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }
}

impl Packable for Commit {
    fn body(&self) -> Bytes {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author));
        lines.push(format!("committer {}", self.committer));

        Bytes::from(format!("{}\n\n{}", lines.join("\n"), self.message))
    }
}

impl Unpackable for Commit {
    fn deserialize(body: Bytes) -> BitResult<Self> {
        let content = String::from_utf8_lossy(&body);
        let (headers, message) = content
            .split_once("\n\n")
            .unwrap_or((content.as_ref(), ""));
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| BitError::MalformedCommit("missing tree line".to_string()))?;
        let tree_oid = ObjectId::try_parse(tree_oid.trim_end())
            .map_err(|e| BitError::MalformedCommit(format!("invalid tree line: {e}")))?;

        let mut parents = Vec::new();
        let mut author = String::new();
        let mut committer = String::new();

        // Unknown headers (encoding, gpgsig, mergetag) and their continuation
        // lines are tolerated and ignored.
        for line in lines {
            if let Some(parent) = line.strip_prefix("parent ") {
                let parent = ObjectId::try_parse(parent.trim_end())
                    .map_err(|e| BitError::MalformedCommit(format!("invalid parent line: {e}")))?;
                parents.push(parent);
            } else if let Some(value) = line.strip_prefix("author ") {
                author = value.to_string();
            } else if let Some(value) = line.strip_prefix("committer ") {
                committer = value.to_string();
            }
        }

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.body()).into_owned()
    }
}
