//! Git references (HEAD and branches)
//!
//! References are text files holding either a 40-character object id or
//! `ref: <path>` pointing at another reference. A fresh repository's HEAD is
//! a symbolic ref to `refs/heads/main`, which does not exist until a clone
//! (or another writer) creates it.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";
pub const DEFAULT_BRANCH_REF: &str = "refs/heads/main";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        match regex::Regex::new(SYMREF_REGEX)?.captures(content) {
            Some(symref) => Ok(Some(SymRefOrOid::SymRef(symref[1].to_string()))),
            None => Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(content)?))),
        }
    }
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }

    /// Point HEAD at `ref_name` symbolically, e.g. `refs/heads/main`
    pub fn set_head_symref(&self, ref_name: &str) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), &format!("ref: {ref_name}\n"))
    }

    /// Resolve HEAD through any symbolic refs to an object id
    ///
    /// Returns `None` while HEAD points at a branch that does not exist yet.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Write `oid` to whatever HEAD ultimately points at
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let target = self.resolve_target(self.head_path())?;
        self.update_ref_file(&target, &format!("{oid}\n"))
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read(path)? {
            Some(SymRefOrOid::SymRef(target)) => self.read_symref(&self.path.join(target)),
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Follow symbolic refs to the file that should hold an object id
    fn resolve_target(&self, path: PathBuf) -> anyhow::Result<PathBuf> {
        match SymRefOrOid::read(&path)? {
            Some(SymRefOrOid::SymRef(target)) => self.resolve_target(self.path.join(target)),
            Some(SymRefOrOid::Oid(_)) | None => Ok(path),
        }
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("invalid ref file path {path:?}"))?;
        std::fs::create_dir_all(parent)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        ref_file.write_all(raw_ref.as_bytes())?;

        Ok(())
    }
}
