use crate::areas::workspace::Workspace;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::graph::ObjectGraph;
use crate::errors::{BitError, BitResult};
use std::path::PathBuf;

/// Entry names that must never become path components, compared without
/// regard to ASCII case
const FORBIDDEN_NAMES: [&str; 4] = ["", ".", "..", ".git"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeStats {
    pub files: usize,
    pub directories: usize,
    pub skipped: usize,
}

/// Writes the tree of one commit into a workspace
///
/// The walk keeps an explicit stack of pending directories instead of
/// recursing, and refuses to nest deeper than `max_depth`.
#[derive(Debug)]
pub struct Materializer<'g> {
    graph: &'g ObjectGraph,
    max_depth: usize,
}

impl<'g> Materializer<'g> {
    pub fn new(graph: &'g ObjectGraph, max_depth: usize) -> Self {
        Materializer { graph, max_depth }
    }

    pub fn materialize(
        &self,
        commit_oid: &ObjectId,
        workspace: &Workspace,
    ) -> BitResult<MaterializeStats> {
        let commit = self
            .graph
            .commit(commit_oid)
            .ok_or(BitError::HeadCommitNotFound(*commit_oid))?;
        let root_oid = commit.tree_oid();
        let root = self
            .graph
            .tree(root_oid)
            .ok_or(BitError::RootTreeNotFound(*root_oid))?;

        let mut stats = MaterializeStats::default();
        let mut pending = vec![(root, PathBuf::new(), 0usize)];

        while let Some((tree, dir, depth)) = pending.pop() {
            if depth > self.max_depth {
                return Err(BitError::TreeTooDeep(self.max_depth));
            }
            workspace.make_directory(&dir)?;
            stats.directories += 1;

            for entry in tree.entries() {
                Self::check_name(&entry.name)?;
                let path = dir.join(&entry.name);

                match &entry.mode {
                    EntryMode::File(mode) => {
                        let blob = self
                            .graph
                            .blob(&entry.oid)
                            .ok_or(BitError::BlobNotFound(entry.oid))?;
                        workspace.write_file(&path, blob.content(), *mode)?;
                        stats.files += 1;
                    }
                    EntryMode::Directory => {
                        let subtree = self
                            .graph
                            .tree(&entry.oid)
                            .ok_or(BitError::TreeNotFound(entry.oid))?;
                        pending.push((subtree, path, depth + 1));
                    }
                    other => {
                        tracing::warn!(mode = %other, path = %path.display(), "skipping unsupported tree entry");
                        stats.skipped += 1;
                    }
                }
            }
        }

        Ok(stats)
    }

    fn check_name(name: &str) -> BitResult<()> {
        let forbidden = FORBIDDEN_NAMES
            .iter()
            .any(|forbidden| forbidden.eq_ignore_ascii_case(name));
        if forbidden || name.contains(['/', '\0']) {
            return Err(BitError::UnsafePath(name.to_string()));
        }
        Ok(())
    }
}
