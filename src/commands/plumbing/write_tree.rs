use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use anyhow::Context;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

impl Repository {
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let root_oid = self.store_workspace_tree()?;
        writeln!(self.writer(), "{root_oid}")?;

        Ok(())
    }

    /// Store every file as a blob and every directory as a tree, children first
    ///
    /// Directories without files produce no tree, as in git.
    fn store_workspace_tree(&self) -> anyhow::Result<ObjectId> {
        let mut directories: HashMap<PathBuf, Tree> = HashMap::new();
        directories.insert(PathBuf::new(), Tree::default());

        for file_path in self.workspace().list_files()? {
            let data = self
                .workspace()
                .read_file(&file_path)
                .with_context(|| format!("failed to read {file_path:?}"))?;
            let blob_oid = self.database().store(&Blob::new(data))?;
            let mode = self.workspace().file_mode(&file_path);

            let parent = file_path.parent().unwrap_or(Path::new("")).to_path_buf();
            for ancestor in parent.ancestors() {
                directories.entry(ancestor.to_path_buf()).or_default();
            }
            directories.entry(parent).or_default().push(TreeEntry::new(
                EntryMode::from(mode),
                Self::entry_name(&file_path)?,
                blob_oid,
            ));
        }

        let mut paths = directories.keys().cloned().collect::<Vec<_>>();
        paths.sort_by_key(|path| Reverse(path.components().count()));

        for path in paths {
            let mut tree = directories
                .remove(&path)
                .with_context(|| format!("directory {path:?} visited twice"))?;
            tree.sort_canonical();
            let tree_oid = self.database().store(&tree)?;

            match path.parent() {
                Some(parent) => {
                    directories.entry(parent.to_path_buf()).or_default().push(
                        TreeEntry::new(EntryMode::Directory, Self::entry_name(&path)?, tree_oid),
                    );
                }
                None => return Ok(tree_oid),
            }
        }

        anyhow::bail!("working directory produced no root tree")
    }

    fn entry_name(path: &Path) -> anyhow::Result<String> {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .with_context(|| format!("{path:?} is not a valid UTF-8 file name"))
    }
}
