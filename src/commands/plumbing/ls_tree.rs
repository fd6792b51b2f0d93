use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use anyhow::Context;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LsTreeOptions {
    pub recursive: bool,
    pub name_only: bool,
}

impl Repository {
    pub fn ls_tree(&mut self, tree_ish: &str, options: LsTreeOptions) -> anyhow::Result<()> {
        let oid = if tree_ish == "HEAD" {
            self.refs()
                .read_head()?
                .ok_or_else(|| anyhow::anyhow!("HEAD does not point at a commit yet"))?
        } else {
            ObjectId::try_parse(tree_ish)?
        };

        // a commit lists its root tree
        let tree_oid = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => *commit.tree_oid(),
            None => oid,
        };

        self.list_tree(&tree_oid, Path::new(""), options)
    }

    fn list_tree(
        &self,
        oid: &ObjectId,
        prefix: &Path,
        options: LsTreeOptions,
    ) -> anyhow::Result<()> {
        let tree = self
            .database()
            .parse_object_as_tree(oid)?
            .with_context(|| format!("{oid} is not a tree"))?;

        for entry in tree.entries() {
            let path = prefix.join(&entry.name);

            if options.recursive && entry.is_tree() {
                self.list_tree(&entry.oid, &path, options)?;
            } else {
                self.print_entry(entry, &path, options)?;
            }
        }

        Ok(())
    }

    fn print_entry(
        &self,
        entry: &TreeEntry,
        path: &Path,
        options: LsTreeOptions,
    ) -> anyhow::Result<()> {
        if options.name_only {
            writeln!(self.writer(), "{}", path.display())?;
        } else {
            writeln!(
                self.writer(),
                "{:0>6} {} {}\t{}",
                entry.mode.as_str(),
                entry.mode.object_kind(),
                entry.oid,
                path.display()
            )?;
        }

        Ok(())
    }
}
