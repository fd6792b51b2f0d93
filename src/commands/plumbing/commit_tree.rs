use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

impl Repository {
    pub fn commit_tree(
        &mut self,
        tree: &str,
        parents: &[String],
        message: &str,
    ) -> anyhow::Result<()> {
        let tree_oid = ObjectId::try_parse(tree)?;
        self.database()
            .parse_object_as_tree(&tree_oid)?
            .with_context(|| format!("{tree_oid} is not a tree"))?;

        let parents = parents
            .iter()
            .map(|parent| ObjectId::try_parse(parent))
            .collect::<Result<Vec<_>, _>>()?;

        let author = Author::load_from_env()?;
        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }

        let commit = Commit::new(parents, tree_oid, author, message);
        let commit_id = self.database().store(&commit)?;

        writeln!(self.writer(), "{commit_id}")?;

        Ok(())
    }
}
