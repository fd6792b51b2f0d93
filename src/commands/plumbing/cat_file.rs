use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatFileMode {
    /// Content, with trees rendered like `ls-tree`
    #[default]
    Pretty,
    Type,
}

impl Repository {
    pub fn cat_file(&mut self, object_id: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(object_id)?;
        let (object_type, content) = self
            .database()
            .load(&object_id)
            .with_context(|| format!("failed to read object {object_id}"))?;

        match mode {
            CatFileMode::Type => writeln!(self.writer(), "{object_type}")?,
            CatFileMode::Pretty => match object_type {
                // stored bytes go out untouched so signatures and encodings survive
                ObjectType::Blob | ObjectType::Commit => self.writer().write_all(&content)?,
                ObjectType::Tree => {
                    let tree = Tree::deserialize(content)?;
                    writeln!(self.writer(), "{}", tree.display())?
                }
            },
        }

        Ok(())
    }
}
