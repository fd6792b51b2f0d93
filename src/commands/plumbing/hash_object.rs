use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn hash_object(&mut self, object_path: &str, write: bool) -> anyhow::Result<()> {
        let data = self
            .workspace()
            .read_file(Path::new(object_path))
            .with_context(|| format!("failed to read {object_path}"))?;
        let blob = Blob::new(data);

        let object_id = match write {
            true => self.database().store(&blob)?,
            false => blob.object_id(),
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
