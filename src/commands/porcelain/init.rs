use crate::areas::refs::DEFAULT_BRANCH_REF;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.create_git_dir()?;

        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }

    /// Lay out `.git` with an object store and a HEAD on the default branch
    pub(crate) fn create_git_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        self.refs()
            .set_head_symref(DEFAULT_BRANCH_REF)
            .context("Failed to create initial HEAD reference")?;

        Ok(())
    }
}
