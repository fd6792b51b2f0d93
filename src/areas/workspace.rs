use crate::artifacts::objects::entry_mode::FileMode;
use crate::errors::BitResult;
use bytes::Bytes;
use is_executable::IsExecutable;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

/// Working directory rooted at a repository (or clone target) path
///
/// All paths taken and returned are relative to the root.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Every regular file under the root, outside `.git`, sorted by path
    pub fn list_files(&self) -> BitResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.path) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    pub fn read_file(&self, file_path: &Path) -> BitResult<Bytes> {
        let content = std::fs::read(self.path.join(file_path))?;
        Ok(content.into())
    }

    pub fn file_mode(&self, file_path: &Path) -> FileMode {
        if self.path.join(file_path).is_executable() {
            FileMode::Executable
        } else {
            FileMode::Regular
        }
    }

    /// True when the root does not exist yet or holds no entries at all
    pub fn is_empty(&self) -> BitResult<bool> {
        match std::fs::read_dir(&self.path) {
            Ok(mut entries) => Ok(entries.next().is_none()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every entry under the root, `.git` included, keeping the root
    pub fn clear(&self) -> BitResult<()> {
        for entry in std::fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
        }

        Ok(())
    }

    pub fn make_directory(&self, dir_path: &Path) -> BitResult<()> {
        std::fs::create_dir_all(self.path.join(dir_path))?;

        Ok(())
    }

    /// Write `data` to `file_path`, truncating an existing file
    ///
    /// A directory already at `file_path` is an error, never removed.
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: FileMode) -> BitResult<()> {
        let path = self.path.join(file_path);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(data)?;

        #[cfg(unix)]
        if mode == FileMode::Executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }
}
