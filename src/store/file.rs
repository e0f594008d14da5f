use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{error::Result, store::KeyValueStore};

/// One file per key under a directory. Writes go to a temp file that is
/// renamed over the target.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let written = write_then_rename(&tmp_path, &path, value.as_bytes());
        if let Err(e) = written {
            // a failed write must not leave the temp file behind
            let _ = fs::remove_file(&tmp_path);
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            return Err(e.into());
        }

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_file = File::create(tmp_path)?;
    tmp_file.write_all(bytes)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(tmp_path, path)
}
