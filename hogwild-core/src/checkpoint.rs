//! Saving and loading parameter snapshots.
use crate::params::ParamsSnapshot;
use anyhow::{Context, Result};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// Destination of parameter snapshots.
pub trait CheckpointStore {
    /// Saves a snapshot labelled with `tag` and returns where it went.
    fn save(&mut self, snapshot: &ParamsSnapshot, tag: &str) -> Result<PathBuf>;

    /// Loads a snapshot.
    fn load(&self, path: &Path) -> Result<ParamsSnapshot>;
}

/// Writes snapshots as bincode files in a directory, keeping only the latest.
pub struct FileCheckpointStore {
    dir: PathBuf,
    latest: Option<PathBuf>,
}

impl FileCheckpointStore {
    /// Creates the store, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create checkpoint directory {:?}", dir))?;
        Ok(Self { dir, latest: None })
    }

    /// Path of the most recent checkpoint written by this store.
    pub fn latest(&self) -> Option<&Path> {
        self.latest.as_deref()
    }

    /// Reads a snapshot from a file.
    pub fn load_file(path: &Path) -> Result<ParamsSnapshot> {
        let file =
            File::open(path).with_context(|| format!("Failed to open checkpoint {:?}", path))?;
        let snapshot = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("Failed to decode checkpoint {:?}", path))?;
        Ok(snapshot)
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn save(&mut self, snapshot: &ParamsSnapshot, tag: &str) -> Result<PathBuf> {
        let path = self.dir.join(format!("model-{}.ckpt", tag));
        let tmp = path.with_extension("ckpt.tmp");
        {
            let file = File::create(&tmp)?;
            bincode::serialize_into(BufWriter::new(file), snapshot)?;
        }
        fs::rename(&tmp, &path)?;
        info!("Saved checkpoint to {:?}", path);

        if let Some(prev) = self.latest.replace(path.clone()) {
            if prev != path {
                debug!("Removing previous checkpoint {:?}", prev);
                fs::remove_file(&prev)?;
            }
        }
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<ParamsSnapshot> {
        Self::load_file(path)
    }
}
