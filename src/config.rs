use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::NoteColor;
use crate::store::{DEFAULT_STORAGE_KEY, FileBlobStore, SeedPolicy, SortOrder};

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("notees")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct NoteesConfig {
    pub data_directory: PathBuf,
    pub storage_key: String,
    pub sort_order: SortOrder,
    /// Write the sample notes when no notes have been stored yet.
    pub seed_samples: bool,
    pub default_color: NoteColor,
    pub debug_logging: bool,
}

impl Default for NoteesConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            sort_order: SortOrder::default(),
            seed_samples: true,
            default_color: NoteColor::default(),
            debug_logging: false,
        }
    }
}

impl NoteesConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notees").join("config.json"))
    }

    /// Read the config file. A missing or unreadable file gives the defaults.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed config {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        if self.seed_samples {
            SeedPolicy::Samples
        } else {
            SeedPolicy::Empty
        }
    }

    pub fn blob_store(&self) -> FileBlobStore {
        FileBlobStore::new(&self.data_directory)
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }
}
