use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tilefall_ports::storage::{GameSettings, SongInfo, StorageError, StoragePort};
use tilefall_ports::types::SongSlug;

const APP_DIR: &str = "Tilefall";
const SETTINGS_FILE: &str = "settings.json";

fn io_error(err: io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

/// Settings in `<base>/settings.json`, songs in `<base>/songs/<slug>.json`.
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `<user config dir>/Tilefall`
    pub fn default_base_dir() -> Result<PathBuf, StorageError> {
        dirs_next::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StorageError::Io("no user config directory on this platform".into()))
    }

    pub fn songs_dir(&self) -> PathBuf {
        self.base_dir.join("songs")
    }

    /// Only `[A-Za-z0-9_-]` slugs map to a file, so a slug can never leave the songs dir.
    fn song_path(&self, slug: &SongSlug) -> Option<PathBuf> {
        let valid = !slug.0.is_empty()
            && slug
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.songs_dir().join(format!("{}.json", slug.0)))
    }

    /// Writes through a sibling temp file so a crash never leaves half a settings file.
    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(io_error)?;
        fs::rename(&tmp, path).map_err(io_error)
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        Self::new(Self::default_base_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<GameSettings, StorageError> {
        let bytes = match fs::read(self.base_dir.join(SETTINGS_FILE)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(GameSettings::default())
            }
            Err(err) => return Err(io_error(err)),
        };
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Serde(e.to_string()))
    }

    fn save_settings(&self, settings: &GameSettings) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec_pretty(settings).map_err(|e| StorageError::Serde(e.to_string()))?;
        Self::write_atomic(&self.base_dir.join(SETTINGS_FILE), &bytes)
    }

    fn list_songs(&self) -> Result<Vec<SongInfo>, StorageError> {
        let entries = match fs::read_dir(self.songs_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };

        let mut songs = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let slug = SongSlug(stem.to_string());
            // files that no slug could address are not part of the library
            if self.song_path(&slug).is_none() {
                continue;
            }
            songs.push(SongInfo {
                title: title_from_slug(stem),
                slug,
            });
        }
        songs.sort_by(|a, b| a.slug.0.cmp(&b.slug.0));
        Ok(songs)
    }

    fn load_song(&self, slug: &SongSlug) -> Result<String, StorageError> {
        let path = self
            .song_path(slug)
            .ok_or_else(|| StorageError::NotFound(slug.clone()))?;
        fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(slug.clone()),
            _ => io_error(err),
        })
    }
}

/// `fur_elise` -> `Fur Elise`
pub fn title_from_slug(slug: &str) -> String {
    slug.split(|c| c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
