use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::warn;

use crate::duration_provider::Minutes;

const CACHE_FOLDER_ENV_VAR: &str = "SHUTTLE_CACHE_FOLDER";
const CACHE_FILENAME: &str = "durations.json";

pub type DurationMap = FxHashMap<String, Minutes>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache folder is not configured: {0}")]
    MissingFolder(#[from] std::env::VarError),

    #[error("path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Directional, coordinate-based key shared by every stop at the same location.
pub fn cache_key(from: geo_types::Point, to: geo_types::Point) -> String {
    format!(
        "{:.6},{:.6}->{:.6},{:.6}",
        from.y(),
        from.x(),
        to.y(),
        to.x()
    )
}

/// Persistent key to minutes mapping.
///
/// Entries are only ever added, so reads need no synchronization. Writes go
/// through [`DurationCache::merge`], which implementations serialize: two
/// merges on the same cache never lose each other's entries.
pub trait DurationCache: Send + Sync {
    fn load(&self) -> Result<DurationMap, CacheError>;

    fn save(&self, durations: &DurationMap) -> Result<(), CacheError>;

    /// Loads the current content, adds `entries` and saves the result. An
    /// unreadable cache is replaced.
    ///
    /// The default takes no lock. Caches shared between threads override it.
    fn merge(&self, entries: &DurationMap) -> Result<(), CacheError> {
        extend_and_save(self, entries)
    }
}

fn extend_and_save<C>(cache: &C, entries: &DurationMap) -> Result<(), CacheError>
where
    C: DurationCache + ?Sized,
{
    let mut durations = cache.load().unwrap_or_else(|error| {
        warn!("Duration cache unreadable, overwriting it: {error}");
        DurationMap::default()
    });
    durations.extend(entries.iter().map(|(key, value)| (key.clone(), *value)));
    cache.save(&durations)
}

impl<T> DurationCache for Arc<T>
where
    T: DurationCache,
{
    fn load(&self) -> Result<DurationMap, CacheError> {
        self.as_ref().load()
    }

    fn save(&self, durations: &DurationMap) -> Result<(), CacheError> {
        self.as_ref().save(durations)
    }

    fn merge(&self, entries: &DurationMap) -> Result<(), CacheError> {
        self.as_ref().merge(entries)
    }
}

/// JSON file cache. Use one instance per file: merges are serialized by the
/// instance, not by the file system.
pub struct FileDurationCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDurationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_env() -> Result<Self, CacheError> {
        let cache_folder_path = std::env::var(CACHE_FOLDER_ENV_VAR)?;
        let cache_folder = Path::new(&cache_folder_path);

        if !cache_folder.is_dir() {
            return Err(CacheError::NotADirectory(cache_folder.to_path_buf()));
        }

        Ok(Self::new(cache_folder.join(CACHE_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DurationCache for FileDurationCache {
    fn load(&self) -> Result<DurationMap, CacheError> {
        if !self.path.is_file() {
            return Ok(DurationMap::default());
        }

        let file = std::fs::File::open(&self.path)?;
        let durations: DurationMap = serde_json::from_reader(std::io::BufReader::new(file))?;

        Ok(durations)
    }

    fn save(&self, durations: &DurationMap) -> Result<(), CacheError> {
        // Sorted keys keep the file stable between runs.
        let sorted: BTreeMap<&String, &Minutes> = durations.iter().collect();

        let file = std::fs::File::create(&self.path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer_pretty(&mut writer, &sorted)?;
        writer.flush()?;

        Ok(())
    }

    fn merge(&self, entries: &DurationMap) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock();
        extend_and_save(self, entries)
    }
}

#[derive(Default)]
pub struct InMemoryDurationCache {
    durations: RwLock<DurationMap>,
}

impl InMemoryDurationCache {
    pub fn new(durations: DurationMap) -> Self {
        Self {
            durations: RwLock::new(durations),
        }
    }

    pub fn len(&self) -> usize {
        self.durations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.read().is_empty()
    }
}

impl DurationCache for InMemoryDurationCache {
    fn load(&self) -> Result<DurationMap, CacheError> {
        Ok(self.durations.read().clone())
    }

    fn save(&self, durations: &DurationMap) -> Result<(), CacheError> {
        *self.durations.write() = durations.clone();
        Ok(())
    }

    fn merge(&self, entries: &DurationMap) -> Result<(), CacheError> {
        self.durations
            .write()
            .extend(entries.iter().map(|(key, value)| (key.clone(), *value)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_directional() {
        let a = geo_types::Point::new(127.0276, 37.4979);
        let b = geo_types::Point::new(127.0396, 37.5013);

        assert_eq!(cache_key(a, b), "37.497900,127.027600->37.501300,127.039600");
        assert_ne!(cache_key(a, b), cache_key(b, a));
    }

    #[test]
    fn test_file_cache_round_trip() {
        let folder = std::env::temp_dir().join(format!("shuttle-cache-{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();
        let cache = FileDurationCache::new(folder.join(CACHE_FILENAME));

        assert!(cache.load().unwrap().is_empty());

        let mut first = DurationMap::default();
        first.insert("a->b".to_owned(), 4);
        cache.merge(&first).unwrap();

        let mut second = DurationMap::default();
        second.insert("b->a".to_owned(), 6);
        cache.merge(&second).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["a->b"], 4);
        assert_eq!(loaded["b->a"], 6);

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let folder =
            std::env::temp_dir().join(format!("shuttle-cache-bad-{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();
        let path = folder.join(CACHE_FILENAME);
        std::fs::write(&path, "not json").unwrap();

        let cache = FileDurationCache::new(&path);
        assert!(matches!(cache.load(), Err(CacheError::Malformed(_))));

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn test_merge_replaces_malformed_file() {
        let folder =
            std::env::temp_dir().join(format!("shuttle-cache-repair-{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();
        let path = folder.join(CACHE_FILENAME);
        std::fs::write(&path, "garbage").unwrap();

        let cache = FileDurationCache::new(&path);
        let mut entries = DurationMap::default();
        entries.insert("a->b".to_owned(), 9);
        cache.merge(&entries).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["a->b"], 9);

        std::fs::remove_dir_all(&folder).unwrap();
    }

    fn merge_from_threads(cache: &impl DurationCache, threads: usize, per_thread: usize) {
        std::thread::scope(|scope| {
            for thread in 0..threads {
                scope.spawn(move || {
                    for index in 0..per_thread {
                        let mut entries = DurationMap::default();
                        entries.insert(format!("{thread}:{index}"), index as Minutes);
                        cache.merge(&entries).unwrap();
                    }
                });
            }
        });
    }

    #[test]
    fn test_concurrent_file_merges_keep_every_entry() {
        let folder =
            std::env::temp_dir().join(format!("shuttle-cache-shared-{}", std::process::id()));
        std::fs::create_dir_all(&folder).unwrap();
        let cache = Arc::new(FileDurationCache::new(folder.join(CACHE_FILENAME)));

        merge_from_threads(&cache, 4, 25);

        assert_eq!(cache.load().unwrap().len(), 100);

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn test_concurrent_in_memory_merges_keep_every_entry() {
        let cache = Arc::new(InMemoryDurationCache::default());

        merge_from_threads(&cache, 4, 25);

        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_in_memory_merge() {
        let cache = InMemoryDurationCache::default();
        let mut entries = DurationMap::default();
        entries.insert("x".to_owned(), 3);

        cache.merge(&entries).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.load().unwrap()["x"], 3);
    }
}
