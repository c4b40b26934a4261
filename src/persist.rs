//! Saving and restoring the canvas.
//!
//! A [`Snapshot`] holds the thought list, the connection list and the
//! session counter. It is stored as JSON under a single key in a
//! [`KeyValueStore`]. Loading an absent key is [`LoadOutcome::NothingSaved`],
//! not an error, and missing fields inside a stored snapshot default to
//! empty.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::connection::Connections;
use crate::error::StoreError;
use crate::thought::Thought;
use crate::world::World;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub thoughts: Vec<Thought>,
    pub connections: Connections,
    pub session_count: u32,
}

impl Snapshot {
    pub fn capture(world: &World, session_count: u32) -> Self {
        Self {
            thoughts: world.thoughts.clone(),
            connections: world.connections.clone(),
            session_count,
        }
    }

    /// Replace the world's thoughts and connections with this snapshot's.
    /// Returns the stored session count.
    pub fn apply(self, world: &mut World) -> u32 {
        world.restore(self.thoughts, self.connections);
        self.session_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Restored(Snapshot),
    NothingSaved,
}

/// String storage addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // replace atomically
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
    let json = serde_json::to_string(snapshot)?;
    store.set(key, &json)?;
    tracing::info!(
        key,
        thoughts = snapshot.thoughts.len(),
        connections = snapshot.connections.len(),
        "snapshot saved"
    );
    Ok(())
}

pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<LoadOutcome, StoreError> {
    let Some(json) = store.get(key)? else {
        tracing::info!(key, "no snapshot to load");
        return Ok(LoadOutcome::NothingSaved);
    };
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    tracing::info!(
        key,
        thoughts = snapshot.thoughts.len(),
        connections = snapshot.connections.len(),
        "snapshot loaded"
    );
    Ok(LoadOutcome::Restored(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, ConnectionKind};
    use crate::thought::ThoughtId;
    use crate::zone::{LayoutConfig, ZoneKind};
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn populated() -> World {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = World::new(Vec2::new(1200.0, 800.0), LayoutConfig::default());
        let a = world.add_thought(&mut rng, "sad", Some(ZoneKind::Relax), 10).unwrap();
        let b = world.add_thought(&mut rng, "happy", None, 20).unwrap();
        let mut manual = Connection::new(a, b, ConnectionKind::Manual, 30);
        manual.label = "supports".into();
        world.connections.add(manual);
        world
    }

    #[test]
    fn test_memory_round_trip() {
        let world = populated();
        let mut store = MemoryStore::new();
        save(&mut store, "k", &Snapshot::capture(&world, 3)).unwrap();

        let LoadOutcome::Restored(snapshot) = load(&store, "k").unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.thoughts, world.thoughts);
        assert_eq!(snapshot.connections, world.connections);
        assert_eq!(snapshot.session_count, 3);
    }

    #[test]
    fn test_missing_key_is_not_an_error() {
        let store = MemoryStore::new();
        assert_eq!(load(&store, "absent").unwrap(), LoadOutcome::NothingSaved);
    }

    #[test]
    fn test_missing_fields_default() {
        let mut store = MemoryStore::new();
        store.set("k", "{}").unwrap();
        assert_eq!(load(&store, "k").unwrap(), LoadOutcome::Restored(Snapshot::default()));
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let mut store = MemoryStore::new();
        store.set("k", "not json").unwrap();
        assert!(matches!(load(&store, "k"), Err(StoreError::Serde(_))));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(load(&store, "thoughtspace.state").unwrap(), LoadOutcome::NothingSaved);

        let world = populated();
        save(&mut store, "thoughtspace.state", &Snapshot::capture(&world, 1)).unwrap();
        assert!(store.path_for("thoughtspace.state").exists());

        let mut restored = World::new(Vec2::new(1200.0, 800.0), LayoutConfig::default());
        let LoadOutcome::Restored(snapshot) = load(&store, "thoughtspace.state").unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.apply(&mut restored), 1);
        assert_eq!(restored.thoughts, world.thoughts);
        assert_eq!(restored.connections, world.connections);

        // ids keep counting past restored ones
        let mut rng = StdRng::seed_from_u64(9);
        let fresh = restored.add_thought(&mut rng, "new", None, 0).unwrap();
        assert!(fresh > ThoughtId(2));
    }
}
