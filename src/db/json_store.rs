//! Durable store backed by a single JSON document.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};

use super::{DataStore, StoreError, StoreResult};
use crate::models::{next_timestamp, Answer, Theme};

/// On-disk layout of the store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    themes: HashMap<String, Theme>,
    #[serde(default, deserialize_with = "null_as_empty")]
    answers: HashMap<String, Answer>,
    #[serde(default = "first_id")]
    next_theme_id: u64,
    #[serde(default = "first_id")]
    next_answer_id: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            themes: HashMap::new(),
            answers: HashMap::new(),
            next_theme_id: first_id(),
            next_answer_id: first_id(),
        }
    }
}

fn first_id() -> u64 {
    1
}

fn null_as_empty<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Option::<HashMap<String, V>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Take the next free `<prefix>_<n>` id, advancing the counter past it.
fn allocate_id<V>(prefix: &str, counter: &mut u64, taken: &HashMap<String, V>) -> String {
    loop {
        let id = format!("{}_{}", prefix, *counter);
        *counter += 1;
        if !taken.contains_key(&id) {
            return id;
        }
    }
}

/// JSON-file backend.
///
/// Assigns `theme_<n>` / `answer_<n>` ids and stamps timestamps itself.
/// Answers live in one flat map and scoped queries scan it. Every mutation
/// rewrites the whole file while holding the write lock; a mutation whose
/// write fails is not applied in memory. Deleting a theme deletes its answers.
///
/// The file is overwritten in place, so a crash mid-write can truncate it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if the file exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut snapshot = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Snapshot::default()
            }
            Err(e) => return Err(e.into()),
        };
        snapshot.next_theme_id = snapshot.next_theme_id.max(first_id());
        snapshot.next_answer_id = snapshot.next_answer_id.max(first_id());

        tracing::info!(
            "Loaded {} themes and {} answers from {:?}",
            snapshot.themes.len(),
            snapshot.answers.len(),
            path
        );

        Ok(Self {
            path,
            state: RwLock::new(snapshot),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the state, persist it, then publish it.
    fn mutate<R>(&self, change: impl FnOnce(&mut Snapshot) -> StoreResult<R>) -> StoreResult<R> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let result = change(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(result)
    }

    fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&self.path, bytes)?;
        tracing::debug!("Persisted store to {:?}", self.path);
        Ok(())
    }
}

impl DataStore for JsonFileStore {
    fn get_theme(&self, id: &str) -> StoreResult<Theme> {
        self.state
            .read()
            .themes
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_themes(&self) -> StoreResult<Vec<Theme>> {
        Ok(self.state.read().themes.values().cloned().collect())
    }

    fn create_theme(&self, mut theme: Theme) -> StoreResult<Theme> {
        self.mutate(|state| {
            let now = Utc::now();
            theme.id = allocate_id("theme", &mut state.next_theme_id, &state.themes);
            theme.created_at = now;
            theme.updated_at = now;
            theme.active = true;
            state.themes.insert(theme.id.clone(), theme.clone());
            Ok(theme)
        })
    }

    fn update_theme(&self, mut theme: Theme) -> StoreResult<Theme> {
        self.mutate(|state| {
            let existing = state.themes.get_mut(&theme.id).ok_or(StoreError::NotFound)?;
            theme.created_at = existing.created_at;
            theme.updated_at = next_timestamp(existing.updated_at);
            *existing = theme.clone();
            Ok(theme)
        })
    }

    fn delete_theme(&self, id: &str) -> StoreResult<()> {
        self.mutate(|state| {
            state.themes.remove(id).ok_or(StoreError::NotFound)?;
            let before = state.answers.len();
            state.answers.retain(|_, answer| answer.theme_id != id);
            tracing::debug!(
                "Deleted theme {} with {} answers",
                id,
                before - state.answers.len()
            );
            Ok(())
        })
    }

    fn get_answer(&self, id: &str, theme_id: &str) -> StoreResult<Answer> {
        self.state
            .read()
            .answers
            .get(id)
            .filter(|answer| answer.theme_id == theme_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_answers(&self, theme_id: &str) -> StoreResult<Vec<Answer>> {
        Ok(self
            .state
            .read()
            .answers
            .values()
            .filter(|answer| answer.theme_id == theme_id)
            .cloned()
            .collect())
    }

    fn create_answer(&self, mut answer: Answer) -> StoreResult<Answer> {
        self.mutate(|state| {
            if !state.themes.contains_key(&answer.theme_id) {
                return Err(StoreError::NotFound);
            }
            let now = Utc::now();
            answer.id = allocate_id("answer", &mut state.next_answer_id, &state.answers);
            answer.created_at = now;
            answer.updated_at = now;
            state.answers.insert(answer.id.clone(), answer.clone());
            Ok(answer)
        })
    }

    fn update_answer(&self, mut answer: Answer) -> StoreResult<Answer> {
        self.mutate(|state| {
            let existing = state
                .answers
                .get_mut(&answer.id)
                .filter(|existing| existing.theme_id == answer.theme_id)
                .ok_or(StoreError::NotFound)?;
            answer.created_at = existing.created_at;
            answer.updated_at = next_timestamp(existing.updated_at);
            *existing = answer.clone();
            Ok(answer)
        })
    }

    fn delete_answer(&self, id: &str, theme_id: &str) -> StoreResult<()> {
        self.mutate(|state| {
            let owned = state
                .answers
                .get(id)
                .is_some_and(|answer| answer.theme_id == theme_id);
            if !owned {
                return Err(StoreError::NotFound);
            }
            state.answers.remove(id);
            Ok(())
        })
    }
}
