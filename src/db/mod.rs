//! Storage layer for themes and answers.
//!
//! Two interchangeable backends share the [`DataStore`] contract:
//! [`MemoryStore`] keeps everything in process memory, [`JsonFileStore`]
//! rewrites a JSON document on every mutation. Their behavior differs in id
//! assignment and cascade deletes; see the type docs.

mod json_store;
mod memory;

pub use json_store::*;
pub use memory::*;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::models::{Answer, Theme};

/// Errors raised by a store. Stores never retry or recover locally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record {0} already exists")]
    Duplicate(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store worker failed: {0}")]
    Worker(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD contract over themes and answers.
///
/// All calls are synchronous and may block (the durable backend performs file
/// I/O under its lock). Create and update return the record as stored, which
/// may carry fields stamped by the store itself.
pub trait DataStore: Send + Sync {
    fn get_theme(&self, id: &str) -> StoreResult<Theme>;

    /// All themes, in no particular order.
    fn list_themes(&self) -> StoreResult<Vec<Theme>>;

    fn create_theme(&self, theme: Theme) -> StoreResult<Theme>;

    /// Replace the theme at `theme.id`. `created_at` is carried over from the
    /// stored record.
    fn update_theme(&self, theme: Theme) -> StoreResult<Theme>;

    fn delete_theme(&self, id: &str) -> StoreResult<()>;

    /// Fetch an answer, which must belong to `theme_id`.
    fn get_answer(&self, id: &str, theme_id: &str) -> StoreResult<Answer>;

    /// Answers of `theme_id` in no particular order. Empty, not an error, when
    /// the theme has none or does not exist.
    fn list_answers(&self, theme_id: &str) -> StoreResult<Vec<Answer>>;

    /// Store a new answer. Fails with `NotFound` if its theme does not exist.
    fn create_answer(&self, answer: Answer) -> StoreResult<Answer>;

    /// Replace the answer at `answer.id` within `answer.theme_id`.
    fn update_answer(&self, answer: Answer) -> StoreResult<Answer>;

    fn delete_answer(&self, id: &str, theme_id: &str) -> StoreResult<()>;
}

/// Construct the store selected by the configuration.
pub fn open_store(config: &Config) -> StoreResult<Arc<dyn DataStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::JsonFile => {
            let store = JsonFileStore::open(&config.data_file)?;
            tracing::info!("Using JSON file store at {:?}", store.path());
            Ok(Arc::new(store))
        }
    }
}

/// Behavior both backends must share. Each backend's test module runs every
/// case here against its own instance.
#[cfg(test)]
pub(crate) mod conformance {
    use chrono::Utc;

    use super::{DataStore, StoreError};
    use crate::ids::generate_id;
    use crate::models::{Answer, CreateThemeRequest, SubmitAnswerRequest, Theme};

    pub fn theme(title: &str) -> Theme {
        Theme::new(
            generate_id(),
            CreateThemeRequest {
                title: title.to_string(),
                description: "desc".to_string(),
                created_by: "tester".to_string(),
            },
            Utc::now(),
        )
    }

    pub fn answer(theme_id: &str, content: &str) -> Answer {
        Answer::new(
            generate_id(),
            theme_id.to_string(),
            SubmitAnswerRequest {
                content: content.to_string(),
                created_by: "tester".to_string(),
            },
            Utc::now(),
        )
    }

    pub fn theme_round_trip(store: &dyn DataStore) {
        let created = store.create_theme(theme("お題A")).unwrap();
        assert!(!created.id.is_empty());
        assert!(created.active);

        let fetched = store.get_theme(&created.id).unwrap();
        assert_eq!(fetched, created);

        let listed = store.list_themes().unwrap();
        assert!(listed.iter().any(|t| t.id == created.id));
    }

    pub fn missing_theme_is_not_found(store: &dyn DataStore) {
        assert!(matches!(store.get_theme("missing"), Err(StoreError::NotFound)));
        assert!(matches!(store.delete_theme("missing"), Err(StoreError::NotFound)));

        let mut ghost = theme("ghost");
        ghost.id = "missing".to_string();
        assert!(matches!(store.update_theme(ghost), Err(StoreError::NotFound)));
    }

    pub fn update_theme_preserves_created_at(store: &dyn DataStore) {
        let created = store.create_theme(theme("before")).unwrap();

        let mut changed = created.clone();
        changed.title = "after".to_string();
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        changed.updated_at = crate::models::next_timestamp(created.updated_at);
        let updated = store.update_theme(changed).unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(store.get_theme(&created.id).unwrap(), updated);
    }

    pub fn delete_theme_removes_it(store: &dyn DataStore) {
        let created = store.create_theme(theme("doomed")).unwrap();
        store.delete_theme(&created.id).unwrap();

        assert!(matches!(store.get_theme(&created.id), Err(StoreError::NotFound)));
        assert!(!store.list_themes().unwrap().iter().any(|t| t.id == created.id));
    }

    pub fn answer_round_trip(store: &dyn DataStore) {
        let parent = store.create_theme(theme("parent")).unwrap();
        let created = store.create_answer(answer(&parent.id, "回答1")).unwrap();
        assert_eq!(created.theme_id, parent.id);
        assert_eq!(created.likes, 0);

        let fetched = store.get_answer(&created.id, &parent.id).unwrap();
        assert_eq!(fetched, created);

        let listed = store.list_answers(&parent.id).unwrap();
        assert_eq!(listed, vec![created]);
    }

    pub fn answer_scoped_to_theme(store: &dyn DataStore) {
        let first = store.create_theme(theme("first")).unwrap();
        let second = store.create_theme(theme("second")).unwrap();
        let created = store.create_answer(answer(&first.id, "scoped")).unwrap();

        assert!(matches!(
            store.get_answer(&created.id, &second.id),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_answer(&created.id, &second.id),
            Err(StoreError::NotFound)
        ));

        let mut moved = created.clone();
        moved.theme_id = second.id.clone();
        assert!(matches!(store.update_answer(moved), Err(StoreError::NotFound)));

        assert!(store.list_answers(&second.id).unwrap().is_empty());
        assert_eq!(store.get_answer(&created.id, &first.id).unwrap(), created);
    }

    pub fn list_answers_empty_for_unknown_theme(store: &dyn DataStore) {
        let parent = store.create_theme(theme("quiet")).unwrap();
        assert!(store.list_answers(&parent.id).unwrap().is_empty());
        assert!(store.list_answers("no-such-theme").unwrap().is_empty());
    }

    pub fn create_answer_requires_theme(store: &dyn DataStore) {
        let before = store.list_themes().unwrap().len();

        let result = store.create_answer(answer("no-such-theme", "orphan"));
        assert!(matches!(result, Err(StoreError::NotFound)));

        assert_eq!(store.list_themes().unwrap().len(), before);
        assert!(matches!(store.get_theme("no-such-theme"), Err(StoreError::NotFound)));
        assert!(store.list_answers("no-such-theme").unwrap().is_empty());
    }

    pub fn update_answer_preserves_created_at(store: &dyn DataStore) {
        let parent = store.create_theme(theme("parent")).unwrap();
        let created = store.create_answer(answer(&parent.id, "old")).unwrap();

        let mut changed = created.clone();
        changed.content = "new".to_string();
        changed.likes = 5;
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        changed.updated_at = crate::models::next_timestamp(created.updated_at);
        let updated = store.update_answer(changed).unwrap();

        assert_eq!(updated.content, "new");
        assert_eq!(updated.likes, 5);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(store.get_answer(&created.id, &parent.id).unwrap(), updated);
    }

    pub fn delete_answer_removes_it(store: &dyn DataStore) {
        let parent = store.create_theme(theme("parent")).unwrap();
        let kept = store.create_answer(answer(&parent.id, "kept")).unwrap();
        let doomed = store.create_answer(answer(&parent.id, "doomed")).unwrap();

        store.delete_answer(&doomed.id, &parent.id).unwrap();

        assert!(matches!(
            store.get_answer(&doomed.id, &parent.id),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_answer(&doomed.id, &parent.id),
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.list_answers(&parent.id).unwrap(), vec![kept]);
    }

    /// Run every shared case against `store`.
    pub fn run_all(store: &dyn DataStore) {
        theme_round_trip(store);
        missing_theme_is_not_found(store);
        update_theme_preserves_created_at(store);
        delete_theme_removes_it(store);
        answer_round_trip(store);
        answer_scoped_to_theme(store);
        list_answers_empty_for_unknown_theme(store);
        create_answer_requires_theme(store);
        update_answer_preserves_created_at(store);
        delete_answer_removes_it(store);
    }
}
