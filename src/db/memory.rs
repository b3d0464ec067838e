//! Volatile in-memory store.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{DataStore, StoreError, StoreResult};
use crate::models::{Answer, Theme};

/// Process-memory backend.
///
/// Answers are indexed per theme (theme id, then answer id) so scoped lookups
/// are O(1). Ids, timestamps and defaults are taken from the caller as given.
/// Deleting a theme leaves its answers in place under the old theme id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    themes: RwLock<HashMap<String, Theme>>,
    answers: RwLock<HashMap<String, HashMap<String, Answer>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for MemoryStore {
    fn get_theme(&self, id: &str) -> StoreResult<Theme> {
        self.themes.read().get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn list_themes(&self) -> StoreResult<Vec<Theme>> {
        Ok(self.themes.read().values().cloned().collect())
    }

    fn create_theme(&self, theme: Theme) -> StoreResult<Theme> {
        let mut themes = self.themes.write();
        if themes.contains_key(&theme.id) {
            return Err(StoreError::Duplicate(theme.id));
        }
        themes.insert(theme.id.clone(), theme.clone());
        Ok(theme)
    }

    fn update_theme(&self, mut theme: Theme) -> StoreResult<Theme> {
        let mut themes = self.themes.write();
        let existing = themes.get_mut(&theme.id).ok_or(StoreError::NotFound)?;
        theme.created_at = existing.created_at;
        *existing = theme.clone();
        Ok(theme)
    }

    fn delete_theme(&self, id: &str) -> StoreResult<()> {
        self.themes
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn get_answer(&self, id: &str, theme_id: &str) -> StoreResult<Answer> {
        self.answers
            .read()
            .get(theme_id)
            .and_then(|bucket| bucket.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_answers(&self, theme_id: &str) -> StoreResult<Vec<Answer>> {
        Ok(self
            .answers
            .read()
            .get(theme_id)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default())
    }

    fn create_answer(&self, answer: Answer) -> StoreResult<Answer> {
        // Lock order: themes, then answers.
        let themes = self.themes.read();
        if !themes.contains_key(&answer.theme_id) {
            return Err(StoreError::NotFound);
        }

        let mut answers = self.answers.write();
        let bucket = answers.entry(answer.theme_id.clone()).or_default();
        if bucket.contains_key(&answer.id) {
            return Err(StoreError::Duplicate(answer.id));
        }
        bucket.insert(answer.id.clone(), answer.clone());
        Ok(answer)
    }

    fn update_answer(&self, mut answer: Answer) -> StoreResult<Answer> {
        let mut answers = self.answers.write();
        let existing = answers
            .get_mut(&answer.theme_id)
            .and_then(|bucket| bucket.get_mut(&answer.id))
            .ok_or(StoreError::NotFound)?;
        answer.created_at = existing.created_at;
        *existing = answer.clone();
        Ok(answer)
    }

    fn delete_answer(&self, id: &str, theme_id: &str) -> StoreResult<()> {
        let mut answers = self.answers.write();
        let bucket = answers.get_mut(theme_id).ok_or(StoreError::NotFound)?;
        bucket.remove(id).ok_or(StoreError::NotFound)?;
        if bucket.is_empty() {
            answers.remove(theme_id);
        }
        Ok(())
    }
}
