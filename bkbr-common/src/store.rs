//! Local recipe store
//!
//! The single owner of the recipe document: a JSON array of [`Recipe`] at a
//! fixed path. Every mutation loads the current document, applies the change
//! in memory and rewrites the whole file through a temporary file in the same
//! directory, so a failed write never leaves a truncated document behind.
//!
//! Mutations are serialized by an in-process lock; there is no cross-process
//! locking.

use crate::recipe::Recipe;
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Recipe document file name inside the root folder
pub const RECIPES_FILE_NAME: &str = "recipes.json";

/// Persistent collection of saved recipes
#[derive(Debug)]
pub struct RecipeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecipeStore {
    /// Create a store backed by the document at `path`
    ///
    /// Nothing is read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all recipes in stored order
    ///
    /// A missing or undecodable document reads as an empty store.
    pub fn load(&self) -> Vec<Recipe> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Recipe document absent, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read recipe document");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Recipe>>(&data) {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Recipe document undecodable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Identifier the next saved recipe will receive
    pub fn next_id(&self) -> u64 {
        next_id_for(&self.load())
    }

    /// Look up a recipe by identifier
    pub fn get(&self, id: u64) -> Option<Recipe> {
        self.load().into_iter().find(|r| r.id == Some(id))
    }

    /// Append a recipe, assigning its identifier and a collision-free title
    ///
    /// Returns the recipe as stored.
    pub fn save(&self, mut recipe: Recipe) -> Result<Recipe> {
        let _guard = self.lock();

        let mut recipes = self.load();

        let title = unique_title(&recipes, &recipe.title);
        if title != recipe.title {
            info!(original = %recipe.title, renamed = %title, "Recipe title already saved, renaming");
            recipe.title = title;
        }
        recipe.id = Some(next_id_for(&recipes));

        recipes.push(recipe.clone());
        self.write_all(&recipes)?;

        info!(
            id = recipe.id.unwrap_or_default(),
            title = %recipe.title,
            total = recipes.len(),
            "Saved recipe"
        );
        Ok(recipe)
    }

    /// Remove the first recipe whose title matches exactly
    ///
    /// Returns the removed recipe, or `None` (without rewriting) if no title
    /// matched.
    pub fn delete(&self, title: &str) -> Result<Option<Recipe>> {
        let _guard = self.lock();

        let mut recipes = self.load();
        let Some(index) = recipes.iter().position(|r| r.title == title) else {
            debug!(title = %title, "No recipe with that title to delete");
            return Ok(None);
        };

        let removed = recipes.remove(index);
        self.write_all(&recipes)?;

        info!(id = removed.id.unwrap_or_default(), title = %removed.title, "Deleted recipe");
        Ok(Some(removed))
    }

    /// Replace the document with `recipes`
    ///
    /// Writes to a temporary file next to the document, syncs it and renames
    /// it over the original. On failure the previous document is untouched.
    pub fn write_all(&self, recipes: &[Recipe]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        std::fs::create_dir_all(&parent).map_err(|e| {
            Error::Save(format!("could not create '{}': {}", parent.display(), e))
        })?;

        let data = serde_json::to_vec_pretty(recipes)
            .map_err(|e| Error::Save(format!("could not encode recipes: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| {
            Error::Save(format!("could not create temporary file in '{}': {}", parent.display(), e))
        })?;
        tmp.write_all(&data)
            .and_then(|_| tmp.flush())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::Save(format!("could not write temporary file: {}", e)))?;
        tmp.persist(&self.path).map_err(|e| {
            Error::Save(format!("could not replace '{}': {}", self.path.display(), e.error))
        })?;

        debug!(path = %self.path.display(), count = recipes.len(), "Recipe document written");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `1 + max(id)` over recipes that have one, `1` for an empty store
pub fn next_id_for(recipes: &[Recipe]) -> u64 {
    recipes.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1
}

/// `title` if unused, else `"<title> (n)"` with the smallest free n >= 1
pub fn unique_title(recipes: &[Recipe], title: &str) -> String {
    let taken = |candidate: &str| recipes.iter().any(|r| r.title == candidate);

    if !taken(title) {
        return title.to_string();
    }

    let mut n = 1u32;
    loop {
        let candidate = format!("{} ({})", title, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::tests::sample;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RecipeStore {
        RecipeStore::new(dir.path().join(RECIPES_FILE_NAME))
    }

    #[test]
    fn test_next_id_empty_and_sparse() {
        assert_eq!(next_id_for(&[]), 1);

        let mut a = sample("A");
        a.id = Some(7);
        let b = sample("B"); // legacy entry without an id
        let mut c = sample("C");
        c.id = Some(3);
        assert_eq!(next_id_for(&[a, b, c]), 8);
    }

    #[test]
    fn test_unique_title_picks_smallest_free_suffix() {
        let recipes = vec![sample("Soup"), sample("Soup (1)"), sample("Soup (3)")];
        assert_eq!(unique_title(&recipes, "Stew"), "Stew");
        assert_eq!(unique_title(&recipes, "Soup"), "Soup (2)");
    }

    #[test]
    fn test_unique_title_suffixes_an_already_suffixed_title() {
        let recipes = vec![sample("Soup"), sample("Soup (1)")];
        assert_eq!(unique_title(&recipes, "Soup (1)"), "Soup (1) (1)");
    }

    #[test]
    fn test_load_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_load_garbage_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_assigns_id_and_renames() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = store.save(sample("Soup")).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(first.title, "Soup");

        let second = store.save(sample("Soup")).unwrap();
        assert_eq!(second.id, Some(2));
        assert_eq!(second.title, "Soup (1)");

        let loaded = store.load();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_delete_missing_title_leaves_document_alone() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(sample("Soup")).unwrap();
        let before = std::fs::read(store.path()).unwrap();

        assert_eq!(store.delete("Stew").unwrap(), None);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_write_failure_keeps_previous_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(sample("Soup")).unwrap();
        let before = std::fs::read(store.path()).unwrap();

        // A store whose document path is a directory cannot be replaced
        let blocked = RecipeStore::new(dir.path().join("blocked"));
        std::fs::create_dir(blocked.path()).unwrap();
        std::fs::write(blocked.path().join("keep"), b"x").unwrap();
        let err = blocked.save(sample("Stew")).unwrap_err();
        assert!(matches!(err, Error::Save(_)));
        assert!(err.to_string().starts_with("Failed to save recipes"));

        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        // No stray temporary files left next to the document
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }
}
