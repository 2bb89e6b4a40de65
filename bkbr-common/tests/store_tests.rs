//! Integration tests for the local recipe store
//!
//! Tests cover:
//! - Sequential id assignment across saves
//! - Title disambiguation with " (n)" suffixes
//! - Load-after-save consistency
//! - Delete by exact title
//! - Serialized concurrent saves

use bkbr_common::config::StoragePaths;
use bkbr_common::{Recipe, RecipeStore};
use std::sync::Arc;
use tempfile::TempDir;

fn recipe(title: &str) -> Recipe {
    serde_json::from_value(serde_json::json!({
        "host": "example.com",
        "title": title,
        "total_time": 30,
        "image": "https://example.com/a.jpg",
        "ingredients": [],
        "ingredient_groups": [],
        "instructions": "",
        "instructions_list": [],
        "yields": "2 servings"
    }))
    .expect("valid recipe json")
}

fn setup() -> (TempDir, RecipeStore) {
    let dir = TempDir::new().unwrap();
    let store = RecipeStore::new(StoragePaths::new(dir.path()).recipes_file());
    (dir, store)
}

#[test]
fn test_distinct_titles_get_sequential_ids() {
    let (_dir, store) = setup();

    for i in 0..10 {
        store.save(recipe(&format!("Dish {}", i))).unwrap();
    }

    let ids: Vec<u64> = store.load().iter().map(|r| r.id.unwrap()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
}

#[test]
fn test_soup_scenario() {
    let (_dir, store) = setup();

    store.save(recipe("Soup")).unwrap();
    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, Some(1));
    assert_eq!(loaded[0].title, "Soup");

    store.save(recipe("Soup")).unwrap();
    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].id, Some(2));
    assert_eq!(loaded[1].title, "Soup (1)");
}

#[test]
fn test_collision_chain_uses_smallest_free_suffix() {
    let (_dir, store) = setup();

    store.save(recipe("Soup")).unwrap();
    store.save(recipe("Soup")).unwrap();
    store.save(recipe("Soup")).unwrap();
    assert_eq!(store.load()[2].title, "Soup (2)");

    // Free up "(1)" and the next collision reuses it
    store.delete("Soup (1)").unwrap();
    let saved = store.save(recipe("Soup")).unwrap();
    assert_eq!(saved.title, "Soup (1)");
    assert_eq!(saved.id, Some(4));
}

#[test]
fn test_load_after_save_matches_returned_collection() {
    let (_dir, store) = setup();

    let mut expected = Vec::new();
    for title in ["Soup", "Stew", "Soup", "Bread"] {
        expected.push(store.save(recipe(title)).unwrap());
        assert_eq!(store.load(), expected);
    }
}

#[test]
fn test_delete_removes_only_exact_title() {
    let (_dir, store) = setup();

    store.save(recipe("Soup")).unwrap();
    store.save(recipe("Soup")).unwrap(); // "Soup (1)"
    store.save(recipe("Stew")).unwrap();

    let removed = store.delete("Soup").unwrap().expect("removed");
    assert_eq!(removed.id, Some(1));

    let titles: Vec<String> = store.load().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Soup (1)", "Stew"]);
}

#[test]
fn test_ids_not_reused_after_deleting_lower_entry() {
    let (_dir, store) = setup();

    store.save(recipe("A")).unwrap();
    store.save(recipe("B")).unwrap();
    store.save(recipe("C")).unwrap();
    store.delete("A").unwrap();

    let saved = store.save(recipe("D")).unwrap();
    assert_eq!(saved.id, Some(4));
    assert_eq!(store.get(4).unwrap().title, "D");
    assert!(store.get(1).is_none());
}

#[test]
fn test_document_is_json_array() {
    let (_dir, store) = setup();
    store.save(recipe("Soup")).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["id"], 1);
    assert_eq!(value[0]["title"], "Soup");
}

#[test]
fn test_concurrent_saves_are_serialized() {
    let (_dir, store) = setup();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.save(recipe(&format!("Dish {}", i))).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut ids: Vec<u64> = store.load().iter().map(|r| r.id.unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
}
