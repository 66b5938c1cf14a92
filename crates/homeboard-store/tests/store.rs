use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};
use homeboard_model::{
    Article, ArticlePatch, ArticleStatus, Clock, Listing, ManualClock, Record, User, UserRole,
};
use homeboard_store::{
    DraftConfig, DraftManager, DraftState, DurableStore, FallbackStorage, FileStorage,
    KeyValueStorage, MemoryStorage, Result, UnavailableStorage,
};
use serde_json::json;
use tempfile::tempdir;

/// Memory storage that counts writes.
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    sets: AtomicUsize,
}

impl KeyValueStorage for CountingStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 9, 14, 15, 30, 0).unwrap())
}

#[test]
fn added_record_reads_back_equal_apart_from_timestamps() {
    let clock = clock();
    let store: DurableStore<Listing> =
        DurableStore::new(Arc::new(MemoryStorage::new()), Arc::new(clock.clone()));
    let listing = Listing {
        title: "Harbour flat".to_string(),
        city: "Porto".to_string(),
        price: 310_000,
        bedrooms: 2,
        features: vec!["balcony".to_string()],
        ..Listing::default()
    };

    let collection = store.add("l-1", listing.clone());
    let id = collection.get("l-1").map(|r| r.id().to_string()).unwrap();
    let loaded = store.get_by_id(&id).unwrap();

    assert_eq!(loaded.fields(), &listing);
    assert_eq!(loaded.created_at(), clock.now());
    assert_eq!(loaded.updated_at(), clock.now());
}

#[test]
fn update_touches_only_the_target_record() {
    let clock = clock();
    let store: DurableStore<Article> =
        DurableStore::new(Arc::new(MemoryStorage::new()), Arc::new(clock.clone()));
    for (id, title) in [("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")] {
        store.add(
            id,
            Article {
                title: title.to_string(),
                ..Article::default()
            },
        );
    }
    let before = store.get_all();
    clock.advance_ms(60_000);

    let after = store.update(
        "b",
        &ArticlePatch {
            status: Some(ArticleStatus::Published),
            ..ArticlePatch::default()
        },
    );

    for (old, new) in before.iter().zip(after.iter()) {
        if old.id() == "b" {
            assert_eq!(new.fields().status, ArticleStatus::Published);
            assert_eq!(new.fields().title, "Beta");
            assert_eq!(new.created_at(), old.created_at());
            assert_eq!(new.updated_at(), clock.now());
        } else {
            assert_eq!(new, old);
        }
    }
}

#[test]
fn remove_unknown_id_is_a_noop() {
    let store: DurableStore<User> =
        DurableStore::new(Arc::new(MemoryStorage::new()), Arc::new(clock()));
    store.add("u1", User::default());

    let collection = store.remove("ghost");

    assert_eq!(collection.len(), 1);
}

#[test]
fn rapid_edits_collapse_into_one_write_of_the_last_value() {
    let storage = Arc::new(CountingStorage::default());
    let clock = clock();
    let mut manager: DraftManager<Article> = DraftManager::for_resource(
        storage.clone(),
        Arc::new(clock.clone()),
        &DraftConfig::default(),
    );

    for value in ["A", "AB", "ABC"] {
        manager.on_field_change("title", json!(value));
        assert!(!manager.tick());
        clock.advance_ms(100);
        assert!(!manager.tick());
    }
    assert_eq!(storage.sets.load(Ordering::SeqCst), 0);

    clock.advance_ms(300);
    assert!(manager.tick());
    clock.advance_ms(1000);
    assert!(!manager.tick());

    assert_eq!(storage.sets.load(Ordering::SeqCst), 1);
    assert_eq!(manager.load_draft().unwrap().title, "ABC");
}

#[test]
fn draft_survives_leaving_the_form_and_restores_once() {
    let dir = tempdir().unwrap();
    let clock = clock();
    let open = |dir: &std::path::Path| -> DraftManager<User> {
        let storage = Arc::new(FileStorage::open(dir).unwrap());
        DraftManager::for_resource(storage, Arc::new(clock.clone()), &DraftConfig::default())
    };

    let mut editor = open(dir.path());
    editor.on_field_change("name", json!("Lea"));
    editor.on_field_change("role", json!("Mover"));
    clock.advance_ms(400);
    assert!(editor.tick());
    // Navigating away drops the editor without clearing the draft.
    drop(editor);

    let mut editor = open(dir.path());
    let draft = editor.restore().unwrap();
    assert_eq!(draft.name, "Lea");
    assert_eq!(draft.role, UserRole::Mover);
    assert!(editor.restore().is_none());
}

#[test]
fn publish_moves_draft_into_collection_and_clears_it() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let clock = Arc::new(clock());
    let store: DurableStore<Article> = DurableStore::new(storage.clone(), clock.clone());
    let mut drafts: DraftManager<Article> =
        DraftManager::for_resource(storage.clone(), clock, &DraftConfig::default());

    drafts.on_field_change("title", json!("Spring market report"));
    drafts.on_field_change("category", json!("Real Estate"));

    let record = drafts
        .publish(&store, "a-42", |mut article| {
            article.status = ArticleStatus::Published;
            article
        })
        .unwrap();

    assert_eq!(record.id(), "a-42");
    assert_eq!(record.fields().status, ArticleStatus::Published);
    assert_eq!(drafts.state(), DraftState::Empty);
    assert!(drafts.load_draft().is_none());
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn publish_with_taken_id_keeps_the_draft() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let clock = Arc::new(clock());
    let store: DurableStore<Article> = DurableStore::new(storage.clone(), clock.clone());
    store.add("a-1", Article::default());
    let mut drafts: DraftManager<Article> =
        DraftManager::for_resource(storage, clock, &DraftConfig::default());
    drafts.save_draft(Article {
        title: "Mine".to_string(),
        ..Article::default()
    });

    assert!(drafts.publish(&store, "a-1", |a| a).is_none());
    assert_eq!(drafts.load_draft().unwrap().title, "Mine");
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn unavailable_storage_degrades_to_session_memory() {
    let storage = Arc::new(FallbackStorage::new(UnavailableStorage::new("no disk")));
    let store: DurableStore<Article> = DurableStore::new(storage.clone(), Arc::new(clock()));

    store.add("a", Article::default());
    store.add("b", Article::default());

    assert!(storage.is_degraded());
    assert_eq!(store.get_all().ids().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn two_handles_on_one_directory_last_write_wins() {
    let dir = tempdir().unwrap();
    let clock = Arc::new(clock());
    let tab_one: DurableStore<Article> =
        DurableStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()), clock.clone());
    let tab_two: DurableStore<Article> =
        DurableStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()), clock);

    // Both tabs read the empty collection before either writes.
    let stale_one = tab_one.get_all();
    let stale_two = tab_two.get_all();
    assert!(stale_one.is_empty() && stale_two.is_empty());

    tab_one.add("from-one", Article::default());
    tab_two.add("from-two", Article::default());

    // The second tab re-read before writing, so both records survive.
    let ids: Vec<_> = tab_one.get_all().ids().map(str::to_string).collect();
    assert_eq!(ids, vec!["from-two".to_string(), "from-one".to_string()]);

    // A raw overwrite of the key replaces everything: last write wins.
    FileStorage::open(dir.path())
        .unwrap()
        .set("articles", "[]")
        .unwrap();
    assert!(tab_one.get_all().is_empty());
}

#[test]
fn corrupt_file_on_disk_reads_as_empty_and_is_replaced_on_write() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("listings.json"), "{{{{").unwrap();
    let store: DurableStore<Listing> = DurableStore::new(
        Arc::new(FileStorage::open(dir.path()).unwrap()),
        Arc::new(clock()),
    );

    assert!(store.get_all().is_empty());
    store.add("l1", Listing::default());

    let text = std::fs::read_to_string(dir.path().join("listings.json")).unwrap();
    let parsed: Vec<Record<Listing>> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.len(), 1);
}
