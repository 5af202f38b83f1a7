use super::*;

fn sample_doctors() -> Vec<Doctor> {
    vec![
        Doctor::new(1, "Ivanov", "Cardiology").with_experience("15 years"),
        Doctor::new("dr-2", "Petrova\nAnna", "Neurology").with_image("/uploads/petrova.png"),
    ]
}

#[tokio::test]
async fn memory_store_get_set_clear() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k").await.expect("get"), None);

    store.set("k", "v1").await.expect("set");
    store.set("k", "v2").await.expect("overwrite");
    assert_eq!(store.get("k").await.expect("get"), Some("v2".to_string()));

    store.clear("k").await.expect("clear");
    store.clear("k").await.expect("clear twice");
    assert_eq!(store.get("k").await.expect("get"), None);
}

#[tokio::test]
async fn sqlite_store_upserts_and_clears() {
    let store = SqliteStore::new("sqlite::memory:").await.expect("db");
    store.health_check().await.expect("health check");

    store.set("k", "first").await.expect("set");
    store.set("k", "second").await.expect("upsert");
    assert_eq!(
        store.get("k").await.expect("get"),
        Some("second".to_string())
    );

    store.clear("k").await.expect("clear");
    assert_eq!(store.get("k").await.expect("get"), None);
}

#[tokio::test]
async fn cache_round_trips_complete_snapshot_in_order() {
    let cache = DirectoryCache::in_memory();
    assert_eq!(cache.load().await, None);

    let doctors = sample_doctors();
    cache.save(&doctors).await.expect("save");
    assert_eq!(cache.load().await, Some(doctors));
}

#[tokio::test]
async fn later_save_replaces_snapshot_wholesale() {
    let cache = DirectoryCache::in_memory();
    cache.save(&sample_doctors()).await.expect("first save");

    let replacement = vec![Doctor::new(3, "Karimov", "Radiology")];
    cache.save(&replacement).await.expect("second save");

    assert_eq!(cache.load().await, Some(replacement));
}

#[tokio::test]
async fn empty_list_is_a_stored_snapshot_not_a_miss() {
    let cache = DirectoryCache::in_memory();
    cache.save(&[]).await.expect("save");
    assert_eq!(cache.load().await, Some(Vec::new()));
}

#[tokio::test]
async fn corrupt_snapshot_is_treated_as_miss() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(CACHED_DOCTORS_KEY, "{not json")
        .await
        .expect("seed corrupt");
    let cache = DirectoryCache::new(store.clone());
    assert_eq!(cache.load().await, None);

    store
        .set(CACHED_DOCTORS_KEY, r#"[{"id":1}]"#)
        .await
        .expect("seed partial record");
    assert_eq!(cache.load().await, None);
}

struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow::anyhow!("disk unavailable"))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow::anyhow!("disk unavailable"))
    }

    async fn clear(&self, _key: &str) -> Result<()> {
        Err(anyhow::anyhow!("disk unavailable"))
    }
}

#[tokio::test]
async fn store_read_failure_is_treated_as_miss() {
    let cache = DirectoryCache::new(Arc::new(BrokenStore));
    assert_eq!(cache.load().await, None);
    assert!(cache.save(&sample_doctors()).await.is_err());
}

#[tokio::test]
async fn cache_clear_removes_snapshot() {
    let cache = DirectoryCache::in_memory();
    cache.save(&sample_doctors()).await.expect("save");
    cache.clear().await.expect("clear");
    assert_eq!(cache.load().await, None);
}

#[test]
fn sqlite_path_ignores_memory_and_non_sqlite_urls() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/cache.db?mode=rwc"),
        Some(PathBuf::from("./data/cache.db"))
    );
}
