use std::sync::Arc;

use shared::domain::Doctor;
use storage::{DirectoryCache, KeyValueStore, SqliteStore, CACHED_DOCTORS_KEY};

#[tokio::test]
async fn snapshot_survives_reopening_the_cache_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("cache.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let doctors = vec![
        Doctor::new(1, "Ivanov", "Cardiology"),
        Doctor::new(2, "Petrova", "Neurology").with_education("Tashkent Medical Academy"),
    ];

    {
        let store = SqliteStore::new(&database_url).await.expect("open");
        let cache = DirectoryCache::new(Arc::new(store));
        cache.save(&doctors).await.expect("save");
    }

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = SqliteStore::new(&database_url).await.expect("reopen");
    let raw = reopened
        .get(CACHED_DOCTORS_KEY)
        .await
        .expect("raw read")
        .expect("slot present");
    assert!(raw.starts_with('['), "snapshot is a JSON array: {raw}");

    let cache = DirectoryCache::new(Arc::new(reopened));
    assert_eq!(cache.load().await, Some(doctors));
}
