use photon::PhotonError;
use photon::db::{
    CategoryCreate, DbActorHandle, GalleryCreate, PhotoCreate, PhotoHrefs, Visibility,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

async fn spawn_temp_db(tag: &str) -> (DbActorHandle, PathBuf) {
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    std::process::id().hash(&mut hasher);
    tag.hash(&mut hasher);
    let db_path = std::env::temp_dir().join(format!("photon_{}_{:016x}.sqlite", tag, hasher.finish()));
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());
    (photon::db::spawn(&database_url).await, db_path)
}

async fn cleanup(db_path: &Path) {
    let _ = fs::remove_file(format!("{}-wal", db_path.to_string_lossy())).await;
    let _ = fs::remove_file(format!("{}-shm", db_path.to_string_lossy())).await;
    fs::remove_file(db_path).await.unwrap();
}

async fn seed_photo(db: &DbActorHandle, name: &str, hidden: bool) -> i64 {
    db.create(GalleryCreate::Photo(PhotoCreate {
        name: name.to_string(),
        description: None,
        date_taken: None,
        hidden,
        hrefs: Some(PhotoHrefs::default()),
    }))
    .await
    .unwrap()
}

async fn seed_category(db: &DbActorHandle, name: &str, hidden: bool) -> i64 {
    db.create(GalleryCreate::Category(CategoryCreate {
        name: name.to_string(),
        alias: name.to_lowercase(),
        description: None,
        hidden,
    }))
    .await
    .unwrap()
}

#[tokio::test]
async fn assigning_no_categories_is_a_noop() {
    let (db, path) = spawn_temp_db("relation_noop").await;

    let photo_id = seed_photo(&db, "alone", false).await;
    let faults = db.assign_photo_categories(photo_id, vec![]).await.unwrap();
    assert!(faults.is_empty());

    // No junction rows were created either.
    assert!(matches!(
        db.categories_of_photo(photo_id, false).await.unwrap_err(),
        PhotonError::NotFound
    ));

    cleanup(&path).await;
}

#[tokio::test]
async fn duplicate_pair_in_a_batch_yields_one_fault() {
    let (db, path) = spawn_temp_db("relation_dup").await;

    let photo_id = seed_photo(&db, "city", false).await;
    let a = seed_category(&db, "Night", false).await;
    let b = seed_category(&db, "Urban", false).await;

    let faults = db
        .assign_photo_categories(photo_id, vec![a, b, b])
        .await
        .unwrap();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].photo_id, photo_id);
    assert_eq!(faults[0].category_id, b);

    // Both pairs exist exactly once.
    let categories = db.categories_of_photo(photo_id, false).await.unwrap();
    assert_eq!(
        categories.iter().map(|c| c.category_id).collect::<Vec<_>>(),
        vec![a, b]
    );

    cleanup(&path).await;
}

#[tokio::test]
async fn replace_swaps_the_full_relation_set() {
    let (db, path) = spawn_temp_db("relation_replace").await;

    let photo_id = seed_photo(&db, "ridge", false).await;
    let a = seed_category(&db, "Alps", false).await;
    let b = seed_category(&db, "Snow", false).await;
    let c = seed_category(&db, "Hiking", false).await;

    db.assign_photo_categories(photo_id, vec![a, b]).await.unwrap();

    let faults = db
        .replace_photo_categories(photo_id, vec![b, c])
        .await
        .unwrap();
    assert!(faults.is_empty());

    let categories = db.categories_of_photo(photo_id, false).await.unwrap();
    assert_eq!(
        categories.iter().map(|c| c.category_id).collect::<Vec<_>>(),
        vec![b, c]
    );

    cleanup(&path).await;
}

#[tokio::test]
async fn clearing_relations_reports_not_found_afterwards() {
    let (db, path) = spawn_temp_db("relation_clear").await;

    let photo_id = seed_photo(&db, "pier", false).await;
    let a = seed_category(&db, "Sea", false).await;
    db.assign_photo_categories(photo_id, vec![a]).await.unwrap();

    db.clear_photo_categories(photo_id).await.unwrap();

    // Zero junction rows and an unknown key are indistinguishable.
    assert!(matches!(
        db.categories_of_photo(photo_id, false).await.unwrap_err(),
        PhotonError::NotFound
    ));

    cleanup(&path).await;
}

#[tokio::test]
async fn relation_lookups_apply_visibility_filters() {
    let (db, path) = spawn_temp_db("relation_visibility").await;

    let photo_id = seed_photo(&db, "lantern", false).await;
    let visible = seed_category(&db, "Festivals", false).await;
    let hidden = seed_category(&db, "Unsorted", true).await;
    db.assign_photo_categories(photo_id, vec![visible, hidden])
        .await
        .unwrap();

    let default_view = db.categories_of_photo(photo_id, false).await.unwrap();
    assert_eq!(default_view.len(), 1);
    assert_eq!(default_view[0].category_id, visible);

    let full_view = db.categories_of_photo(photo_id, true).await.unwrap();
    assert_eq!(full_view.len(), 2);

    cleanup(&path).await;
}

#[tokio::test]
async fn photos_of_category_filter_hidden_and_incomplete() {
    let (db, path) = spawn_temp_db("relation_photos").await;

    let category_id = seed_category(&db, "Birds", false).await;
    let plain = seed_photo(&db, "plain", false).await;
    let hidden = seed_photo(&db, "hidden", true).await;
    let pending = db
        .create(GalleryCreate::Photo(PhotoCreate {
            name: "pending".to_string(),
            description: None,
            date_taken: None,
            hidden: false,
            hrefs: None,
        }))
        .await
        .unwrap();

    let faults = db
        .assign_category_photos(category_id, vec![plain, hidden, pending])
        .await
        .unwrap();
    assert!(faults.is_empty());

    let default_view = db
        .photos_of_category(category_id, Visibility::default())
        .await
        .unwrap();
    assert_eq!(default_view.len(), 1);
    assert_eq!(default_view[0].photo_id, plain);

    let full_view = db
        .photos_of_category(category_id, Visibility::all())
        .await
        .unwrap();
    assert_eq!(full_view.len(), 3);

    cleanup(&path).await;
}

#[tokio::test]
async fn lookup_without_any_relation_rows_is_not_found() {
    let (db, path) = spawn_temp_db("relation_missing_key").await;

    // The key was never assigned at all.
    assert!(matches!(
        db.photos_of_category(999, Visibility::default())
            .await
            .unwrap_err(),
        PhotonError::NotFound
    ));

    cleanup(&path).await;
}
