use photon::PhotonError;
use photon::db::{GalleryCreate, GalleryPatch, PhotoCreate, PhotoHrefs, PhotoPatch, Visibility};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

async fn spawn_temp_db(tag: &str) -> (photon::db::DbActorHandle, PathBuf) {
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

fn photo(name: &str) -> PhotoCreate {
    PhotoCreate {
        name: name.to_string(),
        description: None,
        date_taken: None,
        hidden: false,
        hrefs: None,
    }
}

#[tokio::test]
async fn photo_without_hrefs_stays_incomplete_until_synced() {
    let (db, path) = spawn_temp_db("photo_incomplete").await;

    let id = db.create(GalleryCreate::Photo(photo("sunset"))).await.unwrap();
    assert!(id > 0);

    // Incomplete rows are invisible with default flags.
    let err = db.get_photo(id, Visibility::default()).await.unwrap_err();
    assert!(matches!(err, PhotonError::NotFound));

    let row = db
        .get_photo(
            id,
            Visibility {
                include_hidden: false,
                include_incomplete: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(row.name, "sunset");
    assert!(row.incomplete);
    assert_eq!(row.href_preview, None);

    let hrefs = PhotoHrefs {
        preview: "https://cdn/p".to_string(),
        medium: "https://cdn/m".to_string(),
        large: "https://cdn/l".to_string(),
    };
    db.set_photo_hrefs(id, hrefs).await.unwrap();

    let row = db.get_photo(id, Visibility::default()).await.unwrap();
    assert!(!row.incomplete);
    assert_eq!(row.href_medium.as_deref(), Some("https://cdn/m"));

    cleanup(&path).await;
}

#[tokio::test]
async fn photo_with_hrefs_is_complete_from_the_start() {
    let (db, path) = spawn_temp_db("photo_complete").await;

    let create = PhotoCreate {
        name: "dunes".to_string(),
        description: Some("evening light".to_string()),
        date_taken: Some(chrono::Utc::now()),
        hidden: false,
        hrefs: Some(PhotoHrefs {
            preview: "p".to_string(),
            medium: "m".to_string(),
            large: "l".to_string(),
        }),
    };
    let id = db.create(GalleryCreate::Photo(create)).await.unwrap();

    let row = db.get_photo(id, Visibility::default()).await.unwrap();
    assert!(!row.incomplete);
    assert_eq!(row.description.as_deref(), Some("evening light"));

    cleanup(&path).await;
}

#[tokio::test]
async fn hidden_photo_needs_the_include_hidden_flag() {
    let (db, path) = spawn_temp_db("photo_hidden").await;

    let create = PhotoCreate {
        hidden: true,
        hrefs: Some(PhotoHrefs::default()),
        ..photo("secret")
    };
    let id = db.create(GalleryCreate::Photo(create)).await.unwrap();

    let err = db.get_photo(id, Visibility::default()).await.unwrap_err();
    assert!(matches!(err, PhotonError::NotFound));

    let row = db
        .get_photo(
            id,
            Visibility {
                include_hidden: true,
                include_incomplete: false,
            },
        )
        .await
        .unwrap();
    assert!(row.hidden);

    cleanup(&path).await;
}

#[tokio::test]
async fn empty_patch_is_rejected_without_touching_the_row() {
    let (db, path) = spawn_temp_db("photo_empty_patch").await;

    let create = PhotoCreate {
        hrefs: Some(PhotoHrefs::default()),
        ..photo("pier")
    };
    let id = db.create(GalleryCreate::Photo(create)).await.unwrap();
    let before = db.get_photo(id, Visibility::default()).await.unwrap();

    let err = db
        .patch(GalleryPatch::Photo {
            id,
            patch: PhotoPatch::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PhotonError::BadRequest(_)));

    // Nothing was written, not even updated_at.
    let after = db.get_photo(id, Visibility::default()).await.unwrap();
    assert_eq!(before, after);

    cleanup(&path).await;
}

#[tokio::test]
async fn patching_an_unknown_id_reports_not_found() {
    let (db, path) = spawn_temp_db("photo_patch_missing").await;

    let err = db
        .patch(GalleryPatch::Photo {
            id: 4242,
            patch: PhotoPatch {
                name: Some("ghost".to_string()),
                ..PhotoPatch::default()
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PhotonError::NotFound));

    cleanup(&path).await;
}

#[tokio::test]
async fn patch_overwrites_only_supplied_fields() {
    let (db, path) = spawn_temp_db("photo_patch_partial").await;

    let create = PhotoCreate {
        description: Some("old description".to_string()),
        hrefs: Some(PhotoHrefs::default()),
        ..photo("harbor")
    };
    let id = db.create(GalleryCreate::Photo(create)).await.unwrap();

    db.patch(GalleryPatch::Photo {
        id,
        patch: PhotoPatch {
            name: Some("harbor at night".to_string()),
            hidden: Some(true),
            ..PhotoPatch::default()
        },
    })
    .await
    .unwrap();

    let row = db
        .get_photo(
            id,
            Visibility {
                include_hidden: true,
                include_incomplete: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(row.name, "harbor at night");
    assert!(row.hidden);
    // Untouched optional field survives the patch.
    assert_eq!(row.description.as_deref(), Some("old description"));

    cleanup(&path).await;
}

#[tokio::test]
async fn index_applies_both_visibility_filters() {
    let (db, path) = spawn_temp_db("photo_index").await;

    let visible = PhotoCreate {
        hrefs: Some(PhotoHrefs::default()),
        ..photo("visible")
    };
    let hidden = PhotoCreate {
        hidden: true,
        hrefs: Some(PhotoHrefs::default()),
        ..photo("hidden")
    };
    db.create(GalleryCreate::Photo(visible)).await.unwrap();
    db.create(GalleryCreate::Photo(hidden)).await.unwrap();
    db.create(GalleryCreate::Photo(photo("pending"))).await.unwrap();

    let default_rows = db.photo_index(Visibility::default()).await.unwrap();
    assert_eq!(default_rows.len(), 1);
    assert_eq!(default_rows[0].name, "visible");

    let all_rows = db.photo_index(Visibility::all()).await.unwrap();
    assert_eq!(all_rows.len(), 3);

    let incomplete = db.incomplete_photos().await.unwrap();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].name, "pending");

    cleanup(&path).await;
}
