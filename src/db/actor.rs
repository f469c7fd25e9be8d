use crate::db::models::{DbCategory, DbPhoto, PhotoHrefs, Visibility};
use crate::db::patch::{DbPatchable, GalleryCreate, GalleryPatch};
use crate::db::schema::SQLITE_INIT;
use crate::error::PhotonError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

/// One relation pair that could not be inserted. Non-fatal: the assign
/// loop keeps going and reports these alongside an overall success.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RelationFault {
    pub photo_id: i64,
    pub category_id: i64,
    pub detail: String,
}

impl RelationFault {
    pub fn describe(&self) -> String {
        format!(
            "pair ({}, {}): {}",
            self.photo_id, self.category_id, self.detail
        )
    }
}

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a photo or category and return its new id.
    Create(GalleryCreate, RpcReplyPort<Result<i64, PhotonError>>),

    /// Partial-update a photo or category by id.
    Patch(GalleryPatch, RpcReplyPort<Result<(), PhotonError>>),

    GetPhoto(i64, Visibility, RpcReplyPort<Result<DbPhoto, PhotonError>>),
    PhotoIndex(Visibility, RpcReplyPort<Result<Vec<DbPhoto>, PhotonError>>),

    GetCategory(i64, bool, RpcReplyPort<Result<DbCategory, PhotonError>>),
    /// Label is a numeric id or an alias string, disambiguated by parse.
    CategoryByLabel(String, bool, RpcReplyPort<Result<DbCategory, PhotonError>>),
    CategoryIndex(bool, RpcReplyPort<Result<Vec<DbCategory>, PhotonError>>),

    AssignPhotoCategories(
        i64,
        Vec<i64>,
        RpcReplyPort<Result<Vec<RelationFault>, PhotonError>>,
    ),
    AssignCategoryPhotos(
        i64,
        Vec<i64>,
        RpcReplyPort<Result<Vec<RelationFault>, PhotonError>>,
    ),
    /// Delete-all for the key, then assign. The delete failing aborts the
    /// whole call before any insert.
    ReplacePhotoCategories(
        i64,
        Vec<i64>,
        RpcReplyPort<Result<Vec<RelationFault>, PhotonError>>,
    ),
    ReplaceCategoryPhotos(
        i64,
        Vec<i64>,
        RpcReplyPort<Result<Vec<RelationFault>, PhotonError>>,
    ),
    ClearPhotoCategories(i64, RpcReplyPort<Result<(), PhotonError>>),
    ClearCategoryPhotos(i64, RpcReplyPort<Result<(), PhotonError>>),

    CategoriesOfPhoto(i64, bool, RpcReplyPort<Result<Vec<DbCategory>, PhotonError>>),
    PhotosOfCategory(
        i64,
        Visibility,
        RpcReplyPort<Result<Vec<DbPhoto>, PhotonError>>,
    ),

    /// Photos still waiting for remote URL resolution (any hidden state).
    IncompletePhotos(RpcReplyPort<Result<Vec<DbPhoto>, PhotonError>>),
    /// Write the three URL variants and mark the row complete.
    SetPhotoHrefs(i64, PhotoHrefs, RpcReplyPort<Result<(), PhotonError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn create(&self, create: GalleryCreate) -> Result<i64, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::Create, create)
            .map_err(|e| PhotonError::Actor(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn patch(&self, patch: GalleryPatch) -> Result<(), PhotonError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| PhotonError::Actor(format!("DbActor Patch RPC failed: {e}")))?
    }

    pub async fn get_photo(&self, id: i64, vis: Visibility) -> Result<DbPhoto, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::GetPhoto, id, vis)
            .map_err(|e| PhotonError::Actor(format!("DbActor GetPhoto RPC failed: {e}")))?
    }

    pub async fn photo_index(&self, vis: Visibility) -> Result<Vec<DbPhoto>, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::PhotoIndex, vis)
            .map_err(|e| PhotonError::Actor(format!("DbActor PhotoIndex RPC failed: {e}")))?
    }

    pub async fn get_category(
        &self,
        id: i64,
        include_hidden: bool,
    ) -> Result<DbCategory, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::GetCategory, id, include_hidden)
            .map_err(|e| PhotonError::Actor(format!("DbActor GetCategory RPC failed: {e}")))?
    }

    pub async fn category_by_label(
        &self,
        label: &str,
        include_hidden: bool,
    ) -> Result<DbCategory, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::CategoryByLabel,
            label.to_string(),
            include_hidden
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor CategoryByLabel RPC failed: {e}")))?
    }

    pub async fn category_index(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<DbCategory>, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::CategoryIndex, include_hidden)
            .map_err(|e| PhotonError::Actor(format!("DbActor CategoryIndex RPC failed: {e}")))?
    }

    pub async fn assign_photo_categories(
        &self,
        photo_id: i64,
        category_ids: Vec<i64>,
    ) -> Result<Vec<RelationFault>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::AssignPhotoCategories,
            photo_id,
            category_ids
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor AssignPhotoCategories RPC failed: {e}")))?
    }

    pub async fn assign_category_photos(
        &self,
        category_id: i64,
        photo_ids: Vec<i64>,
    ) -> Result<Vec<RelationFault>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::AssignCategoryPhotos,
            category_id,
            photo_ids
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor AssignCategoryPhotos RPC failed: {e}")))?
    }

    pub async fn replace_photo_categories(
        &self,
        photo_id: i64,
        category_ids: Vec<i64>,
    ) -> Result<Vec<RelationFault>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::ReplacePhotoCategories,
            photo_id,
            category_ids
        )
        .map_err(|e| {
            PhotonError::Actor(format!("DbActor ReplacePhotoCategories RPC failed: {e}"))
        })?
    }

    pub async fn replace_category_photos(
        &self,
        category_id: i64,
        photo_ids: Vec<i64>,
    ) -> Result<Vec<RelationFault>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::ReplaceCategoryPhotos,
            category_id,
            photo_ids
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor ReplaceCategoryPhotos RPC failed: {e}")))?
    }

    pub async fn clear_photo_categories(&self, photo_id: i64) -> Result<(), PhotonError> {
        ractor::call!(self.actor, DbActorMessage::ClearPhotoCategories, photo_id)
            .map_err(|e| PhotonError::Actor(format!("DbActor ClearPhotoCategories RPC failed: {e}")))?
    }

    pub async fn clear_category_photos(&self, category_id: i64) -> Result<(), PhotonError> {
        ractor::call!(self.actor, DbActorMessage::ClearCategoryPhotos, category_id)
            .map_err(|e| PhotonError::Actor(format!("DbActor ClearCategoryPhotos RPC failed: {e}")))?
    }

    pub async fn categories_of_photo(
        &self,
        photo_id: i64,
        include_hidden: bool,
    ) -> Result<Vec<DbCategory>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::CategoriesOfPhoto,
            photo_id,
            include_hidden
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor CategoriesOfPhoto RPC failed: {e}")))?
    }

    pub async fn photos_of_category(
        &self,
        category_id: i64,
        vis: Visibility,
    ) -> Result<Vec<DbPhoto>, PhotonError> {
        ractor::call!(
            self.actor,
            DbActorMessage::PhotosOfCategory,
            category_id,
            vis
        )
        .map_err(|e| PhotonError::Actor(format!("DbActor PhotosOfCategory RPC failed: {e}")))?
    }

    pub async fn incomplete_photos(&self) -> Result<Vec<DbPhoto>, PhotonError> {
        ractor::call!(self.actor, DbActorMessage::IncompletePhotos)
            .map_err(|e| PhotonError::Actor(format!("DbActor IncompletePhotos RPC failed: {e}")))?
    }

    pub async fn set_photo_hrefs(&self, id: i64, hrefs: PhotoHrefs) -> Result<(), PhotonError> {
        ractor::call!(self.actor, DbActorMessage::SetPhotoHrefs, id, hrefs)
            .map_err(|e| PhotonError::Actor(format!("DbActor SetPhotoHrefs RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::Create(create, reply) => {
                let _ = reply.send(self.create_entity(pool, create).await);
            }
            DbActorMessage::Patch(patch, reply) => {
                let _ = reply.send(patch.apply_patch(pool).await);
            }
            DbActorMessage::GetPhoto(id, vis, reply) => {
                let _ = reply.send(self.get_photo(pool, id, vis).await);
            }
            DbActorMessage::PhotoIndex(vis, reply) => {
                let _ = reply.send(self.photo_index(pool, vis).await);
            }
            DbActorMessage::GetCategory(id, include_hidden, reply) => {
                let _ = reply.send(self.get_category(pool, id, include_hidden).await);
            }
            DbActorMessage::CategoryByLabel(label, include_hidden, reply) => {
                let _ = reply.send(self.category_by_label(pool, &label, include_hidden).await);
            }
            DbActorMessage::CategoryIndex(include_hidden, reply) => {
                let _ = reply.send(self.category_index(pool, include_hidden).await);
            }
            DbActorMessage::AssignPhotoCategories(photo_id, category_ids, reply) => {
                let pairs: Vec<(i64, i64)> =
                    category_ids.into_iter().map(|c| (photo_id, c)).collect();
                let _ = reply.send(self.assign_pairs(pool, &pairs).await);
            }
            DbActorMessage::AssignCategoryPhotos(category_id, photo_ids, reply) => {
                let pairs: Vec<(i64, i64)> =
                    photo_ids.into_iter().map(|p| (p, category_id)).collect();
                let _ = reply.send(self.assign_pairs(pool, &pairs).await);
            }
            DbActorMessage::ReplacePhotoCategories(photo_id, category_ids, reply) => {
                let pairs: Vec<(i64, i64)> =
                    category_ids.into_iter().map(|c| (photo_id, c)).collect();
                let _ = reply.send(self.replace_pairs(pool, "photo_id", photo_id, &pairs).await);
            }
            DbActorMessage::ReplaceCategoryPhotos(category_id, photo_ids, reply) => {
                let pairs: Vec<(i64, i64)> =
                    photo_ids.into_iter().map(|p| (p, category_id)).collect();
                let _ = reply.send(
                    self.replace_pairs(pool, "category_id", category_id, &pairs)
                        .await,
                );
            }
            DbActorMessage::ClearPhotoCategories(photo_id, reply) => {
                let _ = reply.send(self.clear_relations(pool, "photo_id", photo_id).await);
            }
            DbActorMessage::ClearCategoryPhotos(category_id, reply) => {
                let _ = reply.send(self.clear_relations(pool, "category_id", category_id).await);
            }
            DbActorMessage::CategoriesOfPhoto(photo_id, include_hidden, reply) => {
                let _ = reply.send(self.categories_of_photo(pool, photo_id, include_hidden).await);
            }
            DbActorMessage::PhotosOfCategory(category_id, vis, reply) => {
                let _ = reply.send(self.photos_of_category(pool, category_id, vis).await);
            }
            DbActorMessage::IncompletePhotos(reply) => {
                let _ = reply.send(self.incomplete_photos(pool).await);
            }
            DbActorMessage::SetPhotoHrefs(id, hrefs, reply) => {
                let _ = reply.send(self.set_photo_hrefs(pool, id, &hrefs).await);
            }
        }
        Ok(())
    }
}

const PHOTO_COLUMNS: &str = "photo_id, name, description, date_taken, hidden, incomplete, \
     href_preview, href_medium, href_large, created_at, updated_at";

const CATEGORY_COLUMNS: &str =
    "category_id, name, alias, description, hidden, created_at, updated_at";

impl DbActor {
    async fn create_entity(
        &self,
        pool: &SqlitePool,
        create: GalleryCreate,
    ) -> Result<i64, PhotonError> {
        match create {
            GalleryCreate::Photo(c) => {
                let now = Utc::now();
                // With all three hrefs known up front there is nothing left
                // for the sync loop to resolve.
                let incomplete = c.hrefs.is_none();
                let (preview, medium, large) = match c.hrefs {
                    Some(h) => (Some(h.preview), Some(h.medium), Some(h.large)),
                    None => (None, None, None),
                };

                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO photos (
                    name, description, date_taken, hidden, incomplete,
                    href_preview, href_medium, href_large, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING photo_id
                "#,
                )
                .bind(c.name)
                .bind(c.description)
                .bind(c.date_taken)
                .bind(c.hidden)
                .bind(incomplete)
                .bind(preview)
                .bind(medium)
                .bind(large)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }

            GalleryCreate::Category(c) => {
                let now = Utc::now();

                // Alias uniqueness is delegated to the UNIQUE constraint; a
                // conflict surfaces as a communication error.
                let id: i64 = sqlx::query_scalar(
                    r#"
                INSERT INTO categories (name, alias, description, hidden, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING category_id
                "#,
                )
                .bind(c.name)
                .bind(c.alias)
                .bind(c.description)
                .bind(c.hidden)
                .bind(now)
                .bind(now)
                .fetch_one(pool)
                .await?;

                Ok(id)
            }
        }
    }

    async fn get_photo(
        &self,
        pool: &SqlitePool,
        id: i64,
        vis: Visibility,
    ) -> Result<DbPhoto, PhotonError> {
        let row = sqlx::query_as::<_, DbPhoto>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE photo_id = ? AND (hidden = 0 OR ?) AND (incomplete = 0 OR ?)"
        ))
        .bind(id)
        .bind(vis.include_hidden)
        .bind(vis.include_incomplete)
        .fetch_optional(pool)
        .await?;

        row.ok_or(PhotonError::NotFound)
    }

    async fn photo_index(
        &self,
        pool: &SqlitePool,
        vis: Visibility,
    ) -> Result<Vec<DbPhoto>, PhotonError> {
        let rows = sqlx::query_as::<_, DbPhoto>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE (hidden = 0 OR ?) AND (incomplete = 0 OR ?) ORDER BY photo_id"
        ))
        .bind(vis.include_hidden)
        .bind(vis.include_incomplete)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn get_category(
        &self,
        pool: &SqlitePool,
        id: i64,
        include_hidden: bool,
    ) -> Result<DbCategory, PhotonError> {
        let row = sqlx::query_as::<_, DbCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE category_id = ? AND (hidden = 0 OR ?)"
        ))
        .bind(id)
        .bind(include_hidden)
        .fetch_optional(pool)
        .await?;

        row.ok_or(PhotonError::NotFound)
    }

    async fn category_by_label(
        &self,
        pool: &SqlitePool,
        label: &str,
        include_hidden: bool,
    ) -> Result<DbCategory, PhotonError> {
        // Numeric labels are ids; everything else is an alias lookup and an
        // unknown alias never reaches the id path.
        if let Ok(id) = label.parse::<i64>() {
            return self.get_category(pool, id, include_hidden).await;
        }

        let row = sqlx::query_as::<_, DbCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE alias = ? AND (hidden = 0 OR ?)"
        ))
        .bind(label)
        .bind(include_hidden)
        .fetch_optional(pool)
        .await?;

        row.ok_or(PhotonError::NotFound)
    }

    async fn category_index(
        &self,
        pool: &SqlitePool,
        include_hidden: bool,
    ) -> Result<Vec<DbCategory>, PhotonError> {
        let rows = sqlx::query_as::<_, DbCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE (hidden = 0 OR ?) ORDER BY category_id"
        ))
        .bind(include_hidden)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Insert one junction row per pair; a failing pair (typically the
    /// UNIQUE constraint) becomes a fault and the loop continues.
    async fn assign_pairs(
        &self,
        pool: &SqlitePool,
        pairs: &[(i64, i64)],
    ) -> Result<Vec<RelationFault>, PhotonError> {
        let mut faults = Vec::new();
        for &(photo_id, category_id) in pairs {
            let res = sqlx::query("INSERT INTO photos_categories (photo_id, category_id) VALUES (?, ?)")
                .bind(photo_id)
                .bind(category_id)
                .execute(pool)
                .await;
            if let Err(e) = res {
                warn!(photo_id, category_id, error = %e, "relation insert conflict");
                faults.push(RelationFault {
                    photo_id,
                    category_id,
                    detail: e.to_string(),
                });
            }
        }
        Ok(faults)
    }

    /// Replace the full relation set for one key inside a transaction: the
    /// delete failing aborts before any insert, per-pair insert conflicts
    /// are accumulated, and a partial outcome is never left behind.
    async fn replace_pairs(
        &self,
        pool: &SqlitePool,
        key_column: &str,
        key: i64,
        pairs: &[(i64, i64)],
    ) -> Result<Vec<RelationFault>, PhotonError> {
        let mut tx = pool.begin().await?;

        sqlx::query(&format!(
            "DELETE FROM photos_categories WHERE {key_column} = ?"
        ))
        .bind(key)
        .execute(&mut *tx)
        .await?;

        let mut faults = Vec::new();
        for &(photo_id, category_id) in pairs {
            let res = sqlx::query("INSERT INTO photos_categories (photo_id, category_id) VALUES (?, ?)")
                .bind(photo_id)
                .bind(category_id)
                .execute(&mut *tx)
                .await;
            if let Err(e) = res {
                warn!(photo_id, category_id, error = %e, "relation insert conflict");
                faults.push(RelationFault {
                    photo_id,
                    category_id,
                    detail: e.to_string(),
                });
            }
        }

        tx.commit().await?;
        Ok(faults)
    }

    async fn clear_relations(
        &self,
        pool: &SqlitePool,
        key_column: &str,
        key: i64,
    ) -> Result<(), PhotonError> {
        sqlx::query(&format!(
            "DELETE FROM photos_categories WHERE {key_column} = ?"
        ))
        .bind(key)
        .execute(pool)
        .await?;
        Ok(())
    }

    async fn categories_of_photo(
        &self,
        pool: &SqlitePool,
        photo_id: i64,
        include_hidden: bool,
    ) -> Result<Vec<DbCategory>, PhotonError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT category_id FROM photos_categories WHERE photo_id = ?")
                .bind(photo_id)
                .fetch_all(pool)
                .await?;

        // Zero junction rows and an unknown photo id are indistinguishable
        // here; both report not-found.
        if ids.is_empty() {
            return Err(PhotonError::NotFound);
        }

        let placeholders = id_placeholders(ids.len());
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE category_id IN ({placeholders}) AND (hidden = 0 OR ?) ORDER BY category_id"
        );
        let mut query = sqlx::query_as::<_, DbCategory>(&sql);
        for id in &ids {
            query = query.bind(id);
        }
        let rows = query.bind(include_hidden).fetch_all(pool).await?;

        Ok(rows)
    }

    async fn photos_of_category(
        &self,
        pool: &SqlitePool,
        category_id: i64,
        vis: Visibility,
    ) -> Result<Vec<DbPhoto>, PhotonError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT photo_id FROM photos_categories WHERE category_id = ?")
                .bind(category_id)
                .fetch_all(pool)
                .await?;

        if ids.is_empty() {
            return Err(PhotonError::NotFound);
        }

        let placeholders = id_placeholders(ids.len());
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE photo_id IN ({placeholders}) AND (hidden = 0 OR ?) AND (incomplete = 0 OR ?) \
             ORDER BY photo_id"
        );
        let mut query = sqlx::query_as::<_, DbPhoto>(&sql);
        for id in &ids {
            query = query.bind(id);
        }
        let rows = query
            .bind(vis.include_hidden)
            .bind(vis.include_incomplete)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }

    async fn incomplete_photos(&self, pool: &SqlitePool) -> Result<Vec<DbPhoto>, PhotonError> {
        let rows = sqlx::query_as::<_, DbPhoto>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE incomplete = 1 ORDER BY photo_id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn set_photo_hrefs(
        &self,
        pool: &SqlitePool,
        id: i64,
        hrefs: &PhotoHrefs,
    ) -> Result<(), PhotonError> {
        let res = sqlx::query(
            r#"
        UPDATE photos
        SET href_preview = ?, href_medium = ?, href_large = ?, incomplete = 0, updated_at = ?
        WHERE photo_id = ?
        "#,
        )
        .bind(&hrefs.preview)
        .bind(&hrefs.medium)
        .bind(&hrefs.large)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(PhotonError::NotFound);
        }
        Ok(())
    }
}

fn id_placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 3);
    for i in 0..n {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
    }
    s
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbActorHandle {
    // Anonymous spawn: the process-wide name registry would reject a second
    // actor (tests spawn one per case).
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbActorHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), PhotonError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
