//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `patch.rs` / `patch_impl.rs`: partial-update payloads and their SQL
//! - `actor.rs`: the actor owning the pool, one message per store operation

pub mod actor;
pub mod models;
pub mod patch;
pub mod schema;

mod patch_impl;

pub use models::{DbCategory, DbPhoto, PhotoHrefs, Visibility};
pub use patch::{
    CategoryCreate, CategoryPatch, DbPatchable, GalleryCreate, GalleryPatch, PhotoCreate,
    PhotoPatch,
};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, RelationFault, spawn};
