//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `photos` table (one row per gallery photo; hrefs stay NULL and
///   `incomplete` stays 1 until the remote-storage sync resolves them)
/// - `categories` table (alias is a unique secondary key for label lookup)
/// - `photos_categories` junction (unordered pairs, UNIQUE per pair)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Photos
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS photos (
    photo_id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NULL,
    date_taken TEXT NULL, -- RFC3339
    hidden INTEGER NOT NULL DEFAULT 0,
    incomplete INTEGER NOT NULL DEFAULT 1,
    href_preview TEXT NULL,
    href_medium TEXT NULL,
    href_large TEXT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_photos_hidden ON photos(hidden);
CREATE INDEX IF NOT EXISTS idx_photos_incomplete ON photos(incomplete);

-- ---------------------------------------------------------------------------
-- Categories (alias is the label-lookup key)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    alias TEXT NOT NULL UNIQUE,
    description TEXT NULL,
    hidden INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_categories_hidden ON categories(hidden);

-- ---------------------------------------------------------------------------
-- Photo <-> category junction. No FK enforcement. Duplicate pairs are
-- rejected by the UNIQUE constraint and surfaced as per-pair faults.
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS photos_categories (
    photo_id INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    UNIQUE(photo_id, category_id)
);

CREATE INDEX IF NOT EXISTS idx_photos_categories_photo ON photos_categories(photo_id);
CREATE INDEX IF NOT EXISTS idx_photos_categories_category ON photos_categories(category_id);
"#;
