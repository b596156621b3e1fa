//! Schema bootstrap
//!
//! Creates missing tables at startup and pre-seeds static data. SQLite only;
//! column renames or type changes require a database wipe.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

const TABLES: &[(&str, &str)] = &[
    (
        "account",
        r#"
        CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "artists",
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            avatar TEXT,
            account_id INTEGER NOT NULL REFERENCES account(id),
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "songs",
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            played INTEGER NOT NULL DEFAULT 0,
            duration INTEGER NOT NULL DEFAULT 0,
            artist_id INTEGER NOT NULL REFERENCES artists(id),
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "song_source",
        r#"
        CREATE TABLE IF NOT EXISTS song_source (
            song_id INTEGER NOT NULL REFERENCES songs(id),
            provider_id INTEGER NOT NULL,
            source_id TEXT NOT NULL,
            source_uri TEXT NOT NULL DEFAULT '',
            created TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (song_id, provider_id, source_id)
        )
        "#,
    ),
    (
        "song_providers",
        r#"
        CREATE TABLE IF NOT EXISTS song_providers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type INTEGER NOT NULL,
            account_id INTEGER,
            device_id INTEGER,
            created TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (name, account_id, device_id)
        )
        "#,
    ),
    (
        "playlists",
        r#"
        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            avatar TEXT,
            played INTEGER NOT NULL DEFAULT 0,
            account_id INTEGER NOT NULL REFERENCES account(id),
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "playlist_items",
        r#"
        CREATE TABLE IF NOT EXISTS playlist_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlist_id INTEGER NOT NULL REFERENCES playlists(id),
            song_id INTEGER REFERENCES songs(id),
            radio_id INTEGER REFERENCES radios(id),
            created TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK ((song_id IS NULL) <> (radio_id IS NULL))
        )
        "#,
    ),
    (
        "radios",
        r#"
        CREATE TABLE IF NOT EXISTS radios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            avatar TEXT,
            stream_url TEXT NOT NULL,
            account_id INTEGER NOT NULL REFERENCES account(id),
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "devices",
        r#"
        CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_online INTEGER NOT NULL DEFAULT 0,
            is_playing INTEGER NOT NULL DEFAULT 0,
            account_id INTEGER NOT NULL REFERENCES account(id),
            created TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (name, account_id)
        )
        "#,
    ),
    (
        "device_commands",
        r#"
        CREATE TABLE IF NOT EXISTS device_commands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            command TEXT NOT NULL,
            target_id INTEGER NOT NULL REFERENCES devices(id),
            acknowledged INTEGER NOT NULL DEFAULT 0,
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    ),
    (
        "genres",
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "song_genre",
        r#"
        CREATE TABLE IF NOT EXISTS song_genre (
            song_id INTEGER NOT NULL REFERENCES songs(id),
            genre_id INTEGER NOT NULL REFERENCES genres(id),
            PRIMARY KEY (song_id, genre_id)
        )
        "#,
    ),
];

const DEFAULT_GENRES: &[&str] = &[
    "Pop", "Rock", "Hip-Hop", "Electronic", "Jazz", "Classical", "Latin", "Fado",
];

/// Create all tables and seed static data.
pub async fn init(pool: &SqlitePool) -> Result<()> {
    for &(name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        debug!(table = name, "schema ensured");
    }

    // provider id 1 is the built-in integration, resolved without a lookup
    sqlx::query("INSERT OR IGNORE INTO song_providers (id, name, type) VALUES (1, 'youtube', 1)")
        .execute(pool)
        .await?;

    let genre_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await?;
    if genre_count == 0 {
        for genre in DEFAULT_GENRES {
            sqlx::query("INSERT INTO genres (name) VALUES (?)")
                .bind(genre)
                .execute(pool)
                .await?;
        }
        debug!(count = DEFAULT_GENRES.len(), "genres seeded");
    }

    Ok(())
}
