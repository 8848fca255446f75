//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply the guild settings table to the connected `SQLite` database.
///
/// # Errors
///
/// Returns `AppError::Db` if the DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS guild_settings (
    guild_id            INTEGER PRIMARY KEY NOT NULL,
    member_channel_id   INTEGER,
    voice_channel_id    INTEGER,
    nickname_channel_id INTEGER,
    message_channel_id  INTEGER
);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
