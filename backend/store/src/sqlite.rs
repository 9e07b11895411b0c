/// SQLite-backed forum store.
///
/// Uses `rusqlite` to run the aggregate queries against the forum's posts,
/// topics, users and sessions tables. Table names carry a configurable
/// prefix so the store can be pointed at an existing forum database.
use std::path::Path;

use activity24_core::{ActivityStore, SelectQuery, UserSession, UserType, ANONYMOUS_USER_ID};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Fully prefixed table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub posts: String,
    pub topics: String,
    pub users: String,
    pub sessions: String,
}

impl TableNames {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            posts: format!("{prefix}posts"),
            topics: format!("{prefix}topics"),
            users: format!("{prefix}users"),
            sessions: format!("{prefix}sessions"),
        }
    }
}

pub struct SqliteActivityStore {
    conn: Mutex<Connection>,
    tables: TableNames,
}

impl SqliteActivityStore {
    /// Open a forum database at the given path, creating missing tables.
    pub fn open(path: impl AsRef<Path>, table_prefix: &str) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite forum database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL journal")?;

        let tables = TableNames::with_prefix(table_prefix);
        init_schema(&conn, &tables).context("Failed to initialize forum schema")?;

        info!("SqliteActivityStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn), tables })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory(table_prefix: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let tables = TableNames::with_prefix(table_prefix);
        init_schema(&conn, &tables)?;
        Ok(Self { conn: Mutex::new(conn), tables })
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    pub async fn insert_post(&self, post_id: i64, post_time: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO {} (post_id, post_time) VALUES (?1, ?2)", self.tables.posts),
            params![post_id, post_time],
        )?;
        Ok(())
    }

    pub async fn insert_topic(&self, topic_id: i64, topic_time: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO {} (topic_id, topic_time) VALUES (?1, ?2)", self.tables.topics),
            params![topic_id, topic_time],
        )?;
        Ok(())
    }

    /// Insert a user row. `user_type` is the stored code (2 marks a bot).
    pub async fn insert_user(&self, user: &NewUser<'_>) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!(
                "INSERT INTO {} (user_id, user_type, username, username_clean, user_colour,
                                 user_regdate, user_lastvisit, user_allow_viewonline)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                self.tables.users
            ),
            params![
                user.user_id,
                user.user_type,
                user.username,
                user.username.to_lowercase(),
                user.colour,
                user.regdate,
                user.last_visit,
                user.allow_view_online,
            ],
        )?;
        Ok(())
    }

    pub async fn insert_session(
        &self,
        session_id: &str,
        user_id: i64,
        session_time: i64,
        ip: &str,
        view_online: bool,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!(
                "INSERT INTO {} (session_id, session_user_id, session_time, session_ip, session_viewonline)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.tables.sessions
            ),
            params![session_id, user_id, session_time, ip, view_online],
        )?;
        Ok(())
    }

    async fn count(&self, sql: &str, threshold: i64) -> Result<u64> {
        let conn = self.conn.lock().await;
        let n: i64 = conn
            .query_row(sql, params![threshold], |row| row.get(0))
            .with_context(|| format!("Count query failed: {sql}"))?;
        debug!(sql, count = n, "Count query");
        Ok(n.max(0) as u64)
    }
}

/// Fixture row for [`SqliteActivityStore::insert_user`].
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub user_id: i64,
    pub user_type: i64,
    pub username: &'a str,
    pub colour: &'a str,
    pub regdate: i64,
    pub last_visit: i64,
    pub allow_view_online: bool,
}

fn init_schema(conn: &Connection, t: &TableNames) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {posts} (
             post_id    INTEGER PRIMARY KEY,
             post_time  INTEGER NOT NULL DEFAULT 0
         );
         CREATE INDEX IF NOT EXISTS idx_{posts}_time ON {posts}(post_time);
         CREATE TABLE IF NOT EXISTS {topics} (
             topic_id   INTEGER PRIMARY KEY,
             topic_time INTEGER NOT NULL DEFAULT 0
         );
         CREATE INDEX IF NOT EXISTS idx_{topics}_time ON {topics}(topic_time);
         CREATE TABLE IF NOT EXISTS {users} (
             user_id               INTEGER PRIMARY KEY,
             user_type             INTEGER NOT NULL DEFAULT 0,
             username              TEXT NOT NULL,
             username_clean        TEXT NOT NULL,
             user_colour           TEXT NOT NULL DEFAULT '',
             user_regdate          INTEGER NOT NULL DEFAULT 0,
             user_lastvisit        INTEGER NOT NULL DEFAULT 0,
             user_allow_viewonline INTEGER NOT NULL DEFAULT 1
         );
         CREATE INDEX IF NOT EXISTS idx_{users}_lastvisit ON {users}(user_lastvisit);
         CREATE TABLE IF NOT EXISTS {sessions} (
             session_id         TEXT PRIMARY KEY,
             session_user_id    INTEGER NOT NULL,
             session_time       INTEGER NOT NULL DEFAULT 0,
             session_ip         TEXT NOT NULL DEFAULT '',
             session_viewonline INTEGER NOT NULL DEFAULT 1
         );
         CREATE INDEX IF NOT EXISTS idx_{sessions}_user ON {sessions}(session_user_id);",
        posts = t.posts,
        topics = t.topics,
        users = t.users,
        sessions = t.sessions,
    ))
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn count_posts_since(&self, threshold: i64) -> Result<u64> {
        let sql = format!("SELECT COUNT(post_id) FROM {} WHERE post_time > ?1", self.tables.posts);
        self.count(&sql, threshold).await
    }

    async fn count_topics_since(&self, threshold: i64) -> Result<u64> {
        let sql = format!("SELECT COUNT(topic_id) FROM {} WHERE topic_time > ?1", self.tables.topics);
        self.count(&sql, threshold).await
    }

    async fn count_users_registered_since(&self, threshold: i64) -> Result<u64> {
        let sql = format!("SELECT COUNT(user_id) FROM {} WHERE user_regdate > ?1", self.tables.users);
        self.count(&sql, threshold).await
    }

    async fn active_users(&self, query: &SelectQuery) -> Result<Vec<UserSession>> {
        let sql = query.build();
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .with_context(|| format!("Failed to prepare active user query: {sql}"))?;
        let rows = stmt
            .query_map([], row_to_session)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Active user query failed: {sql}"))?;
        debug!(rows = rows.len(), "Active user query");
        Ok(rows)
    }

    async fn distinct_guest_ips_since(&self, since: i64) -> Result<u64> {
        let sql = format!(
            "SELECT COUNT(DISTINCT session_ip) FROM {}
             WHERE session_user_id = ?1 AND session_time >= ?2",
            self.tables.sessions
        );
        let conn = self.conn.lock().await;
        let n: i64 = conn
            .query_row(&sql, params![ANONYMOUS_USER_ID, since], |row| row.get(0))
            .context("Guest count query failed")?;
        Ok(n.max(0) as u64)
    }
}

// ---------------------------------------------------------------------------
// Row deserialization helper
// ---------------------------------------------------------------------------

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<UserSession> {
    let user_id: i64 = row.get("user_id")?;
    let type_code: i64 = row.get("user_type")?;
    let colour: Option<String> = row.get("user_colour")?;
    let allow: i64 = row.get("user_allow_viewonline")?;
    let view_online: Option<i64> = row.get("session_viewonline")?;

    Ok(UserSession {
        user_id,
        username: row.get("username")?,
        user_colour: colour.unwrap_or_default(),
        user_type: UserType::from_row(user_id, type_code),
        last_visit: row.get("user_lastvisit")?,
        session_time: row.get("session_time")?,
        session_view_online: view_online.map(|v| v != 0),
        allow_view_online: allow != 0,
    })
}
