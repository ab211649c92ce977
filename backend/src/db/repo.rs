use std::time::Duration;

use futures_util::stream::BoxStream;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions, types::Json};
use tokio::time::timeout;
use uuid::Uuid;

use crate::db::models::{Complaint, User, UserRow};

/// Typed access to the `users` and `complaints` collections.
///
/// Lookups report a miss as `Ok(None)`; every other storage failure comes
/// back as the underlying `sqlx::Error`. Updates do not report whether a
/// document matched.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        // Only the first connect is time-bounded; later checkouts keep the pool default
        let connect = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url);
        let pool = timeout(connect_timeout, connect)
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// A private in-memory database. Pinned to one connection that never
    /// expires, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BLOB PRIMARY KEY,
                secret_code TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                complaints TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS complaints (
                id BLOB PRIMARY KEY,
                title TEXT NOT NULL,
                summary TEXT NOT NULL,
                rating INTEGER NOT NULL,
                resolved BOOLEAN NOT NULL,
                user_id BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS users_secret_code ON users (secret_code)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS complaints_user_id ON complaints (user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<(), sqlx::Error> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, secret_code, name, email, complaints)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.secret_code)
        .bind(&user.name)
        .bind(&user.email)
        .bind(Json(&user.complaints))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, secret_code, name, email, complaints FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Secret codes are not unique; the earliest registered match wins.
    pub async fn find_user_by_secret_code(
        &self,
        secret_code: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, secret_code, name, email, complaints FROM users
            WHERE secret_code = ?
            ORDER BY rowid
            LIMIT 1
            "#,
        )
        .bind(secret_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Overwrites the whole complaint list of a user.
    pub async fn set_user_complaints(
        &self,
        user_id: Uuid,
        complaints: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET complaints = ? WHERE id = ?")
            .bind(Json(complaints.to_vec()))
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO complaints (id, title, summary, rating, resolved, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(complaint.id)
        .bind(&complaint.title)
        .bind(&complaint.summary)
        .bind(complaint.rating)
        .bind(complaint.resolved)
        .bind(complaint.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_complaint(&self, id: Uuid) -> Result<Option<Complaint>, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(
            "SELECT id, title, summary, rating, resolved, user_id FROM complaints WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub fn find_complaints_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxStream<'_, Result<Complaint, sqlx::Error>> {
        sqlx::query_as::<_, Complaint>(
            r#"
            SELECT id, title, summary, rating, resolved, user_id FROM complaints
            WHERE user_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(user_id)
        .fetch(&self.pool)
    }

    pub fn find_all_complaints(&self) -> BoxStream<'_, Result<Complaint, sqlx::Error>> {
        sqlx::query_as::<_, Complaint>(
            "SELECT id, title, summary, rating, resolved, user_id FROM complaints ORDER BY rowid",
        )
        .fetch(&self.pool)
    }

    pub async fn set_complaint_resolved(
        &self,
        id: Uuid,
        resolved: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE complaints SET resolved = ? WHERE id = ?")
            .bind(resolved)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
