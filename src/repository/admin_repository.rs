use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::Admin,
    error::{AppError, Result},
    repository::AdminRepository,
};

#[derive(FromRow)]
struct AdminRow {
    id: String,
    email: String,
    created_at: NaiveDateTime,
}

pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_admin(row: AdminRow) -> Result<Admin> {
        Ok(Admin {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.email,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Admin> {
        let id = Uuid::new_v4();
        let email = email.trim().to_lowercase();

        sqlx::query(
            "INSERT INTO admins (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(&email)
        .bind(password_hash)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created admin".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, created_at FROM admins WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_admin).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, created_at FROM admins WHERE email = ?"
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_admin).transpose()
    }

    async fn password_hash(&self, email: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM admins WHERE email = ?"
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE admins SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
