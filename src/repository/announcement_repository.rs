use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Announcement, AnnouncementKind},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    message: String,
    kind: String,
    link_url: Option<String>,
    link_text: Option<String>,
    is_active: i32,
    starts_at: NaiveDateTime,
    ends_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            message: row.message,
            kind: AnnouncementKind::from_str(&row.kind)
                .ok_or_else(|| AppError::Database(format!("Invalid announcement type: {}", row.kind)))?,
            link_url: row.link_url,
            link_text: row.link_text,
            is_active: row.is_active != 0,
            starts_at: DateTime::from_naive_utc_and_offset(row.starts_at, Utc),
            ends_at: row.ends_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let id_str = announcement.id.to_string();
        let is_active_int = if announcement.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, message, kind, link_url, link_text, is_active,
                starts_at, ends_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.message)
        .bind(announcement.kind.as_str())
        .bind(&announcement.link_url)
        .bind(&announcement.link_text)
        .bind(is_active_int)
        .bind(announcement.starts_at.naive_utc())
        .bind(announcement.ends_at.map(|dt| dt.naive_utc()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, message, kind, link_url, link_text, is_active,
                   starts_at, ends_at, created_at, updated_at
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, message, kind, link_url, link_text, is_active,
                   starts_at, ends_at, created_at, updated_at
            FROM announcements
            ORDER BY starts_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn list_live(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>> {
        let now_naive = now.naive_utc();
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, message, kind, link_url, link_text, is_active,
                   starts_at, ends_at, created_at, updated_at
            FROM announcements
            WHERE is_active = 1
              AND starts_at <= ?
              AND (ends_at IS NULL OR ends_at > ?)
            ORDER BY starts_at DESC
            "#
        )
        .bind(now_naive)
        .bind(now_naive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement> {
        let is_active_int = if announcement.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, message = ?, kind = ?, link_url = ?, link_text = ?,
                is_active = ?, starts_at = ?, ends_at = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&announcement.title)
        .bind(&announcement.message)
        .bind(announcement.kind.as_str())
        .bind(&announcement.link_url)
        .bind(&announcement.link_text)
        .bind(is_active_int)
        .bind(announcement.starts_at.naive_utc())
        .bind(announcement.ends_at.map(|dt| dt.naive_utc()))
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        Ok(())
    }
}
