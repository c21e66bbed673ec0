use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{ApplicationStatus, ExamDate, University, UniversityInput},
    error::{AppError, Result},
    repository::UniversityRepository,
};

const SELECT_COLUMNS: &str = r#"
    SELECT id, slug, name, short_name, logo, exam_name, exam_fee,
           application_start, application_end, application_status,
           exam_dates, results_release, test_locations, requirements,
           admission_link, academic_year, created_at, updated_at
    FROM universities
"#;

#[derive(FromRow)]
struct UniversityRow {
    id: String,
    slug: String,
    name: String,
    short_name: String,
    logo: Option<String>,
    exam_name: String,
    exam_fee: Option<String>,
    application_start: String,
    application_end: String,
    application_status: String,
    exam_dates: String,
    results_release: String,
    test_locations: String,
    requirements: String,
    admission_link: String,
    academic_year: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteUniversityRepository {
    pool: SqlitePool,
}

impl SqliteUniversityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_university(row: UniversityRow) -> Result<University> {
        Ok(University {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            application_status: ApplicationStatus::from_str(&row.application_status).ok_or_else(|| {
                AppError::Database(format!("Invalid application status: {}", row.application_status))
            })?,
            exam_dates: decode_list::<ExamDate>(&row.exam_dates)?,
            test_locations: decode_list::<String>(&row.test_locations)?,
            requirements: decode_list::<String>(&row.requirements)?,
            slug: row.slug,
            name: row.name,
            short_name: row.short_name,
            logo: row.logo,
            exam_name: row.exam_name,
            exam_fee: row.exam_fee,
            application_start: row.application_start,
            application_end: row.application_end,
            results_release: row.results_release,
            admission_link: row.admission_link,
            academic_year: row.academic_year,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn map_write_error(e: sqlx::Error, slug: &str) -> AppError {
        let msg = e.to_string();
        if msg.contains("UNIQUE") {
            AppError::Conflict(format!("A university with slug '{}' already exists", slug))
        } else {
            AppError::Database(msg)
        }
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| AppError::Database(format!("Corrupt list column: {}", e)))
}

fn encode_list<T: serde::Serialize>(items: &[T]) -> Result<String> {
    serde_json::to_string(items).map_err(|e| AppError::Internal(e.to_string()))
}

/// Blank optional text is stored as NULL.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[async_trait]
impl UniversityRepository for SqliteUniversityRepository {
    async fn create(&self, input: UniversityInput) -> Result<University> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO universities (
                id, slug, name, short_name, logo, exam_name, exam_fee,
                application_start, application_end, application_status,
                exam_dates, results_release, test_locations, requirements,
                admission_link, academic_year, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.short_name)
        .bind(non_empty(&input.logo))
        .bind(&input.exam_name)
        .bind(non_empty(&input.exam_fee))
        .bind(&input.application_start)
        .bind(&input.application_end)
        .bind(input.application_status.as_str())
        .bind(encode_list(&input.exam_dates)?)
        .bind(&input.results_release)
        .bind(encode_list(&input.test_locations)?)
        .bind(encode_list(&input.requirements)?)
        .bind(&input.admission_link)
        .bind(&input.academic_year)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &input.slug))?;

        self.find_by_slug(&input.slug).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created university".to_string())
        })
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<University>> {
        let row = sqlx::query_as::<_, UniversityRow>(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_university(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<University>> {
        let rows = sqlx::query_as::<_, UniversityRow>(&format!("{} ORDER BY name ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_university)
            .collect()
    }

    async fn update(&self, slug: &str, input: UniversityInput) -> Result<University> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE universities
            SET name = ?, short_name = ?, logo = ?, exam_name = ?, exam_fee = ?,
                application_start = ?, application_end = ?, application_status = ?,
                exam_dates = ?, results_release = ?, test_locations = ?, requirements = ?,
                admission_link = ?, academic_year = ?, updated_at = ?
            WHERE slug = ?
            "#
        )
        .bind(&input.name)
        .bind(&input.short_name)
        .bind(non_empty(&input.logo))
        .bind(&input.exam_name)
        .bind(non_empty(&input.exam_fee))
        .bind(&input.application_start)
        .bind(&input.application_end)
        .bind(input.application_status.as_str())
        .bind(encode_list(&input.exam_dates)?)
        .bind(&input.results_release)
        .bind(encode_list(&input.test_locations)?)
        .bind(encode_list(&input.requirements)?)
        .bind(&input.admission_link)
        .bind(&input.academic_year)
        .bind(now)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("University not found".to_string()));
        }

        self.find_by_slug(slug).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated university".to_string())
        })
    }

    async fn delete(&self, slug: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM universities WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("University not found".to_string()));
        }

        Ok(())
    }
}
