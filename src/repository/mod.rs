use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod university_repository;
pub mod announcement_repository;
pub mod admin_repository;

pub use university_repository::SqliteUniversityRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use admin_repository::SqliteAdminRepository;

#[async_trait]
pub trait UniversityRepository: Send + Sync {
    async fn create(&self, input: UniversityInput) -> Result<University>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<University>>;
    async fn list(&self) -> Result<Vec<University>>;
    /// Replaces every field but the slug and stamps a fresh `updated_at`.
    async fn update(&self, slug: &str, input: UniversityInput) -> Result<University>;
    async fn delete(&self, slug: &str) -> Result<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self) -> Result<Vec<Announcement>>;
    /// Active announcements whose window contains `now`, newest first.
    async fn list_live(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>>;
    async fn update(&self, id: Uuid, announcement: Announcement) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, email: &str, password_hash: &str) -> Result<Admin>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>>;
    async fn password_hash(&self, email: &str) -> Result<Option<String>>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()>;
}
