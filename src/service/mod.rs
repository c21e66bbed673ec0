pub mod university_service;
pub mod announcement_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use crate::extraction::{ExtractionService, ModelClient};
use university_service::UniversityService;
use announcement_service::AnnouncementService;

pub struct ServiceContext {
    pub university_service: Arc<UniversityService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub auth_service: Arc<AuthService>,
    pub extraction_service: Arc<ExtractionService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        model_client: Arc<dyn ModelClient>,
        session_duration_hours: i64,
        secure_cookies: bool,
    ) -> Self {
        // Create repositories
        let university_repo = Arc::new(SqliteUniversityRepository::new(db_pool.clone()));
        let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(db_pool.clone()));
        let admin_repo: Arc<dyn AdminRepository> = Arc::new(SqliteAdminRepository::new(db_pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            db_pool.clone(),
            admin_repo.clone(),
            session_duration_hours,
            secure_cookies,
        ));

        Self {
            university_service: Arc::new(UniversityService::new(university_repo)),
            announcement_service: Arc::new(AnnouncementService::new(announcement_repo)),
            admin_repo,
            auth_service,
            extraction_service: Arc::new(ExtractionService::new(model_client)),
            db_pool,
        }
    }
}
