use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{Announcement, ExtractedFields, University, UniversityInput},
    error::Result,
    extraction::ExtractionRequest,
    service::ServiceContext,
};

use super::{Extractor, RecordStore};

pub struct LocalRecordStore {
    ctx: Arc<ServiceContext>,
}

impl LocalRecordStore {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn list_universities(&self) -> Result<Vec<University>> {
        self.ctx.university_service.list().await
    }

    async fn get_university(&self, slug: &str) -> Result<University> {
        self.ctx.university_service.get(slug).await
    }

    async fn create_university(&self, input: &UniversityInput) -> Result<University> {
        self.ctx.university_service.create(input.clone()).await
    }

    async fn update_university(&self, slug: &str, input: &UniversityInput) -> Result<University> {
        self.ctx.university_service.update(slug, input.clone().into()).await
    }

    async fn delete_university(&self, slug: &str) -> Result<()> {
        self.ctx.university_service.delete(slug).await
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        self.ctx.announcement_service.list_live().await
    }
}

#[async_trait]
impl Extractor for LocalRecordStore {
    async fn extract(&self, text: &str) -> Result<ExtractedFields> {
        self.ctx.extraction_service
            .extract(ExtractionRequest {
                image: None,
                text: Some(text.to_string()),
            })
            .await
    }
}
