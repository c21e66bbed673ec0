use std::sync::Arc;

use crate::{
    domain::{University, UniversityInput, UpdateUniversityRequest},
    error::{AppError, Result},
    repository::UniversityRepository,
};

pub struct UniversityService {
    repo: Arc<dyn UniversityRepository>,
}

impl UniversityService {
    pub fn new(repo: Arc<dyn UniversityRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<University>> {
        self.repo.list().await
    }

    pub async fn get(&self, slug: &str) -> Result<University> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("University not found".to_string()))
    }

    pub async fn create(&self, input: UniversityInput) -> Result<University> {
        let input = normalize(input);
        input.validate().map_err(AppError::Validation)?;

        // Check for duplicate slug
        if self.repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A university with slug '{}' already exists",
                input.slug
            )));
        }

        let created = self.repo.create(input).await?;
        tracing::info!("Created university {}", created.slug);
        Ok(created)
    }

    /// Applies a partial update over the stored record. The slug is the
    /// record's identity and cannot be changed through an update.
    pub async fn update(&self, slug: &str, request: UpdateUniversityRequest) -> Result<University> {
        if let Some(requested) = request.slug.as_deref().map(str::trim) {
            if !requested.is_empty() && requested != slug {
                return Err(AppError::Validation("Slug cannot be changed".to_string()));
            }
        }

        let current = self.get(slug).await?;
        let input = normalize(request.apply_to(current));
        input.validate().map_err(AppError::Validation)?;

        let updated = self.repo.update(slug, input).await?;
        tracing::info!("Updated university {}", updated.slug);
        Ok(updated)
    }

    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.repo.delete(slug).await?;
        tracing::info!("Deleted university {}", slug);
        Ok(())
    }
}

fn normalize(mut input: UniversityInput) -> UniversityInput {
    input.slug = input.slug.trim().to_string();
    input.name = input.name.trim().to_string();
    input.short_name = input.short_name.trim().to_string();
    input.academic_year = input.academic_year.trim().to_string();
    input
}
