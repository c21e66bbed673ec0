use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo }
    }

    /// What the public banner gets: active and inside the display window.
    pub async fn list_live(&self) -> Result<Vec<Announcement>> {
        self.repo.list_live(Utc::now()).await
    }

    pub async fn list_all(&self) -> Result<Vec<Announcement>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        let now = Utc::now();
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            message: request.message.trim().to_string(),
            kind: request.kind,
            link_url: blank_to_none(request.link_url),
            link_text: blank_to_none(request.link_text),
            is_active: request.is_active.unwrap_or(true),
            starts_at: request.starts_at.unwrap_or(now),
            ends_at: request.ends_at,
            created_at: now,
            updated_at: now,
        };
        validate(&announcement)?;

        self.repo.create(announcement).await
    }

    pub async fn update(&self, id: Uuid, request: UpdateAnnouncementRequest) -> Result<Announcement> {
        let mut announcement = self.get(id).await?;

        // Apply updates
        if let Some(title) = request.title {
            announcement.title = title.trim().to_string();
        }
        if let Some(message) = request.message {
            announcement.message = message.trim().to_string();
        }
        if let Some(kind) = request.kind {
            announcement.kind = kind;
        }
        if let Some(link_url) = request.link_url {
            announcement.link_url = blank_to_none(link_url);
        }
        if let Some(link_text) = request.link_text {
            announcement.link_text = blank_to_none(link_text);
        }
        if let Some(is_active) = request.is_active {
            announcement.is_active = is_active;
        }
        if let Some(starts_at) = request.starts_at {
            announcement.starts_at = starts_at;
        }
        if let Some(ends_at) = request.ends_at {
            announcement.ends_at = ends_at;
        }

        announcement.updated_at = Utc::now();
        validate(&announcement)?;

        self.repo.update(id, announcement).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo.delete(id).await
    }
}

fn validate(announcement: &Announcement) -> Result<()> {
    if announcement.title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if announcement.message.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if let Some(ends_at) = announcement.ends_at {
        if ends_at <= announcement.starts_at {
            return Err(AppError::Validation("End must be after start".to_string()));
        }
    }
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
