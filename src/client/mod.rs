//! Collaborators of the admin editor: a record store for universities and
//! announcements, and the extraction endpoint. [`HttpRecordStore`] talks to a
//! running server; [`LocalRecordStore`] calls the service layer in process.

pub mod http;
pub mod local;

use async_trait::async_trait;

use crate::{
    domain::{Announcement, ExtractedFields, University, UniversityInput},
    error::Result,
};

pub use http::HttpRecordStore;
pub use local::LocalRecordStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_universities(&self) -> Result<Vec<University>>;
    async fn get_university(&self, slug: &str) -> Result<University>;
    async fn create_university(&self, input: &UniversityInput) -> Result<University>;
    async fn update_university(&self, slug: &str, input: &UniversityInput) -> Result<University>;
    async fn delete_university(&self, slug: &str) -> Result<()>;
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts admission details from pasted announcement text.
    async fn extract(&self, text: &str) -> Result<ExtractedFields>;
}
