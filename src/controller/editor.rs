//! Admin editor for universities: the cached list, the open dialog's draft,
//! two-step delete, and AI fill.
//!
//! Each async operation comes in two halves (`begin_*` / `finish_*`) so a UI
//! can render the busy state between them; the combined methods run both.

use std::sync::Arc;

use crate::{
    client::{Extractor, RecordStore},
    domain::{ExtractedFields, University, UniversityInput},
    error::Result,
};

use super::draft::{DraftList, UniversityDraft};
use super::merge::{merge_extracted, DraftField};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create,
    Update(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub payload: UniversityInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(University),
    Busy,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// First press: the record is marked and a second press deletes it.
    Armed,
    Deleted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    Merged(Vec<DraftField>),
    /// Nothing to extract from, or a fill is already running.
    Skipped,
    Failed(String),
}

pub struct UniversityEditor {
    store: Arc<dyn RecordStore>,
    extractor: Arc<dyn Extractor>,
    universities: Vec<University>,
    draft: UniversityDraft,
    editing: Option<String>,
    dialog_open: bool,
    pending_delete: Option<String>,
    fill_text: String,
    saving: bool,
    filling: bool,
}

impl UniversityEditor {
    pub fn new(store: Arc<dyn RecordStore>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            store,
            extractor,
            universities: Vec::new(),
            draft: UniversityDraft::new(),
            editing: None,
            dialog_open: false,
            pending_delete: None,
            fill_text: String::new(),
            saving: false,
            filling: false,
        }
    }

    /// Refetches the list from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        self.universities = self.store.list_universities().await?;
        Ok(())
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn draft(&self) -> &UniversityDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut UniversityDraft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// The slug is fixed once a record exists.
    pub fn is_slug_locked(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.dialog_open
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_filling(&self) -> bool {
        self.filling
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn open_create(&mut self) {
        self.draft = UniversityDraft::new();
        self.editing = None;
        self.dialog_open = true;
        self.pending_delete = None;
    }

    /// Opens the dialog on a cached record; unknown slugs are ignored.
    pub fn open_edit(&mut self, slug: &str) -> bool {
        let Some(university) = self.universities.iter().find(|u| u.slug == slug) else {
            return false;
        };
        self.draft = UniversityDraft::from_university(university);
        self.editing = Some(university.slug.clone());
        self.dialog_open = true;
        self.pending_delete = None;
        true
    }

    pub fn close(&mut self) {
        self.dialog_open = false;
        self.draft = UniversityDraft::new();
        self.editing = None;
        self.fill_text.clear();
        self.pending_delete = None;
    }

    pub fn add_entry(&mut self, list: DraftList) {
        self.draft.add_entry(list);
    }

    pub fn remove_entry(&mut self, list: DraftList, index: usize) -> bool {
        self.draft.remove_entry(list, index)
    }

    /// Starts a save. Returns `None` while another save is in flight.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if self.saving {
            return None;
        }
        self.saving = true;

        let target = match &self.editing {
            Some(slug) => SaveTarget::Update(slug.clone()),
            None => SaveTarget::Create,
        };
        Some(SaveRequest {
            target,
            payload: self.draft.to_input(),
        })
    }

    /// Completes a save. On success the list is refetched and the dialog
    /// closes; on failure the draft stays open for another try.
    pub async fn finish_save(&mut self, result: Result<University>) -> SaveOutcome {
        self.saving = false;
        match result {
            Ok(saved) => {
                if let Err(e) = self.refresh().await {
                    tracing::warn!("Failed to refresh universities after save: {}", e);
                }
                self.close();
                SaveOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::error!("Failed to save university: {}", e);
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn save(&mut self) -> SaveOutcome {
        let Some(request) = self.begin_save() else {
            return SaveOutcome::Busy;
        };
        let result = match &request.target {
            SaveTarget::Create => self.store.create_university(&request.payload).await,
            SaveTarget::Update(slug) => self.store.update_university(slug, &request.payload).await,
        };
        self.finish_save(result).await
    }

    /// First press on a record arms it; a second press on the same record
    /// deletes it. Pressing a different record re-arms on that one.
    pub async fn delete(&mut self, slug: &str) -> DeleteOutcome {
        if self.pending_delete.as_deref() != Some(slug) {
            self.pending_delete = Some(slug.to_string());
            return DeleteOutcome::Armed;
        }

        match self.store.delete_university(slug).await {
            Ok(()) => {
                self.pending_delete = None;
                if let Err(e) = self.refresh().await {
                    tracing::warn!("Failed to refresh universities after delete: {}", e);
                }
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::error!("Failed to delete university {}: {}", slug, e);
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn set_fill_text(&mut self, text: impl Into<String>) {
        self.fill_text = text.into();
    }

    pub fn fill_text(&self) -> &str {
        &self.fill_text
    }

    pub fn can_fill(&self) -> bool {
        !self.filling && !self.fill_text.trim().is_empty()
    }

    /// Starts a fill and returns the text to send, if a fill may start.
    pub fn begin_fill(&mut self) -> Option<String> {
        if !self.can_fill() {
            return None;
        }
        self.filling = true;
        Some(self.fill_text.clone())
    }

    /// Merges a finished extraction into the draft. The pasted text is
    /// cleared only on success.
    pub fn finish_fill(&mut self, result: Result<ExtractedFields>) -> FillOutcome {
        self.filling = false;
        match result {
            Ok(fields) => {
                let changed = merge_extracted(&mut self.draft, &fields);
                self.fill_text.clear();
                tracing::info!(
                    "Filled {} field(s) from announcement text",
                    changed.len()
                );
                FillOutcome::Merged(changed)
            }
            Err(e) => {
                tracing::error!("Failed to extract admission details: {}", e);
                FillOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn magic_fill(&mut self) -> FillOutcome {
        let Some(text) = self.begin_fill() else {
            return FillOutcome::Skipped;
        };
        let result = self.extractor.extract(&text).await;
        self.finish_fill(result)
    }
}
