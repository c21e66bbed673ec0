//! Interaction state behind the tracker's pages: browsing, the announcement
//! banner, and the admin editor.

pub mod banner;
pub mod catalog;
pub mod draft;
pub mod editor;
pub mod merge;

pub use banner::{Banner, BannerState, ROTATION_PERIOD};
pub use catalog::{Catalog, YearFilter};
pub use draft::{DraftList, UniversityDraft};
pub use editor::{DeleteOutcome, FillOutcome, SaveOutcome, UniversityEditor};
pub use merge::{merge_extracted, DraftField, MergePolicy};
