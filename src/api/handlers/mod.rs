pub mod announcements;
pub mod auth;
pub mod extraction;
pub mod root;
pub mod universities;
