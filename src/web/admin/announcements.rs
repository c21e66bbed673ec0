use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentAdmin, state::AppState},
    domain::{
        Announcement, AnnouncementKind, CreateAnnouncementRequest, UpdateAnnouncementRequest,
    },
    web::templates::HtmlTemplate,
};

use super::universities::{DeleteConfirmTemplate, NoticeQuery};

const DATETIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

pub struct AnnouncementRow {
    pub id: String,
    pub title: String,
    pub kind: &'static str,
    pub is_active: bool,
    pub is_live: bool,
    pub starts_at: String,
    pub ends_at: String,
}

#[derive(Template)]
#[template(path = "admin/announcements.html")]
pub struct AnnouncementsTemplate {
    pub admin_email: String,
    pub announcements: Vec<AnnouncementRow>,
    pub notice: Option<String>,
}

pub struct KindOption {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "admin/announcement_form.html")]
pub struct AnnouncementFormTemplate {
    pub admin_email: String,
    pub action_url: String,
    pub editing: bool,
    pub form: AnnouncementForm,
    pub kinds: Vec<KindOption>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementForm {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link_url: String,
    pub link_text: String,
    /// Checkbox: present when ticked.
    pub is_active: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
}

impl AnnouncementForm {
    fn from_announcement(a: &Announcement) -> Self {
        Self {
            title: a.title.clone(),
            message: a.message.clone(),
            kind: a.kind.as_str().to_string(),
            link_url: a.link_url.clone().unwrap_or_default(),
            link_text: a.link_text.clone().unwrap_or_default(),
            is_active: a.is_active.then(|| "on".to_string()),
            starts_at: format_local(a.starts_at),
            ends_at: a.ends_at.map(format_local).unwrap_or_default(),
        }
    }

    pub fn active(&self) -> bool {
        self.is_active.is_some()
    }

    fn kind(&self) -> AnnouncementKind {
        AnnouncementKind::from_str(&self.kind).unwrap_or_default()
    }

    fn to_create(&self) -> Result<CreateAnnouncementRequest, String> {
        Ok(CreateAnnouncementRequest {
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind(),
            link_url: Some(self.link_url.clone()),
            link_text: Some(self.link_text.clone()),
            is_active: Some(self.active()),
            starts_at: parse_local(&self.starts_at)?,
            ends_at: parse_local(&self.ends_at)?,
        })
    }

    fn to_update(&self) -> Result<UpdateAnnouncementRequest, String> {
        Ok(UpdateAnnouncementRequest {
            title: Some(self.title.clone()),
            message: Some(self.message.clone()),
            kind: Some(self.kind()),
            link_url: Some(Some(self.link_url.clone())),
            link_text: Some(Some(self.link_text.clone())),
            is_active: Some(self.active()),
            starts_at: parse_local(&self.starts_at)?,
            ends_at: Some(parse_local(&self.ends_at)?),
        })
    }
}

fn format_local(at: DateTime<Utc>) -> String {
    at.format(DATETIME_LOCAL).to_string()
}

/// Reads a `datetime-local` input (UTC). Blank means unset.
fn parse_local(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|_| format!("Invalid date and time: {}", value))
}

fn kinds(current: &str) -> Vec<KindOption> {
    [
        AnnouncementKind::Info,
        AnnouncementKind::Warning,
        AnnouncementKind::Success,
        AnnouncementKind::Urgent,
    ]
    .into_iter()
    .map(|kind| KindOption {
        value: kind.as_str(),
        selected: kind.as_str() == current,
    })
    .collect()
}

fn render_form(
    admin: &CurrentAdmin,
    id: Option<Uuid>,
    form: AnnouncementForm,
    error: Option<String>,
) -> Response {
    let action_url = match id {
        Some(id) => format!("/admin/announcements/{}/edit", id),
        None => "/admin/announcements/new".to_string(),
    };

    HtmlTemplate(AnnouncementFormTemplate {
        admin_email: admin.admin.email.clone(),
        action_url,
        editing: id.is_some(),
        kinds: kinds(&form.kind),
        form,
        error,
    })
    .into_response()
}

fn back_to_list(notice: &str) -> Response {
    Redirect::to(&format!("/admin/announcements?notice={}", urlencoding::encode(notice)))
        .into_response()
}

// GET /admin/announcements
pub async fn announcements_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    let announcements = match state.service_context.announcement_service.list_all().await {
        Ok(list) => list,
        Err(e) => return e.into_response(),
    };
    let now = Utc::now();

    let rows = announcements
        .iter()
        .map(|a| AnnouncementRow {
            id: a.id.to_string(),
            title: a.title.clone(),
            kind: a.kind.as_str(),
            is_active: a.is_active,
            is_live: a.is_live_at(now),
            starts_at: a.starts_at.format("%b %d, %Y %H:%M").to_string(),
            ends_at: a.ends_at
                .map(|e| e.format("%b %d, %Y %H:%M").to_string())
                .unwrap_or_else(|| "Open ended".to_string()),
        })
        .collect();

    HtmlTemplate(AnnouncementsTemplate {
        admin_email: current_admin.admin.email,
        announcements: rows,
        notice: query.notice,
    })
    .into_response()
}

// GET /admin/announcements/new
pub async fn new_announcement_page(
    Extension(current_admin): Extension<CurrentAdmin>,
) -> Response {
    let form = AnnouncementForm {
        kind: AnnouncementKind::Info.as_str().to_string(),
        is_active: Some("on".to_string()),
        ..AnnouncementForm::default()
    };
    render_form(&current_admin, None, form, None)
}

// POST /admin/announcements/new
pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let request = match form.to_create() {
        Ok(request) => request,
        Err(message) => return render_form(&current_admin, None, form, Some(message)),
    };

    match state.service_context.announcement_service.create(request).await {
        Ok(_) => back_to_list("Announcement created"),
        Err(e) => render_form(&current_admin, None, form, Some(e.to_string())),
    }
}

// GET /admin/announcements/:id/edit
pub async fn edit_announcement_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.service_context.announcement_service.get(id).await {
        Ok(announcement) => render_form(
            &current_admin,
            Some(id),
            AnnouncementForm::from_announcement(&announcement),
            None,
        ),
        Err(e) => e.into_response(),
    }
}

// POST /admin/announcements/:id/edit
pub async fn update_announcement(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let request = match form.to_update() {
        Ok(request) => request,
        Err(message) => return render_form(&current_admin, Some(id), form, Some(message)),
    };

    match state.service_context.announcement_service.update(id, request).await {
        Ok(_) => back_to_list("Announcement updated"),
        Err(e) => render_form(&current_admin, Some(id), form, Some(e.to_string())),
    }
}

// GET /admin/announcements/:id/delete
pub async fn delete_announcement_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Response {
    let announcement = match state.service_context.announcement_service.get(id).await {
        Ok(a) => a,
        Err(e) => return e.into_response(),
    };

    HtmlTemplate(DeleteConfirmTemplate {
        admin_email: current_admin.admin.email,
        title: format!("Delete \"{}\"?", announcement.title),
        description: "The announcement disappears from the banner immediately.".to_string(),
        confirm_url: format!("/admin/announcements/{}/delete", id),
        cancel_url: "/admin/announcements".to_string(),
    })
    .into_response()
}

// POST /admin/announcements/:id/delete
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.service_context.announcement_service.delete(id).await {
        Ok(()) => back_to_list("Announcement deleted"),
        Err(e) => {
            tracing::error!("Failed to delete announcement {}: {}", id, e);
            back_to_list("Delete failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_local_inputs() {
        assert_eq!(parse_local("  ").unwrap(), None);
        let parsed = parse_local("2025-08-01T09:30").unwrap().unwrap();
        assert_eq!(format_local(parsed), "2025-08-01T09:30");
        assert!(parse_local("August 1").is_err());
    }

    #[test]
    fn test_unticked_checkbox_deactivates() {
        let form = AnnouncementForm {
            title: "UPCAT".into(),
            message: "Results are out".into(),
            kind: "urgent".into(),
            ..AnnouncementForm::default()
        };
        let request = form.to_create().unwrap();
        assert_eq!(request.is_active, Some(false));
        assert_eq!(request.kind, AnnouncementKind::Urgent);
        assert_eq!(request.ends_at, None);
    }
}
