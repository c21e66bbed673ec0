use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    api::{middleware::auth::CurrentAdmin, state::AppState},
    client::LocalRecordStore,
    controller::{
        DeleteOutcome, DraftList, FillOutcome, SaveOutcome, UniversityDraft, UniversityEditor,
    },
    domain::{ApplicationStatus, ExamDate, University},
    error::AppError,
    web::templates::HtmlTemplate,
};

#[derive(Template)]
#[template(path = "admin/universities.html")]
pub struct UniversitiesTemplate {
    pub admin_email: String,
    pub universities: Vec<University>,
    pub notice: Option<String>,
}

pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "admin/university_form.html")]
pub struct UniversityFormTemplate {
    pub admin_email: String,
    pub action_url: String,
    pub editing: bool,
    pub draft: UniversityDraft,
    pub statuses: Vec<StatusOption>,
    pub fill_text: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/delete_confirm.html")]
pub struct DeleteConfirmTemplate {
    pub admin_email: String,
    pub title: String,
    pub description: String,
    pub confirm_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// The editor form. List fields arrive as repeated keys, one per row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UniversityForm {
    pub slug: String,
    pub name: String,
    pub short_name: String,
    pub logo: String,
    pub exam_name: String,
    pub exam_fee: String,
    pub application_start: String,
    pub application_end: String,
    pub application_status: String,
    pub exam_date: Vec<String>,
    pub exam_note: Vec<String>,
    pub results_release: String,
    pub test_location: Vec<String>,
    pub requirement: Vec<String>,
    pub admission_link: String,
    pub academic_year: String,
    pub fill_text: String,
    pub action: String,
}

impl UniversityForm {
    fn into_draft(self) -> (UniversityDraft, String, String) {
        let mut notes = self.exam_note.into_iter();
        let exam_dates = self.exam_date
            .into_iter()
            .map(|date| ExamDate::new(date, notes.next().unwrap_or_default()))
            .collect();

        let mut draft = UniversityDraft {
            slug: self.slug,
            name: self.name,
            short_name: self.short_name,
            logo: self.logo,
            exam_name: self.exam_name,
            exam_fee: self.exam_fee,
            application_start: self.application_start,
            application_end: self.application_end,
            application_status: ApplicationStatus::from_str(&self.application_status)
                .unwrap_or_default(),
            exam_dates,
            results_release: self.results_release,
            test_locations: self.test_location,
            requirements: self.requirement,
            admission_link: self.admission_link,
            academic_year: self.academic_year,
        };
        draft.pad_lists();

        (draft, self.fill_text, self.action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Save,
    Fill,
    Add(DraftList),
    Remove(DraftList, usize),
}

impl FormAction {
    /// Parses `save`, `fill`, `add:<list>` and `remove:<list>:<index>`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(':');
        match (parts.next()?, parts.next(), parts.next()) {
            ("save", None, None) => Some(FormAction::Save),
            ("fill", None, None) => Some(FormAction::Fill),
            ("add", Some(list), None) => DraftList::from_str(list).map(FormAction::Add),
            ("remove", Some(list), Some(index)) => {
                let list = DraftList::from_str(list)?;
                index.parse().ok().map(|i| FormAction::Remove(list, i))
            }
            _ => None,
        }
    }
}

fn statuses(current: ApplicationStatus) -> Vec<StatusOption> {
    [ApplicationStatus::Upcoming, ApplicationStatus::Ongoing, ApplicationStatus::Closed]
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: status == current,
        })
        .collect()
}

fn editor(state: &AppState) -> UniversityEditor {
    let store = Arc::new(LocalRecordStore::new(state.service_context.clone()));
    UniversityEditor::new(store.clone(), store)
}

fn render_form(
    admin: &CurrentAdmin,
    editor: &UniversityEditor,
    error: Option<String>,
    notice: Option<String>,
) -> Response {
    let action_url = match editor.editing() {
        Some(slug) => format!("/admin/universities/{}/edit", slug),
        None => "/admin/universities/new".to_string(),
    };
    let draft = editor.draft().clone();

    HtmlTemplate(UniversityFormTemplate {
        admin_email: admin.admin.email.clone(),
        action_url,
        editing: editor.is_slug_locked(),
        statuses: statuses(draft.application_status),
        draft,
        fill_text: editor.fill_text().to_string(),
        error,
        notice,
    })
    .into_response()
}

// GET /admin
pub async fn universities_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    let universities = match state.service_context.university_service.list().await {
        Ok(list) => list,
        Err(e) => return e.into_response(),
    };

    HtmlTemplate(UniversitiesTemplate {
        admin_email: current_admin.admin.email,
        universities,
        notice: query.notice,
    })
    .into_response()
}

// GET /admin/universities/new
pub async fn new_university_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
) -> Response {
    let mut editor = editor(&state);
    editor.open_create();
    render_form(&current_admin, &editor, None, None)
}

// GET /admin/universities/:slug/edit
pub async fn edit_university_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(slug): Path<String>,
) -> Response {
    let mut editor = editor(&state);
    if let Err(e) = editor.refresh().await {
        return e.into_response();
    }
    if !editor.open_edit(&slug) {
        return AppError::NotFound("University not found".to_string()).into_response();
    }
    render_form(&current_admin, &editor, None, None)
}

// POST /admin/universities/new
pub async fn create_university(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Form(form): Form<UniversityForm>,
) -> Response {
    let mut editor = editor(&state);
    editor.open_create();
    submit(editor, &current_admin, form).await
}

// POST /admin/universities/:slug/edit
pub async fn update_university(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(slug): Path<String>,
    Form(form): Form<UniversityForm>,
) -> Response {
    let mut editor = editor(&state);
    if let Err(e) = editor.refresh().await {
        return e.into_response();
    }
    if !editor.open_edit(&slug) {
        return AppError::NotFound("University not found".to_string()).into_response();
    }
    submit(editor, &current_admin, form).await
}

/// Applies the posted draft to the editor, then runs the requested action.
async fn submit(mut editor: UniversityEditor, admin: &CurrentAdmin, form: UniversityForm) -> Response {
    let (mut draft, fill_text, action) = form.into_draft();
    if let Some(slug) = editor.editing() {
        draft.slug = slug.to_string();
    }
    *editor.draft_mut() = draft;
    editor.set_fill_text(fill_text);

    let Some(action) = FormAction::parse(&action) else {
        return render_form(admin, &editor, Some("Unknown form action".to_string()), None);
    };

    match action {
        FormAction::Save => match editor.save().await {
            SaveOutcome::Saved(university) => {
                let notice = format!("Saved {}", university.name);
                Redirect::to(&format!("/admin?notice={}", urlencoding::encode(&notice)))
                    .into_response()
            }
            SaveOutcome::Busy => render_form(admin, &editor, None, None),
            SaveOutcome::Failed(message) => render_form(admin, &editor, Some(message), None),
        },
        FormAction::Fill => match editor.magic_fill().await {
            FillOutcome::Merged(fields) if fields.is_empty() => render_form(
                admin,
                &editor,
                None,
                Some("No new details were found in the text".to_string()),
            ),
            FillOutcome::Merged(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
                let notice = format!("Filled: {}", names.join(", "));
                render_form(admin, &editor, None, Some(notice))
            }
            FillOutcome::Skipped => render_form(
                admin,
                &editor,
                Some("Paste the announcement text first".to_string()),
                None,
            ),
            FillOutcome::Failed(_) => render_form(
                admin,
                &editor,
                Some("Failed to extract admission details".to_string()),
                None,
            ),
        },
        FormAction::Add(list) => {
            editor.add_entry(list);
            render_form(admin, &editor, None, None)
        }
        FormAction::Remove(list, index) => {
            editor.remove_entry(list, index);
            render_form(admin, &editor, None, None)
        }
    }
}

// GET /admin/universities/:slug/delete
pub async fn delete_university_page(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    Path(slug): Path<String>,
) -> Response {
    let university = match state.service_context.university_service.get(&slug).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    HtmlTemplate(DeleteConfirmTemplate {
        admin_email: current_admin.admin.email,
        title: format!("Delete {}?", university.name),
        description: format!(
            "This removes {} ({}) from the public tracker.",
            university.short_name, university.exam_name
        ),
        confirm_url: format!("/admin/universities/{}/delete", university.slug),
        cancel_url: "/admin".to_string(),
    })
    .into_response()
}

// POST /admin/universities/:slug/delete
pub async fn delete_university(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let mut editor = editor(&state);
    // The confirmation page was the first press
    editor.delete(&slug).await;
    match editor.delete(&slug).await {
        DeleteOutcome::Deleted => {
            Redirect::to(&format!("/admin?notice={}", urlencoding::encode("University deleted")))
                .into_response()
        }
        DeleteOutcome::Armed | DeleteOutcome::Failed(_) => {
            Redirect::to(&format!("/admin?notice={}", urlencoding::encode("Delete failed")))
                .into_response()
        }
    }
}
