use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentAdmin, state::AppState},
    controller::{BannerState, Catalog, YearFilter},
    domain::{Announcement, University},
    error::AppError,
    web::templates::HtmlTemplate,
};

#[derive(Debug, Default, Deserialize)]
pub struct TrackerQuery {
    pub q: Option<String>,
    pub year: Option<String>,
    pub selected: Option<String>,
    /// Position of the banner slide to show.
    pub slide: Option<usize>,
    /// Comma-separated ids of dismissed announcements.
    pub hidden: Option<String>,
}

pub struct YearOption {
    pub value: String,
    pub selected: bool,
}

pub struct BannerView {
    pub announcement: Announcement,
    pub position: usize,
    pub count: usize,
    pub prev_href: String,
    pub next_href: String,
    pub dismiss_href: String,
    pub dot_hrefs: Vec<String>,
}

#[derive(Template)]
#[template(path = "tracker.html")]
pub struct TrackerTemplate {
    pub signed_in: bool,
    pub banner: Option<BannerView>,
    pub query: String,
    pub year: String,
    pub all_years: bool,
    pub years: Vec<YearOption>,
    pub universities: Vec<University>,
    pub selected: Option<University>,
    pub selected_slug: String,
    pub hidden: String,
    pub total: usize,
}

fn parse_hidden(hidden: Option<&str>) -> Vec<Uuid> {
    hidden
        .unwrap_or_default()
        .split(',')
        .filter_map(|id| Uuid::parse_str(id.trim()).ok())
        .collect()
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a Uuid>) -> String {
    ids.map(Uuid::to_string).collect::<Vec<_>>().join(",")
}

/// Builds a link back to the tracker that keeps the current browsing state.
fn tracker_href(query: &str, year: &str, selected: Option<&str>, slide: usize, hidden: &str) -> String {
    let mut params = vec![
        format!("q={}", urlencoding::encode(query)),
        format!("year={}", urlencoding::encode(year)),
    ];
    if let Some(slug) = selected {
        params.push(format!("selected={}", urlencoding::encode(slug)));
    }
    params.push(format!("slide={}", slide));
    if !hidden.is_empty() {
        params.push(format!("hidden={}", hidden));
    }
    format!("/?{}", params.join("&"))
}

fn banner_view(
    mut state: BannerState,
    query: &str,
    year: &str,
    selected: Option<&str>,
) -> Option<BannerView> {
    if !state.is_visible() {
        return None;
    }
    let count = state.active_len();
    let position = state.position();
    let announcement = state.current()?.clone();
    let hidden = join_ids(state.dismissed());

    let href = |slide: usize, hidden: &str| tracker_href(query, year, selected, slide, hidden);

    let mut after_dismiss = state.clone();
    after_dismiss.dismiss();
    let dismissed_hidden = join_ids(after_dismiss.dismissed());

    state.prev();
    let prev_href = href(state.position(), &hidden);
    state.next();
    state.next();
    let next_href = href(state.position(), &hidden);

    Some(BannerView {
        announcement,
        position,
        count,
        prev_href,
        next_href,
        dismiss_href: href(after_dismiss.position(), &dismissed_hidden),
        dot_hrefs: (0..count).map(|i| href(i, &hidden)).collect(),
    })
}

// GET /
pub async fn tracker_page(
    State(state): State<AppState>,
    admin: Option<Extension<CurrentAdmin>>,
    Query(params): Query<TrackerQuery>,
) -> Response {
    let ctx = &state.service_context;

    let universities = match ctx.university_service.list().await {
        Ok(list) => list,
        Err(e) => return e.into_response(),
    };
    // The page still renders when announcements cannot be loaded
    let announcements = ctx.announcement_service.list_live().await.unwrap_or_else(|e: AppError| {
        tracing::warn!("Failed to load announcements: {}", e);
        Vec::new()
    });

    let mut catalog = Catalog::new(universities);
    catalog.set_query(params.q.clone().unwrap_or_default());
    catalog.set_year(YearFilter::from_param(params.year.as_deref()));
    if let Some(slug) = params.selected.as_deref() {
        catalog.select(slug);
    }

    let query = catalog.query().to_string();
    let year = catalog.year().as_param().to_string();
    let selected_slug = catalog.selected().map(|u| u.slug.clone());

    let mut banner = BannerState::new(announcements)
        .with_dismissed(parse_hidden(params.hidden.as_deref()));
    if let Some(slide) = params.slide {
        banner.select(slide);
    }
    let hidden = join_ids(banner.dismissed());

    let template = TrackerTemplate {
        signed_in: admin.is_some(),
        banner: banner_view(banner, &query, &year, selected_slug.as_deref()),
        all_years: *catalog.year() == YearFilter::All,
        years: catalog
            .year_options()
            .into_iter()
            .map(|value| YearOption {
                selected: value == year,
                value,
            })
            .collect(),
        universities: catalog.filtered().into_iter().cloned().collect(),
        selected: catalog.selected().cloned(),
        selected_slug: selected_slug.clone().unwrap_or_default(),
        total: catalog.universities().len(),
        query,
        year,
        hidden,
    };

    HtmlTemplate(template).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_ids_ignore_garbage() {
        let id = Uuid::new_v4();
        let parsed = parse_hidden(Some(&format!("{id},not-an-id,")));
        assert_eq!(parsed, vec![id]);
        assert!(parse_hidden(None).is_empty());
    }

    #[test]
    fn test_href_keeps_browsing_state() {
        let href = tracker_href("de la salle", "2025-2026", Some("dlsu"), 2, "");
        assert_eq!(href, "/?q=de%20la%20salle&year=2025-2026&selected=dlsu&slide=2");
    }
}
