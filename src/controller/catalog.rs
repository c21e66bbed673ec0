use crate::domain::University;

/// Query value meaning "no academic year filter".
pub const ALL_YEARS: &str = "all";

/// Offered when no record carries an academic year.
pub const FALLBACK_ACADEMIC_YEARS: [&str; 3] = ["2025-2026", "2024-2025", "2023-2024"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(String),
}

impl YearFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => YearFilter::All,
            Some(v) if v == ALL_YEARS => YearFilter::All,
            Some(v) => YearFilter::Year(v.to_string()),
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            YearFilter::All => ALL_YEARS,
            YearFilter::Year(year) => year,
        }
    }

    fn accepts(&self, academic_year: &str) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => academic_year == year,
        }
    }
}

/// Case-insensitive substring match on name or short name, combined with the
/// academic year filter.
pub fn matches(university: &University, query: &str, year: &YearFilter) -> bool {
    let needle = query.to_lowercase();
    let text_match = needle.is_empty()
        || [&university.name, &university.short_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

    text_match && year.accepts(&university.academic_year)
}

/// Distinct non-empty academic years, newest first, or the fallback list.
pub fn available_years(universities: &[University]) -> Vec<String> {
    let mut years: Vec<String> = universities
        .iter()
        .map(|u| u.academic_year.trim())
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .collect();
    years.sort_by(|a, b| b.cmp(a));
    years.dedup();

    if years.is_empty() {
        FALLBACK_ACADEMIC_YEARS.iter().map(|y| y.to_string()).collect()
    } else {
        years
    }
}

/// Browsing state of the public tracker: the loaded list, the search text,
/// the year filter and the selected university.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    universities: Vec<University>,
    query: String,
    year: YearFilter,
    selected: Option<String>,
}

impl Catalog {
    pub fn new(universities: Vec<University>) -> Self {
        Self {
            universities,
            ..Self::default()
        }
    }

    /// Swaps in a refetched list. A selection whose record disappeared is cleared.
    pub fn set_universities(&mut self, universities: Vec<University>) {
        self.universities = universities;
        if let Some(slug) = &self.selected {
            if !self.universities.iter().any(|u| &u.slug == slug) {
                self.selected = None;
            }
        }
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_year(&mut self, year: YearFilter) {
        self.year = year;
    }

    pub fn year(&self) -> &YearFilter {
        &self.year
    }

    pub fn filtered(&self) -> Vec<&University> {
        self.universities
            .iter()
            .filter(|u| matches(u, &self.query, &self.year))
            .collect()
    }

    pub fn year_options(&self) -> Vec<String> {
        available_years(&self.universities)
    }

    /// Selects by slug; unknown slugs leave the selection unchanged.
    pub fn select(&mut self, slug: &str) -> Option<&University> {
        if self.universities.iter().any(|u| u.slug == slug) {
            self.selected = Some(slug.to_string());
        }
        self.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&University> {
        let slug = self.selected.as_deref()?;
        self.universities.iter().find(|u| u.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApplicationStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn university(slug: &str, name: &str, short: &str, exam: &str, year: &str) -> University {
        University {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: name.to_string(),
            short_name: short.to_string(),
            logo: None,
            exam_name: exam.to_string(),
            exam_fee: None,
            application_start: String::new(),
            application_end: String::new(),
            application_status: ApplicationStatus::Upcoming,
            exam_dates: vec![],
            results_release: String::new(),
            test_locations: vec![],
            requirements: vec![],
            admission_link: String::new(),
            academic_year: year.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<University> {
        vec![
            university("up", "University of the Philippines", "UP", "UPCAT", "2025-2026"),
            university("admu", "Ateneo de Manila University", "ADMU", "ACET", "2025-2026"),
            university("dlsu", "De La Salle University", "DLSU", "DCAT", "2024-2025"),
        ]
    }

    fn slugs(list: Vec<&University>) -> Vec<&str> {
        list.into_iter().map(|u| u.slug.as_str()).collect()
    }

    #[test]
    fn test_query_matches_name_or_short_name() {
        let mut catalog = Catalog::new(sample());
        catalog.set_query("UP");
        assert_eq!(slugs(catalog.filtered()), vec!["up"]);

        // Exam names are not searched
        catalog.set_query("acet");
        assert!(catalog.filtered().is_empty());

        catalog.set_query("ateneo");
        assert_eq!(slugs(catalog.filtered()), vec!["admu"]);

        catalog.set_query("");
        assert_eq!(catalog.filtered().len(), 3);
    }

    #[test]
    fn test_query_whitespace_is_literal() {
        let mut catalog = Catalog::new(sample());
        catalog.set_query("UP ");
        assert!(catalog.filtered().is_empty());

        catalog.set_query(" Manila");
        assert_eq!(slugs(catalog.filtered()), vec!["admu"]);
    }

    #[test]
    fn test_year_filter_combines_with_query() {
        let mut catalog = Catalog::new(sample());
        catalog.set_year(YearFilter::from_param(Some("2024-2025")));
        assert_eq!(slugs(catalog.filtered()), vec!["dlsu"]);

        catalog.set_query("university");
        assert_eq!(slugs(catalog.filtered()), vec!["dlsu"]);

        catalog.set_year(YearFilter::from_param(Some("all")));
        assert_eq!(catalog.filtered().len(), 3);
    }

    #[test]
    fn test_year_options() {
        assert_eq!(available_years(&sample()), vec!["2025-2026", "2024-2025"]);

        let blank = vec![university("x", "X", "X", "X", "")];
        assert_eq!(available_years(&blank), FALLBACK_ACADEMIC_YEARS.to_vec());
    }

    #[test]
    fn test_selection_survives_refetch_only_if_present() {
        let mut catalog = Catalog::new(sample());
        assert_eq!(catalog.select("admu").map(|u| u.short_name.as_str()), Some("ADMU"));
        assert!(catalog.select("nope").is_some());

        catalog.set_universities(sample());
        assert!(catalog.selected().is_some());

        catalog.set_universities(vec![]);
        assert!(catalog.selected().is_none());
    }
}
