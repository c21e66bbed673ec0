mod common;

use cet_tracker::{
    domain::{ApplicationStatus, ExamDate, UniversityInput},
    error::AppError,
    repository::{SqliteUniversityRepository, UniversityRepository},
};

fn upcat() -> UniversityInput {
    UniversityInput {
        slug: "up".to_string(),
        name: "University of the Philippines".to_string(),
        short_name: "UP".to_string(),
        exam_name: "UPCAT".to_string(),
        exam_fee: Some("₱450".to_string()),
        application_start: "June 2, 2025".to_string(),
        application_end: "July 18, 2025".to_string(),
        application_status: ApplicationStatus::Closed,
        exam_dates: vec![
            ExamDate::new("August 9, 2025", "Batch 1"),
            ExamDate::new("August 10, 2025", ""),
        ],
        test_locations: vec!["UP Diliman".to_string(), "UP Cebu".to_string()],
        requirements: vec!["Grade 11 report card".to_string()],
        academic_year: "2026-2027".to_string(),
        ..UniversityInput::default()
    }
}

#[tokio::test]
async fn test_university_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUniversityRepository::new(pool.clone());

    // Create
    let created = repo.create(upcat()).await?;
    assert_eq!(created.slug, "up");
    assert_eq!(created.application_status, ApplicationStatus::Closed);
    assert_eq!(created.exam_dates.len(), 2);
    assert_eq!(created.exam_dates[0], ExamDate::new("August 9, 2025", "Batch 1"));
    assert_eq!(created.test_locations, vec!["UP Diliman", "UP Cebu"]);
    assert_eq!(created.logo, None);

    // Find
    let found = repo.find_by_slug("up").await?;
    assert_eq!(found.as_ref().map(|u| u.id), Some(created.id));
    assert!(repo.find_by_slug("admu").await?.is_none());

    // Update replaces every field but the slug
    let mut changed = upcat();
    changed.application_status = ApplicationStatus::Ongoing;
    changed.exam_dates = Vec::new();
    changed.exam_fee = Some("   ".to_string());
    let updated = repo.update("up", changed).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.application_status, ApplicationStatus::Ongoing);
    assert!(updated.exam_dates.is_empty());
    assert_eq!(updated.exam_fee, None);
    assert!(updated.updated_at >= created.updated_at);

    // Delete
    repo.delete("up").await?;
    assert!(repo.find_by_slug("up").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUniversityRepository::new(pool);

    repo.create(upcat()).await?;
    let err = repo.create(upcat()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn test_missing_university_is_not_found() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUniversityRepository::new(pool);

    assert!(matches!(repo.update("nope", upcat()).await, Err(AppError::NotFound(_))));
    assert!(matches!(repo.delete("nope").await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_list_is_ordered_by_name() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUniversityRepository::new(pool);

    for (slug, name) in [
        ("up", "University of the Philippines"),
        ("admu", "Ateneo de Manila University"),
        ("dlsu", "De La Salle University"),
    ] {
        repo.create(UniversityInput {
            slug: slug.to_string(),
            name: name.to_string(),
            ..UniversityInput::default()
        })
        .await?;
    }

    let slugs: Vec<String> = repo.list().await?.into_iter().map(|u| u.slug).collect();
    assert_eq!(slugs, vec!["admu", "dlsu", "up"]);

    Ok(())
}
