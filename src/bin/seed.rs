use cet_tracker::{
    auth::AuthService,
    domain::{AnnouncementKind, ApplicationStatus, CreateAnnouncementRequest, ExamDate, UniversityInput},
    repository::{
        AdminRepository, SqliteAdminRepository,
        SqliteAnnouncementRepository, SqliteUniversityRepository,
        UniversityRepository,
    },
    service::{announcement_service::AnnouncementService, university_service::UniversityService},
};
use clap::Parser;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(about = "Create the admin account and optional sample data")]
struct Args {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://cet-tracker.db?mode=rwc")]
    database_url: String,

    /// Admin email; an existing account gets its password reset
    #[arg(long, default_value = "admin@cet-tracker.local")]
    email: String,

    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123")]
    password: String,

    /// Also insert sample universities and a welcome announcement
    #[arg(long)]
    sample: bool,
}

fn sample_universities() -> Vec<UniversityInput> {
    vec![
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
                ExamDate::new("August 10, 2025", "Batch 2"),
            ],
            results_release: "January 2026".to_string(),
            test_locations: vec!["UP Diliman".to_string(), "UP Los Baños".to_string(), "UP Cebu".to_string()],
            requirements: vec![
                "Accomplished application form".to_string(),
                "Grade 11 report card".to_string(),
                "2x2 ID photo".to_string(),
            ],
            admission_link: "https://upcat.up.edu.ph".to_string(),
            academic_year: "2026-2027".to_string(),
            ..UniversityInput::default()
        },
        UniversityInput {
            slug: "admu".to_string(),
            name: "Ateneo de Manila University".to_string(),
            short_name: "ADMU".to_string(),
            exam_name: "ACET".to_string(),
            exam_fee: Some("₱700".to_string()),
            application_start: "August 1, 2025".to_string(),
            application_end: "September 30, 2025".to_string(),
            application_status: ApplicationStatus::Ongoing,
            exam_dates: vec![ExamDate::new("October 2025", "Schedule sent by email")],
            results_release: "February 2026".to_string(),
            test_locations: vec!["Loyola Heights, Quezon City".to_string()],
            requirements: vec![
                "Online application".to_string(),
                "Grade 11 report card".to_string(),
            ],
            admission_link: "https://www.ateneo.edu/college/admission".to_string(),
            academic_year: "2026-2027".to_string(),
            ..UniversityInput::default()
        },
        UniversityInput {
            slug: "dlsu".to_string(),
            name: "De La Salle University".to_string(),
            short_name: "DLSU".to_string(),
            exam_name: "DCAT".to_string(),
            application_start: "October 2025".to_string(),
            application_end: "December 2025".to_string(),
            application_status: ApplicationStatus::Upcoming,
            admission_link: "https://www.dlsu.edu.ph/admissions".to_string(),
            academic_year: "2026-2027".to_string(),
            ..UniversityInput::default()
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Seeding {}", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let admin_repo = SqliteAdminRepository::new(db_pool.clone());
    let password_hash = AuthService::hash_password(&args.password).await?;

    match admin_repo.find_by_email(&args.email).await? {
        Some(admin) => {
            admin_repo.set_password_hash(admin.id, &password_hash).await?;
            println!("🔑 Reset password for {}", admin.email);
        }
        None => {
            let admin = admin_repo.create(&args.email, &password_hash).await?;
            println!("👤 Created admin {}", admin.email);
        }
    }

    if args.sample {
        let university_repo = Arc::new(SqliteUniversityRepository::new(db_pool.clone()));
        let universities = UniversityService::new(university_repo.clone());

        println!("🏫 Creating universities...");
        for input in sample_universities() {
            if university_repo.find_by_slug(&input.slug).await?.is_some() {
                println!("   skipped {} (exists)", input.slug);
                continue;
            }
            let created = universities.create(input).await?;
            println!("   {} ({})", created.name, created.exam_name);
        }

        println!("📢 Creating announcement...");
        let announcements = AnnouncementService::new(Arc::new(SqliteAnnouncementRepository::new(db_pool.clone())));
        announcements
            .create(CreateAnnouncementRequest {
                title: "ACET applications are open".to_string(),
                message: "Apply before September 30 to secure a testing slot.".to_string(),
                kind: AnnouncementKind::Info,
                link_url: Some("https://www.ateneo.edu/college/admission".to_string()),
                link_text: Some("Apply now".to_string()),
                ..CreateAnnouncementRequest::default()
            })
            .await?;
    }

    println!("✅ Done");
    Ok(())
}
