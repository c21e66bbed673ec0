//! Command-line client for a running CET Tracker server.

use std::sync::Arc;

use anyhow::{bail, Context};
use cet_tracker::{
    client::{HttpRecordStore, RecordStore},
    controller::{Banner, Catalog, FillOutcome, SaveOutcome, UniversityEditor, YearFilter},
    domain::{Announcement, University},
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(about = "Browse and maintain college entrance test schedules")]
struct Cli {
    /// Base URL of the tracker server
    #[arg(long, env = "CET_TRACKER_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List universities, optionally filtered
    List {
        #[arg(short, long)]
        query: Option<String>,
        /// Academic year, or "all"
        #[arg(short, long)]
        year: Option<String>,
    },
    /// Show one university in full
    Show { slug: String },
    /// Show live announcements, rotating every few seconds.
    /// Commands on stdin: n (next), p (previous), d (dismiss), a number, q (quit)
    Banner {
        /// Exit after this many updates
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Fill a university's admission details from an announcement text file and save
    Fill {
        slug: String,
        file: std::path::PathBuf,
        #[arg(long, env = "CET_ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "CET_ADMIN_PASSWORD")]
        password: String,
        /// Print the merged draft instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
}

fn print_row(u: &University) {
    let year = if u.academic_year.is_empty() { "-" } else { u.academic_year.as_str() };
    println!(
        "{:<12} {:<8} {:<10} {:<10} {}",
        u.slug,
        u.short_name,
        u.exam_name,
        u.application_status.short_label(),
        year
    );
}

fn print_detail(u: &University) {
    println!("{} ({})", u.name, u.short_name);
    println!("  Status:       {}", u.application_status.label());
    if !u.academic_year.is_empty() {
        println!("  Year:         {}", u.academic_year);
    }
    println!("  Exam:         {}", u.exam_name);
    println!("  Applications: {} to {}", u.application_start, u.application_end);
    if let Some(fee) = &u.exam_fee {
        println!("  Fee:          {}", fee);
    }
    for d in &u.exam_dates {
        if d.note.is_empty() {
            println!("  Exam date:    {}", d.date);
        } else {
            println!("  Exam date:    {} ({})", d.date, d.note);
        }
    }
    if !u.results_release.is_empty() {
        println!("  Results:      {}", u.results_release);
    }
    for location in &u.test_locations {
        println!("  Location:     {}", location);
    }
    for requirement in &u.requirements {
        println!("  Requirement:  {}", requirement);
    }
    if !u.admission_link.is_empty() {
        println!("  Link:         {}", u.admission_link);
    }
}

fn print_announcement(banner: &Banner) {
    let state = banner.snapshot();
    match state.current() {
        Some(a) => println!("{}", announcement_line(a, state.position(), state.active_len())),
        None => println!("(no announcements)"),
    }
}

fn announcement_line(a: &Announcement, position: usize, count: usize) -> String {
    let mut line = format!("[{}/{}] {}: {} - {}", position + 1, count, a.kind.as_str(), a.title, a.message);
    if let Some(url) = &a.link_url {
        line.push_str(&format!(" ({}: {})", a.link_label(), url));
    }
    line
}

async fn run_banner(store: &HttpRecordStore, cycles: Option<u64>) -> anyhow::Result<()> {
    let mut banner = Banner::new(store.list_announcements().await?);
    let mut changes = banner.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = 0u64;

    print_announcement(&banner);

    loop {
        if !banner.snapshot().is_visible() {
            break;
        }
        if cycles.is_some_and(|max| updates >= max) {
            break;
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "n" => banner.next(),
                    "p" => banner.prev(),
                    "d" => {
                        banner.dismiss();
                    }
                    "q" => break,
                    other => match other.parse::<usize>() {
                        Ok(n) if n > 0 && banner.select(n - 1) => {}
                        _ => eprintln!("commands: n, p, d, <number>, q"),
                    },
                }
                // Mark the change from the command as seen
                changes.borrow_and_update();
            }
        }

        updates += 1;
        print_announcement(&banner);
    }

    Ok(())
}

async fn run_fill(
    store: Arc<HttpRecordStore>,
    slug: &str,
    file: &std::path::Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let mut editor = UniversityEditor::new(store.clone(), store);
    editor.refresh().await?;
    if !editor.open_edit(slug) {
        bail!("no university with slug {}", slug);
    }
    editor.set_fill_text(text);

    match editor.magic_fill().await {
        FillOutcome::Merged(fields) if fields.is_empty() => {
            println!("No new details found; nothing to save");
            return Ok(());
        }
        FillOutcome::Merged(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
            println!("Filled: {}", names.join(", "));
        }
        FillOutcome::Skipped => bail!("announcement file is empty"),
        FillOutcome::Failed(message) => bail!("extraction failed: {}", message),
    }

    if dry_run {
        println!("{}", serde_json::to_string_pretty(editor.draft())?);
        return Ok(());
    }

    match editor.save().await {
        SaveOutcome::Saved(university) => {
            println!("Saved {}", university.name);
            print_detail(&university);
            Ok(())
        }
        SaveOutcome::Busy => bail!("a save is already running"),
        SaveOutcome::Failed(message) => bail!("save failed: {}", message),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(HttpRecordStore::new(&cli.url)?);

    match cli.command {
        Command::List { query, year } => {
            let mut catalog = Catalog::new(store.list_universities().await?);
            catalog.set_query(query.unwrap_or_default());
            catalog.set_year(YearFilter::from_param(year.as_deref()));

            let matches = catalog.filtered();
            for u in &matches {
                print_row(u);
            }
            println!(
                "{} of {} universities (years: {})",
                matches.len(),
                catalog.universities().len(),
                catalog.year_options().join(", ")
            );
        }
        Command::Show { slug } => {
            print_detail(&store.get_university(&slug).await?);
        }
        Command::Banner { cycles } => run_banner(&store, cycles).await?,
        Command::Fill { slug, file, email, password, dry_run } => {
            store.login(&email, &password).await?;
            let result = run_fill(store.clone(), &slug, &file, dry_run).await;
            if let Err(e) = store.logout().await {
                tracing::warn!("Failed to sign out: {}", e);
            }
            result?;
        }
    }

    Ok(())
}
