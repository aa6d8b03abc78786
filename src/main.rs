//! Lokal Jobs console front-end.
//!
//! Usage:
//!   lokaljobs jobs [PAGES]     list postings from the first PAGES pages (default 1)
//!   lokaljobs bookmarks        list bookmarked postings
//!   lokaljobs bookmark ID      toggle the bookmark of a posting on the first page

use lokaljobs::app::App;
use lokaljobs::logging;
use lokaljobs::managers::job_board::PageLoad;
use lokaljobs::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use lokaljobs::types::view::{BookmarkListView, JobListView};

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_jobs(view: &JobListView) {
    match view {
        JobListView::Loading => println!("  Loading Jobs..."),
        JobListView::Error { message } => println!("  {} (run again to retry)", message),
        JobListView::Empty { message } => println!("  {}", message),
        JobListView::Jobs { cards, error, .. } => {
            for card in cards {
                let mark = if card.bookmarked { "★" } else { "☆" };
                println!("  {} [{}] {}", mark, card.id, card.title);
                println!("      Location: {}", card.location);
                println!("      Salary: {}", card.salary);
                println!("      Type: {}", card.job_type);
            }
            if let Some(message) = error {
                println!();
                println!("  {} (run again to retry)", message);
            }
        }
    }
}

fn print_bookmarks(view: &BookmarkListView) {
    match view {
        BookmarkListView::Error { message } => println!("  {}", message),
        BookmarkListView::Empty { message } => println!("  {}", message),
        BookmarkListView::Bookmarks { cards } => {
            for card in cards {
                println!("  [{}] {}", card.id, card.title);
                println!("      📍 {}", card.location);
                println!("      💰 {}", card.salary);
                if !card.excerpt.is_empty() {
                    println!("      📝 {}", card.excerpt);
                }
            }
        }
    }
}

async fn list_jobs(app: &App, pages: u32) {
    section("Job Listings");
    let _ = app.board.load_initial().await;
    for _ in 1..pages {
        match app.board.load_more().await {
            Ok(PageLoad::Appended(_)) => continue,
            _ => break,
        }
    }
    print_jobs(&app.board.view());
}

async fn toggle(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let _ = app.board.load_initial().await;
    let job = match app.board.find_job(id) {
        Some(job) => job,
        None => {
            use lokaljobs::managers::bookmark_store::BookmarkStoreTrait;
            app.store
                .get(id)
                .await?
                .ok_or_else(|| format!("job {} is not on the first page", id))?
        }
    };
    let bookmarked = app.board.toggle_bookmark(&job).await?;
    let verb = if bookmarked { "Bookmarked" } else { "Removed bookmark for" };
    println!("  {} \"{}\"", verb, job.title);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = SettingsEngine::new(None);
    let loaded = settings.load();
    settings.apply_env_overrides();
    logging::init(&settings.get_settings().logging.level);
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "settings unreadable; using defaults");
    }

    let app = App::from_settings(&settings)?;
    let _ = app.startup().await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("jobs") => {
            let pages = args
                .get(1)
                .and_then(|p| p.parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);
            list_jobs(&app, pages).await;
        }
        Some("bookmarks") => {
            section("Bookmarked Jobs");
            print_bookmarks(&app.board.bookmark_view().await);
        }
        Some("bookmark") => {
            let id = args.get(1).ok_or("usage: lokaljobs bookmark ID")?;
            toggle(&app, id).await?;
        }
        Some(other) => {
            eprintln!("unknown command: {}", other);
            eprintln!("usage: lokaljobs [jobs [PAGES] | bookmarks | bookmark ID]");
            std::process::exit(2);
        }
    }
    Ok(())
}
