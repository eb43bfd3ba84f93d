mod api;
mod app;
mod config;
mod error;
mod filter;
mod markdown;
mod models;
mod pagination;
mod prefs;
mod scheme;
mod session;
mod theme;
mod translation;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use api::ApiClient;
use config::Config;
use filter::{total_pages, JobQuery, PerPage};
use models::Job;
use prefs::PrefStore;
use scheme::{SchemeMonitor, PROBE_INTERVAL};
use session::Session;
use theme::{Theme, ThemeController};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Browse, filter and save job listings from a job board API")]
struct Cli {
    /// Base URL of the job board API
    #[arg(long, global = true, env = "JOBBOARD_API_URL")]
    api_url: Option<String>,

    /// Directory for preferences and the log file
    #[arg(long, global = true, env = "JOBBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive browser (default)
    Browse,

    /// List one page of jobs
    List {
        /// Search title, company and description
        #[arg(short, long)]
        search: Option<String>,

        /// Only jobs from this source
        #[arg(long)]
        source: Option<String>,

        /// Only jobs in this location (repeatable)
        #[arg(short, long)]
        location: Vec<String>,

        /// Only favorited jobs
        #[arg(short, long)]
        favorites: bool,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Jobs per page (5, 10, 25 or 50); defaults to the saved preference
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Show job details
    Show {
        /// Job ID
        id: i64,
    },

    /// List job sources
    Sources,

    /// List known locations
    Locations,

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },

    /// Translate a job description and cache the result
    Translate {
        /// Job ID
        id: i64,
    },

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Inspect or change stored preferences
    Prefs {
        #[command(subcommand)]
        command: PrefCommands,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// List favorite job IDs
    List,
    /// Save a job as favorite
    Add { id: i64 },
    /// Remove a job from favorites
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Print the saved theme
    Show,
    /// Advance light → dark → system
    Cycle,
    /// Set the theme (light, dark, system)
    Set { theme: Theme },
}

#[derive(Subcommand)]
enum PrefCommands {
    /// Print every stored preference
    Show,
    /// Set the default page size
    SetPerPage { value: u32 },
    /// Drop all cached translations
    ClearTranslations,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.api_url, cli.data_dir);
    config::init_logging(&config.log_path())?;

    let prefs = PrefStore::open(&config.prefs_path())?;
    let client = ApiClient::new(&config.api_url);

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let monitor = SchemeMonitor::spawn(PROBE_INTERVAL).await;
            let theme = ThemeController::new(prefs.theme()?, monitor);
            let session = Session::new(prefs);
            app::App::new(session, theme, client).run().await?;
        }

        Commands::List {
            search,
            source,
            location,
            favorites,
            page,
            per_page,
        } => {
            let per_page = match per_page {
                Some(n) => PerPage::new(n)
                    .ok_or_else(|| anyhow!("per-page must be one of {:?}", PerPage::ALLOWED))?,
                None => prefs.per_page()?,
            };
            let query = JobQuery {
                page: page.max(1),
                per_page: per_page.get(),
                source: source.filter(|s| !s.is_empty()),
                search: search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
                favorites,
                locations: location,
            };
            let result = client.list_jobs(&query).await?;
            if result.jobs.is_empty() {
                println!("No jobs found.");
            } else {
                println!("{:<6} {:<32} {:<22} {:<18} {:<12}", "ID", "TITLE", "COMPANY", "LOCATION", "SOURCE");
                println!("{}", "-".repeat(94));
                for job in &result.jobs {
                    println!(
                        "{:<6} {:<32} {:<22} {:<18} {:<12}",
                        job.id,
                        truncate(&job.title, 30),
                        truncate(&job.company, 20),
                        truncate(&job.location, 16),
                        truncate(job.source_name().unwrap_or("-"), 12)
                    );
                }
            }
            println!(
                "\nPage {} of {} ({} jobs)",
                query.page,
                total_pages(result.total, per_page).max(1),
                result.total
            );
        }

        Commands::Show { id } => {
            let job = find_job(&client, id).await?;
            let favorite = client.list_favorites().await?.contains(&id);
            println!("Job #{}{}", job.id, if favorite { " ♥" } else { "" });
            println!("Title: {}", job.title);
            println!("Company: {}", job.company);
            println!("Location: {}", job.location);
            if let Some(source) = job.source_name() {
                println!("Source: {}", source);
            }
            if let Some(salary) = &job.salary {
                println!("Salary: {}", salary);
            }
            if let Some(deadline) = &job.deadline {
                println!("Deadline: {}", deadline);
            }
            if !job.url.is_empty() {
                println!("Apply: {}", job.url);
            }
            let translations = prefs.translations()?;
            let showing = prefs.translation_states()?.get(&id).copied().unwrap_or(false);
            match translations.get(&id) {
                Some(text) if showing => {
                    println!("\n--- Description (translated) ---\n{}", textwrap::fill(text, 80))
                }
                _ => println!("\n--- Description ---\n{}", textwrap::fill(&job.description, 80)),
            }
        }

        Commands::Sources => {
            let sources = client.list_sources().await?;
            if sources.is_empty() {
                println!("No sources found.");
            } else {
                println!("{:<6} {}", "ID", "NAME");
                println!("{}", "-".repeat(30));
                for source in sources {
                    println!("{:<6} {}", source.id, source.name);
                }
            }
        }

        Commands::Locations => {
            let locations = client.list_locations().await?;
            if locations.is_empty() {
                println!("No locations found.");
            }
            for location in locations {
                println!("{}", location);
            }
        }

        Commands::Favorites { command } => match command {
            FavoriteCommands::List => {
                let mut ids: Vec<i64> = client.list_favorites().await?.into_iter().collect();
                ids.sort_unstable();
                if ids.is_empty() {
                    println!("No favorites yet.");
                }
                for id in ids {
                    println!("{}", id);
                }
            }
            FavoriteCommands::Add { id } => {
                client
                    .add_favorite(id)
                    .await
                    .with_context(|| format!("Could not save favorite #{}", id))?;
                println!("Saved job #{} to favorites", id);
            }
            FavoriteCommands::Remove { id } => {
                client
                    .remove_favorite(id)
                    .await
                    .with_context(|| format!("Could not remove favorite #{}", id))?;
                println!("Removed job #{} from favorites", id);
            }
        },

        Commands::Translate { id } => {
            let mut translations = prefs.translations()?;
            let text = match translations.get(&id) {
                Some(text) => text.clone(),
                None => {
                    let job = find_job(&client, id).await?;
                    let text = client.translate(id, &job.description).await?;
                    translations.insert(id, text.clone());
                    prefs.set_translations(&translations)?;
                    info!(job_id = id, "translation cached");
                    text
                }
            };
            let mut states = prefs.translation_states()?;
            states.insert(id, true);
            prefs.set_translation_states(&states)?;
            println!("{}", text);
        }

        Commands::Theme { command } => match command {
            ThemeCommands::Show => println!("{}", prefs.theme()?),
            ThemeCommands::Cycle => {
                let theme = prefs.theme()?.next();
                prefs.set_theme(theme)?;
                println!("Theme set to {}", theme);
            }
            ThemeCommands::Set { theme } => {
                prefs.set_theme(theme)?;
                println!("Theme set to {}", theme);
            }
        },

        Commands::Prefs { command } => match command {
            PrefCommands::Show => {
                let entries = prefs.entries()?;
                if entries.is_empty() {
                    println!("No preferences stored.");
                }
                for (key, value) in entries {
                    println!("{:<20} {}", key, truncate(&value, 60));
                }
                if let Some(path) = prefs.path() {
                    println!("\nStored in {}", path.display());
                }
            }
            PrefCommands::SetPerPage { value } => {
                let per_page = PerPage::new(value)
                    .ok_or_else(|| anyhow!("per-page must be one of {:?}", PerPage::ALLOWED))?;
                prefs.set_per_page(per_page)?;
                println!("Jobs per page set to {}", per_page);
            }
            PrefCommands::ClearTranslations => {
                let count = Session::new(prefs).clear_translations()?;
                println!("Cleared {} cached translations", count);
            }
        },
    }

    Ok(())
}

/// Pages through the unfiltered listing until `id` turns up.
async fn find_job(client: &ApiClient, id: i64) -> Result<Job> {
    let per_page = PerPage::LARGEST;
    let mut query = JobQuery {
        page: 1,
        per_page: per_page.get(),
        source: None,
        search: None,
        favorites: false,
        locations: Vec::new(),
    };
    loop {
        let result = client.list_jobs(&query).await?;
        if let Some(job) = result.jobs.into_iter().find(|j| j.id == id) {
            return Ok(job);
        }
        if query.page >= total_pages(result.total, per_page) {
            return Err(anyhow!("Job #{} not found", id));
        }
        query.page += 1;
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
