use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::io::{self, Write};
use std::path::PathBuf;
use visitstore::{QueryParams, SortKey, StatusFilter, StoreError, VisitStore, VisitTask, seed};

#[derive(Parser)]
#[command(name = "visitstore")]
#[command(about = "Museum visit tracker - add, edit, filter, sort and search visits")]
#[command(version)]
struct Cli {
    /// JSON seed file to start from (default: the built-in museum list)
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List visits, optionally filtered, searched and sorted
    List {
        /// all, pending or completed
        #[arg(long, default_value = "all")]
        status: String,

        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,

        /// name, date, status, or anything else for insertion order
        #[arg(long, default_value = "unsorted")]
        sort: String,
    },

    /// Add a visit
    Add {
        name: String,
        /// Visit date, canonically YYYY-MM-DD
        date: String,
    },

    /// Flip the completion flag on one visit
    Toggle { id: u64 },

    /// Change the name and/or date of a visit
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete one visit (asks for confirmation)
    Remove { id: u64 },

    /// Show total, visited and to-visit counts
    Stats,

    /// Mark every visit as completed (asks for confirmation)
    MarkAll,

    /// Delete all completed visits (asks for confirmation)
    ClearCompleted,

    /// Delete everything and reset ids (asks for confirmation)
    ClearAll,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // The store is in-memory and session-scoped: every run starts from seed
    let seed_visits = match &cli.seed {
        Some(path) => seed::load_seed_file(path)?,
        None => seed::default_visits(),
    };
    let mut store = VisitStore::from_seed(&seed_visits);

    match cli.command {
        Commands::List { status, search, sort } => {
            let status: StatusFilter = status.parse().map_err(|e: String| eyre!(e))?;
            let params = QueryParams::new(status, &search, SortKey::from_key(&sort));
            render(&store.query(&params));
        }

        Commands::Add { name, date } => match store.add(&name, &date) {
            Ok(task) => {
                println!("Added visit #{}: {}", task.id, task.name);
                render(&store.query(&QueryParams::default()));
            }
            Err(e) => report(&e),
        },

        Commands::Toggle { id } => match store.toggle_completed(id) {
            Ok(task) => println!("Visit #{} is now {}", task.id, status_label(&task)),
            // Ids come from a just-rendered view; a miss is not user-visible
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => report(&e),
        },

        Commands::Edit { id, name, date } => {
            match store.edit(id, name.as_deref(), date.as_deref()) {
                Ok(task) => println!("Updated visit #{}: {} ({})", task.id, task.name, task.visit_date),
                Err(StoreError::NotFound { .. }) => {}
                Err(e) => report(&e),
            }
        }

        Commands::Remove { id } => {
            if confirm(&format!("Delete visit #{id}?"), cli.yes)? {
                store.remove(id);
                render(&store.query(&QueryParams::default()));
            }
        }

        Commands::Stats => {
            println!("total:    {}", store.count_total());
            println!("visited:  {}", store.count_completed());
            println!("to visit: {}", store.count_pending());
        }

        Commands::MarkAll => {
            if confirm("Mark every visit as completed?", cli.yes)? {
                match store.mark_all_completed() {
                    Ok(()) => render(&store.query(&QueryParams::default())),
                    Err(e) => report(&e),
                }
            }
        }

        Commands::ClearCompleted => {
            // The prompt states the count, so read it before mutating
            let count = store.count_completed();
            if confirm(&format!("Delete {count} completed visit(s)?"), cli.yes)? {
                match store.clear_completed() {
                    Ok(removed) => println!("Removed {removed} visit(s)"),
                    Err(e) => report(&e),
                }
            }
        }

        Commands::ClearAll => {
            if confirm("Delete ALL visits?", cli.yes)? {
                match store.clear_all() {
                    Ok(()) => println!("Store cleared"),
                    Err(e) => report(&e),
                }
            }
        }
    }

    Ok(())
}

/// Ask the user to confirm a destructive step; `--yes` skips the prompt
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn report(err: &StoreError) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

fn status_label(task: &VisitTask) -> String {
    if task.completed {
        "visited".green().to_string()
    } else {
        "to visit".yellow().to_string()
    }
}

/// Render query results as rows; an empty result gets a placeholder line
fn render(tasks: &[&VisitTask]) {
    if tasks.is_empty() {
        println!("{}", "no visits match".dimmed());
        return;
    }

    for task in tasks {
        let check = if task.completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!(
            "{} #{:<3} {:<42} {:<14} {}",
            check,
            task.id,
            task.name,
            human_date(&task.visit_date),
            status_label(task)
        );
    }
}

/// Human-readable date for display; a date chrono cannot parse is shown raw
fn human_date(date: &str) -> String {
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%-d %B %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
