use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_app::catalog::models::Category;
use libris_app::catalog::query::BookView;
use libris_app::catalog::sort::SortKey;
use libris_app::catalog::{Library, ListOrder, SnapshotBridge, SnapshotKeys};
use libris_kernel::settings::{Settings, StorageBackend};

mod render;

/// Manage a small library catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "libris", version, about)]
struct Cli {
    /// Directory holding the catalog snapshot (overrides storage.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a book; its id is derived from the category
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Category code, e.g. 1 or 01
        #[arg(long)]
        category: String,
    },

    /// Delete a book and any outstanding loan for it
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Lend a book
    Borrow {
        id: String,
        /// Borrower name (prompted for when omitted)
        #[arg(long)]
        borrower: Option<String>,
    },

    /// Take a borrowed book back
    Return { id: String },

    /// List books or outstanding loans
    List {
        /// Only books that can be borrowed
        #[arg(long, conflicts_with = "borrowed")]
        available: bool,
        /// Outstanding loans, oldest first
        #[arg(long)]
        borrowed: bool,
        /// Case-insensitive search term
        #[arg(long)]
        search: Option<String>,
        /// Sort key: id, title, author, category, status, borrower, borrowDate or none
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show category codes and names
    Categories,

    /// Run the HTTP API until interrupted
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            render::failure(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    if let Some(dir) = cli.data_dir {
        settings.storage.backend = StorageBackend::File;
        settings.storage.data_dir = dir;
    }

    if !matches!(cli.command, Command::Serve) {
        // One-shot commands keep stderr quiet unless something goes wrong.
        settings.telemetry.level = "warn".to_string();
    }
    libris_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Add {
            title,
            author,
            category,
        } => {
            let mut library = open_library(&settings)?;
            let book = library.add_book(&title, &author, &category)?;
            render::notice(&format!(
                "Added \"{}\" as {} ({})",
                book.title,
                book.id,
                book.category_name()
            ));
        }
        Command::Delete { id, yes } => {
            let mut library = open_library(&settings)?;
            let Some(book) = library.find(&id) else {
                return Err(libris_app::catalog::LibraryError::NotFound { id }.into());
            };
            if !yes && !confirm(&format!("Delete {} \"{}\"?", book.id, book.title))? {
                render::notice("Deletion cancelled");
                return Ok(());
            }
            library.delete_book(&id)?;
            render::notice(&format!("Deleted {}", book.id));
        }
        Command::Borrow { id, borrower } => {
            let borrower = match borrower {
                Some(name) => name,
                None => prompt("Borrower name: ")?,
            };
            let mut library = open_library(&settings)?;
            let record = library.borrow_book(&id, &borrower)?;
            render::notice(&format!(
                "{} borrowed \"{}\" on {}",
                record.borrower, record.title, record.borrow_date
            ));
        }
        Command::Return { id } => {
            let mut library = open_library(&settings)?;
            let book = library.return_book(&id)?;
            render::notice(&format!("Returned \"{}\"", book.title));
        }
        Command::List {
            available,
            borrowed,
            search,
            sort,
            desc,
        } => {
            let order = list_order(sort.as_deref(), desc)?;
            let library = open_library(&settings)?;
            let term = search.as_deref().unwrap_or("");
            if borrowed {
                render::loans(&library.list_borrowed(term, order));
            } else {
                let view = if available {
                    BookView::Available
                } else {
                    BookView::All
                };
                render::books(&library.list_books(view, term, order));
            }
        }
        Command::Categories => render::categories(&Category::ALL),
        Command::Serve => libris_app::server::run(settings).await?,
    }

    Ok(())
}

fn open_library(settings: &Settings) -> anyhow::Result<Library> {
    tracing::debug!(data_dir = %settings.storage.data_dir.display(), "opening catalog");
    let store = libris_db::open(&settings.storage).context("failed to open snapshot store")?;
    let keys = SnapshotKeys::from(&settings.storage);
    Ok(Library::open(SnapshotBridge::new(store, keys)))
}

fn list_order(sort: Option<&str>, desc: bool) -> anyhow::Result<Option<ListOrder>> {
    let Some(sort) = sort else {
        return Ok(None);
    };
    let key = SortKey::parse_optional(sort)?;
    Ok(key.map(|key| ListOrder {
        key,
        ascending: !desc,
    }))
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("failed to read from stdin")?;
    Ok(input.trim().to_string())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{question} [y/N]: "))?.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_conflict() {
        let parsed = Cli::try_parse_from(["libris", "list", "--available", "--borrowed"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn list_order_from_flags() {
        assert_eq!(list_order(None, true).unwrap(), None);
        assert_eq!(list_order(Some("none"), false).unwrap(), None);
        assert_eq!(
            list_order(Some("title"), true).unwrap(),
            Some(ListOrder {
                key: SortKey::Title,
                ascending: false
            })
        );
        assert!(list_order(Some("pages"), false).is_err());
    }
}
