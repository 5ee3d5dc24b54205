mod book;

use book::BookArgs;

use crate::{
    app::{self, App},
    interact,
};

use shelf::{catalog::FavoriteToggle, record::BookRecord};

use clap::Subcommand;
use eyre::{eyre, WrapErr};
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Add a book to the catalog
    ///
    /// Details missing from a book with an Open Library id are looked up when it is saved. In
    /// interact mode every required detail that was not given is asked for first, blank answers
    /// are allowed.
    Add {
        #[clap(flatten)]
        book: BookArgs,
    },

    /// Change the details of a book and save it again
    #[clap(arg_required_else_help = true)]
    Edit {
        /// Id of the book in the catalog
        id: i64,
        #[clap(flatten)]
        book: BookArgs,
    },

    /// Show every detail of a book
    #[clap(arg_required_else_help = true)]
    Show {
        /// Id of the book in the catalog
        id: i64,
        /// Marks the book when it is a favorite of this user
        #[clap(short, long)]
        user: Option<String>,
    },

    /// List the catalog, newest first
    List {
        /// Print the books as JSON
        #[clap(long)]
        json: bool,
    },

    /// Remove a book from the catalog
    #[clap(arg_required_else_help = true)]
    Rm {
        /// Id of the book in the catalog
        id: i64,
    },

    /// Look up Open Library data again for the given books, or every book when none are given
    Refresh {
        /// Ids of the books to refresh
        ids: Vec<i64>,
    },

    /// Mark a book as a favorite of a user, or unmark it when it already is one
    #[clap(arg_required_else_help = true)]
    Fav {
        /// Id of the book in the catalog
        id: i64,
        /// Name of the user
        #[clap(short, long)]
        user: String,
    },

    /// List the favorite books of a user
    #[clap(arg_required_else_help = true)]
    Favs {
        /// Name of the user
        #[clap(short, long)]
        user: String,
    },

    /// Search Open Library
    ///
    /// In interact mode one of the results can be selected to add it to the catalog.
    #[clap(arg_required_else_help = true)]
    Search {
        /// Free text query, e.g. a title or an author
        query: String,
        /// Add the result with this number to the catalog
        #[clap(long)]
        import: Option<usize>,
    },

    /// Show what a book would look like after enrichment, without saving it
    #[clap(arg_required_else_help = true)]
    Resolve {
        /// Open Library work or edition id
        #[clap(long)]
        external_id: Option<String>,
        /// Title to search for when no id is given
        #[clap(long)]
        title: Option<String>,
    },
}

impl Commands {
    pub fn execute(self, app: &App, interact: bool) -> eyre::Result<String> {
        match self {
            Commands::Add { book } => {
                let mut record = BookRecord::new();
                book.apply(&mut record);
                if interact && record.needs_enrichment() {
                    interact::user_fill_record(&mut record)?;
                }

                app.catalog()?
                    .save(&mut record)
                    .wrap_err("Cannot save the book")?;
                Ok(app::details(&record, record.cover_url.as_deref(), false))
            }
            Commands::Edit { id, book } => {
                let catalog = app.catalog()?;
                let mut record = app::book_or_missing(catalog.get(id)?, id)?;
                book.apply(&mut record);

                catalog.save(&mut record).wrap_err("Cannot save the book")?;
                Ok(app::details(&record, record.cover_url.as_deref(), false))
            }
            Commands::Show { id, user } => {
                let catalog = app.catalog()?;
                let record = app::book_or_missing(catalog.get(id)?, id)?;
                let favorite = match user {
                    Some(user) => catalog.is_favorite(&user, id)?,
                    None => false,
                };

                let cover = catalog.cover_url(&record);
                Ok(app::details(&record, cover.as_deref(), favorite))
            }
            Commands::List { json } => {
                let books = app.catalog()?.list()?;
                if json {
                    let books = books.iter().map(app::to_json).collect::<Vec<_>>();
                    return serde_json::to_string_pretty(&books)
                        .wrap_err("Cannot write the catalog as JSON");
                }

                if books.is_empty() {
                    Ok("The catalog is empty".to_owned())
                } else {
                    Ok(lines(books.iter().map(app::summary)))
                }
            }
            Commands::Rm { id } => {
                trace!("Checking the catalog for a book with the id of {id}..");
                if app.catalog()?.delete(id)? {
                    Ok("Book removed from the catalog".to_owned())
                } else {
                    Ok(format!("No book found with the id of {id}"))
                }
            }
            Commands::Refresh { ids } => {
                let catalog = app.catalog()?;
                let ids = if ids.is_empty() {
                    catalog.list()?.iter().filter_map(|b| b.id).collect()
                } else {
                    ids
                };

                let updated = catalog.refresh(&ids)?;
                Ok(format!("Updated {updated} of {} books", ids.len()))
            }
            Commands::Fav { id, user } => match app.catalog()?.toggle_favorite(&user, id)? {
                FavoriteToggle::Added => Ok(format!("Book {id} added to the favorites of {user}")),
                FavoriteToggle::Removed => {
                    Ok(format!("Book {id} removed from the favorites of {user}"))
                }
            },
            Commands::Favs { user } => {
                let books = app.catalog()?.favorites(&user)?;
                if books.is_empty() {
                    Ok(format!("{user} has no favorite books"))
                } else {
                    Ok(lines(books.iter().map(app::summary)))
                }
            }
            Commands::Search { query, import } => search(app, &query, import, interact),
            Commands::Resolve { external_id, title } => {
                let mut record = match (external_id, title) {
                    (Some(id), _) => BookRecord::with_external_id(id),
                    (None, Some(title)) => BookRecord::with_title(title),
                    (None, None) => return Err(eyre!("Either --external-id or --title is needed")),
                };

                let found = app.enricher()?.resolve(&mut record);
                record.finalize();

                let outcome = if found {
                    "Found on Open Library"
                } else {
                    "Nothing found on Open Library"
                };
                Ok(format!(
                    "{outcome}\n{}",
                    app::details(&record, record.cover_url.as_deref(), false)
                ))
            }
        }
    }
}

fn lines<I: Iterator<Item = String>>(iter: I) -> String {
    iter.collect::<Vec<_>>().join("\n")
}

fn search(app: &App, query: &str, import: Option<usize>, interact: bool) -> eyre::Result<String> {
    let mut hits = app.enricher()?.search(query);
    if hits.is_empty() {
        return Ok(format!("No results found for '{query}'"));
    }

    let items = hits
        .iter()
        .map(|hit| {
            format!(
                "{} ({}) - {} [{}]",
                hit.title, hit.publication_year, hit.author, hit.external_id
            )
        })
        .collect::<Vec<_>>();

    let index = match import {
        Some(number) if (1..=hits.len()).contains(&number) => number - 1,
        Some(number) => {
            return Err(eyre!(
                "There is no result number {number}, the search found {} results",
                hits.len()
            ))
        }
        None if interact => interact::user_select("Add a result to the catalog", &items)?,
        None => {
            return Ok(lines(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("{}. {item}", i + 1)),
            ))
        }
    };

    let mut record = BookRecord::from(hits.swap_remove(index));
    app.catalog()?
        .save(&mut record)
        .wrap_err("Cannot save the book")?;
    Ok(format!("Added {}", app::summary(&record)))
}
