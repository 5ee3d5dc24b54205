#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process, time::Duration};

mod app;
mod commands;
mod interact;

use app::App;
use commands::Commands;

use shelf::config::ClientConfig;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{:?}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                db,
                api_url,
                timeout,
                interact,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    // `quiet` wins over `interact`
    let interact = interact && !quiet;
    if interact {
        trace!("Interact mode enabled");
    }

    let mut config = ClientConfig::default().with_timeout(Duration::from_secs(timeout));
    if let Some(url) = api_url {
        config = config.with_api_url(url);
    }
    trace!("Using {} for Open Library requests", config.api_url);

    let app = App::new(db, config);
    let message = command.execute(&app, interact)?;

    if !quiet {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "shelf")]
#[clap(about = "Keep a catalog of books, filled in from Open Library")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Path of the catalog database, created when missing
    #[clap(
        long,
        env = "SHELF_DB",
        default_value = "shelf.db",
        parse(from_os_str),
        global = true
    )]
    db: PathBuf,

    /// Base URL of the Open Library API
    #[clap(long, env = "SHELF_API_URL", global = true)]
    api_url: Option<String>,

    /// Seconds a single Open Library request may take
    #[clap(long, env = "SHELF_TIMEOUT", default_value = "5", global = true)]
    timeout: u64,

    /// Enables interactive mode, which prompts for missing book details and search selections.
    #[clap(short, long, global = true)]
    interact: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
