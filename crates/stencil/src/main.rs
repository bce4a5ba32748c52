use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use stencil_db::{File, FileParse as _, Reported, RootDatabase, check_file};
use stencil_errors::{Renderer, Severity};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(version, about = "Inspect stencil templates")]
struct Options {
    /// Log at debug level unless `STENCIL_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report syntax errors.
    Check { path: Utf8PathBuf },
    /// Print the syntax tree.
    Tree { path: Utf8PathBuf },
    /// Print the token at a byte offset.
    Find {
        path: Utf8PathBuf,
        offset: u32,
        /// Return whitespace tokens instead of the nearest significant token.
        #[arg(long)]
        include_whitespace: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_env("STENCIL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    tracing::debug!(%path, len = text.len(), "loaded file");
    Ok(File::new(db, path, text))
}

fn main() -> anyhow::Result<ExitCode> {
    let options = Options::parse();
    init_tracing(options.verbose);

    let db = RootDatabase::default();
    match options.command {
        Command::Check { path } => {
            let file = load(&db, path)?;
            let renderer = Renderer::styled();
            let path = file.path(&db).as_str();
            let text = file.text(&db);

            let mut failed = false;
            for reported in check_file::accumulated::<Reported>(&db, file) {
                failed |= reported.0.severity() == Severity::Error;
                eprintln!("{}", reported.0.render(&renderer, path, text));
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Command::Tree { path } => {
            let file = load(&db, path)?;
            print!("{}", file.parse_tree(&db).debug_dump());
            Ok(ExitCode::SUCCESS)
        }
        Command::Find { path, offset, include_whitespace } => {
            let file = load(&db, path)?;
            let token = file
                .parse_tree(&db)
                .find_token(offset.into(), include_whitespace)
                .with_context(|| format!("no token at offset {offset}"))?;
            println!("{token:?} {:?}", token.text());
            let green = token.green();
            for (side, trivia) in [("leading", green.leading()), ("trailing", green.trailing())] {
                if !trivia.is_empty() {
                    println!("  {side} trivia: {:?}", trivia.pieces());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
