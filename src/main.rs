//! adrmirror - mirror a wiki's deleted-revision history locally
//!
//! `fetch` walks the remote `alldeletedrevisions` listing and persists every
//! raw page; `serve` answers the same query shape from the local archive.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use adrmirror::api::{fetch_all, Credentials, Session};
use adrmirror::cache::ArchiveStore;
use adrmirror::cli::{Cli, Command};
use adrmirror::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch {
            api_url,
            lgname,
            lgpassword,
            resume,
            dir,
        } => {
            let credentials = Credentials {
                name: lgname,
                password: lgpassword,
            };
            let session = Session::login(&api_url, &credentials).await?;
            let store = ArchiveStore::new(dir);

            match fetch_all(&session, &store, resume).await {
                Ok(pages) => {
                    println!("Mirrored {} page(s) into {}", pages, store.dir().display());
                }
                Err(err) => {
                    // The resume token goes to stdout so it survives log
                    // filtering; an operator needs it to restart the walk.
                    if let Some(token) = err.resume_token() {
                        println!("Walk aborted. Resume with: --resume '{}'", token);
                    } else {
                        println!("Walk aborted before the first page was saved; rerun from the start.");
                    }
                    return Err(err.into());
                }
            }
        }
        Command::Serve { dir, port } => {
            server::serve(ArchiveStore::new(dir), port).await?;
        }
    }

    Ok(())
}
