//! Command-line interface for adrmirror
//!
//! Two subcommands share one archive directory: `fetch` populates it by
//! walking the remote listing, `serve` re-serves it over HTTP.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mirror a MediaWiki wiki's deleted-revision history locally
#[derive(Parser, Debug)]
#[command(name = "adrmirror")]
#[command(about = "Mirror and re-serve a wiki's alldeletedrevisions listing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk the remote listing and persist every page to the archive
    Fetch {
        /// URL of the wiki's api.php endpoint
        #[arg(long)]
        api_url: String,

        /// Bot account name, from Special:BotPasswords
        #[arg(long, default_value = "")]
        lgname: String,

        /// Bot account password
        #[arg(long, default_value = "")]
        lgpassword: String,

        /// adrcontinue token printed by an aborted run, to resume mid-walk
        #[arg(long)]
        resume: Option<String>,

        /// Directory for page blobs
        #[arg(long, default_value = "archives")]
        dir: PathBuf,
    },

    /// Re-serve cached pages over HTTP on all interfaces
    Serve {
        /// Directory holding page blobs written by a previous fetch
        #[arg(long, default_value = "archives")]
        dir: PathBuf,

        /// TCP port to listen on
        #[arg(long, default_value_t = 8888)]
        port: u16,
    },
}
