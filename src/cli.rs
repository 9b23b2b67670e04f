use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cfgate", about = "CDN interstitial challenge detector & solver")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a URL, solving the challenge interstitial if one is served
    Fetch {
        /// Target URL
        url: String,

        /// Write the final body to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Extract and solve a saved challenge page without any network I/O
    Inspect {
        /// Path to the saved HTML page
        file: String,

        /// Host the page was served for (the answer depends on it)
        #[arg(long)]
        host: String,
    },
}
