use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-scan")]
#[command(about = "Maps a website's internal link graph over a JSON crawl API")]
#[command(version)]
pub struct Args {
    /// Host address to bind (overrides the settings file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides the settings file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to a JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
