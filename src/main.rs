use clap::Parser;
use site_scan::ServerSettings;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => match ServerSettings::from_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                ::log::error!("failed to load settings from {}: {}", path.display(), e);
                return;
            }
        },
        None => ServerSettings::default(),
    };

    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    // Let the environment supply the secret so it never lands in a file
    if let Ok(secret) = std::env::var("RECAPTCHA_SECRET") {
        if !secret.is_empty() {
            settings.recaptcha_secret = Some(secret);
        }
    }

    ::log::info!(
        "starting crawl service on {}:{}",
        settings.host,
        settings.port
    );

    if let Err(e) = site_scan::server::serve(&settings).await {
        ::log::error!("server error: {}", e);
    }
}
