use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod session;
mod transport;
mod util;

#[derive(Parser)]
#[command(name = "chatrelay", version, about = "Terminal chat client for the chatrelay server")]
struct Cli {
    /// Chat server base URL
    #[arg(long, env = "CHATRELAY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health
    Health,
    /// Send a single message and print the exchange
    Send(commands::send::SendArgs),
    /// Interactive chat on stdin/stdout
    Chat,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.trim_end_matches('/').to_string();

    let code = match cli.command {
        Commands::Health => commands::health::run(&api_url).await,
        Commands::Send(args) => commands::send::run(&api_url, args).await,
        Commands::Chat => commands::chat::run(&api_url).await,
    };

    std::process::exit(code);
}
