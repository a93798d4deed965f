use clap::Parser;
use sage::AskMode;
use sage::core::config::{self, CliOverrides};
use sage::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "sage", about = "Homework-help chat for your terminal")]
struct Args {
    /// Answering service base URL (e.g. http://127.0.0.1:5000)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// How the service should treat questions
    #[arg(short, long, value_enum)]
    mode: Option<AskMode>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sage.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("sage.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("sage: {e}");
            std::process::exit(1);
        }
    };

    let resolved = config::resolve(
        &file_config,
        CliOverrides {
            endpoint: args.endpoint.as_deref(),
            mode: args.mode,
            timeout_secs: args.timeout,
        },
    );

    log::info!(
        "Sage starting up (endpoint: {}, mode: {:?})",
        resolved.base_url,
        resolved.mode
    );

    tui::run(resolved)
}
