use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use akademik::config::Cli;
use akademik::gateway::SupabaseHttpClient;
use akademik::services::Confirm;
use akademik::shell::{Flow, Shell};
use akademik::state::{AppState, SessionContext};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Asks on the terminal; anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = cli.gateway_config()?;
    info!(url = %config.url, "connecting to backend");

    let session = SessionContext::default();
    let gateway = SupabaseHttpClient::new(config, session.clone())?;
    let state = AppState::new(Arc::new(gateway), session);

    let mut shell = Shell::new(state);
    shell.navigate(cli.route).await;

    let stdin = io::stdin();
    loop {
        if shell.take_scroll_request() {
            print!("{}", CLEAR_SCREEN);
        }
        println!("\n{}", shell.render());
        print!("{}> ", shell.route());
        io::stdout().flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!("failed to read input: {}", err);
                break;
            }
        }
        if shell.execute(&line, &StdinConfirm).await == Flow::Quit {
            break;
        }
    }

    info!("bye");
    Ok(())
}
