//! Parley terminal client - composition root.
//!
//! Ties the crates together into a line-oriented chat client:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the HTTP exchange client and the session controller
//! 4. Run the read/send/print loop
//!
//! Commands inside the loop:
//! - `/attach <path>` stage a file for the next send
//! - `/good <n>` / `/bad <n>` rate the n-th transcript entry
//! - `/history` reprint the transcript
//! - `/quit` exit

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use parley_client::ExchangeClient;
use parley_core::{ParleyConfig, Sender, Sentiment, StagedFile};
use parley_session::{SessionController, UnsupportedProvider};

use cli::CliArgs;

fn print_message(index: usize, message: &parley_core::Message) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    let rating = match message.feedback {
        Some(Sentiment::Positive) => " [+]",
        Some(Sentiment::Negative) => " [-]",
        None => "",
    };
    println!(
        "[{index}] {} {}: {}{rating}",
        message.timestamp.format("%H:%M:%S"),
        who,
        message.text
    );
}

fn print_history(controller: &SessionController) {
    for (index, message) in controller.messages().iter().enumerate() {
        print_message(index, message);
    }
}

/// Rate the n-th transcript entry. Repeat ratings are silently ignored by
/// the controller; here we only validate the index points at a bot reply.
fn rate(controller: &SessionController, arg: &str, sentiment: Sentiment) {
    let messages = controller.messages();
    let Some(message) = arg.trim().parse::<usize>().ok().and_then(|n| messages.get(n)) else {
        println!("usage: /good <n> or /bad <n> with n from /history");
        return;
    };
    if !message.is_bot() {
        println!("only bot replies can be rated");
        return;
    }
    if controller.give_feedback(message.id, sentiment) {
        println!("thanks for the feedback");
    } else {
        println!("that reply was already rated");
    }
}

fn attach(controller: &SessionController, path: &str) {
    let path = path.trim();
    match std::fs::read(path) {
        Ok(bytes) => {
            let name = std::path::Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string());
            controller.stage_file(StagedFile::new(name, bytes));
            println!("file staged for your next message");
        }
        Err(e) => println!("could not read {}: {}", path, e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = ParleyConfig::load_or_default(&config_file);
    if let Some(url) = args.base_url.clone() {
        config.service.base_url = url;
    }

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Parley v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(base_url = %config.service.base_url, "Answering service configured");

    let client = ExchangeClient::new(&config.service)?;
    let controller = Arc::new(SessionController::new(
        Arc::new(client),
        Box::new(UnsupportedProvider),
        config.chat.clone(),
    ));

    print_history(&controller);
    println!("(/attach <path>, /good <n>, /bad <n>, /history, /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let (command, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        match command {
            "/quit" => break,
            "/history" => print_history(&controller),
            "/good" => rate(&controller, arg, Sentiment::Positive),
            "/bad" => rate(&controller, arg, Sentiment::Negative),
            "/attach" => attach(&controller, arg),
            _ => {
                controller.set_draft(line.as_str());
                println!("...");
                match controller.send().await {
                    Ok(()) => {
                        let messages = controller.messages();
                        if let Some(last) = messages.last() {
                            print_message(messages.len() - 1, last);
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    Ok(())
}
