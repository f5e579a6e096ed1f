//! QLM Control - CLI client for the QLM daemon

mod cli;
mod client;
mod errors;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use client::QlmdClient;
use owo_colors::OwoColorize;
use std::io::Write;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let base_url = cli
        .url
        .clone()
        .or_else(|| std::env::var("QLMD_URL").ok())
        .unwrap_or_else(|| client::DEFAULT_URL.to_string());

    let exit_code = match run(cli, &base_url).await {
        Ok(()) => errors::EXIT_SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            errors::exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: Cli, base_url: &str) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status(base_url, json).await,
        Commands::Models => models(base_url).await,
        Commands::Chat {
            message,
            stream,
            api_key,
        } => chat(base_url, &message, stream, api_key).await,
        Commands::Ping => ping(base_url).await,
    }
}

async fn status(base_url: &str, json: bool) -> Result<()> {
    let health = QlmdClient::new(base_url).health().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!("{} qlmd is {}", "\u{25CF}".green(), health.status.bold());
    println!("  version: {}", health.version);
    println!("  uptime:  {}s", health.uptime_seconds);
    Ok(())
}

async fn models(base_url: &str) -> Result<()> {
    let list = QlmdClient::new(base_url).models().await?;
    for model in &list.data {
        println!("{}  (owned by {})", model.id.bold(), model.owned_by);
    }
    Ok(())
}

async fn chat(base_url: &str, message: &str, stream: bool, api_key: Option<String>) -> Result<()> {
    let client = QlmdClient::new(base_url).with_api_key(api_key);

    if stream {
        let mut stdout = std::io::stdout();
        client
            .chat_stream(message, &mut |piece| {
                print!("{}", piece);
                let _ = stdout.flush();
            })
            .await?;
        println!();
        return Ok(());
    }

    let response = client.chat(message).await?;
    match response.choices.first() {
        Some(choice) => println!("{}", choice.message.content.as_text()),
        None => println!("(the duck said nothing)"),
    }
    Ok(())
}

async fn ping(base_url: &str) -> Result<()> {
    QlmdClient::new(base_url).health().await?;
    println!("pong");
    Ok(())
}
