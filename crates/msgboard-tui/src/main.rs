use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use msgboard_core::board::LOAD_FAILED;
use msgboard_core::{
    logging, render, Board, BoardEvent, BoardSink, Config, Draft, HttpClient, Message,
    ReactionCatalog,
};
use tracing::info;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "msgboard")]
#[command(version, about = "Read, post and react on a message board")]
struct Cli {
    /// Board server base url (overrides config and MSGBOARD_SERVER)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Ask the server for at most this many messages
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the board once and print it as HTML
    Snapshot {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Post a message
    Post {
        /// Message text
        message: String,
        /// Author name (defaults to Anonymous)
        #[arg(short, long, default_value = "")]
        author: String,
        /// Repository tag (defaults to local)
        #[arg(short, long, default_value = "")]
        repository: String,
    },
    /// Add a reaction to a message
    React {
        /// Message id
        message_id: String,
        /// Reaction name, e.g. heart or party
        reaction: String,
    },
    /// List the available reactions
    Reactions,
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the active configuration and where it lives
    Show,
    /// Save one setting, e.g. `config set server_url http://board:8080`
    Set {
        /// One of the config keys
        key: String,
        /// New value (`none` clears fetch_limit)
        value: String,
    },
    /// Write the default configuration back to disk
    Reset,
}

/// Prints board notices for the one-shot commands and keeps the last list
/// the board delivered.
#[derive(Default)]
struct ConsoleSink {
    messages: Mutex<Option<Vec<Message>>>,
}

impl ConsoleSink {
    fn take_messages(&self) -> Option<Vec<Message>> {
        self.messages.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl BoardSink for ConsoleSink {
    fn emit(&self, event: BoardEvent) {
        match event {
            BoardEvent::MessagesLoaded(messages) => {
                if let Ok(mut guard) = self.messages.lock() {
                    *guard = Some(messages);
                }
            }
            BoardEvent::Notice(notice) => eprintln!("{}", notice.text.red()),
            BoardEvent::Submitting(_) | BoardEvent::DraftCleared => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Edits only touch the file, so a bad server url or config file can still be fixed
    match &cli.command {
        Some(Commands::Config { action: Some(ConfigAction::Set { key, value }) }) => {
            return set_config(key, value);
        }
        Some(Commands::Config { action: Some(ConfigAction::Reset) }) => return reset_config(),
        _ => {}
    }

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if cli.limit.is_some() {
        config.fetch_limit = cli.limit;
    }

    let client = HttpClient::new(&config.server_url, config.request_timeout())?;
    let board = Board::new(Arc::new(client)).with_fetch_limit(config.fetch_limit);
    let catalog = ReactionCatalog::default();

    let Some(command) = cli.command else {
        return run_tui(config, catalog, board).await;
    };

    logging::init_stderr()?;

    match command {
        Commands::Snapshot { out } => snapshot(&board, &catalog, out).await?,
        Commands::Post { message, author, repository } => {
            post(&board, Draft::new(&message, &author, &repository)).await?
        }
        Commands::React { message_id, reaction } => {
            react(&board, &catalog, &message_id, &reaction).await?
        }
        Commands::Reactions => list_reactions(&catalog),
        Commands::Config { .. } => show_config(&config)?,
    }

    Ok(())
}

async fn snapshot(board: &Board, catalog: &ReactionCatalog, out: Option<PathBuf>) -> Result<()> {
    let sink = ConsoleSink::default();
    if !board.refresh(&sink).await {
        bail!(LOAD_FAILED);
    }

    let messages = sink.take_messages().unwrap_or_default();
    let html = render::render_board(&messages, catalog);

    match out {
        Some(path) => {
            std::fs::write(&path, html)?;
            println!(
                "{} {} messages to {}",
                "Wrote".green(),
                messages.len(),
                path.display()
            );
        }
        None => print!("{}", html),
    }

    Ok(())
}

async fn post(board: &Board, draft: Draft) -> Result<()> {
    let sink = ConsoleSink::default();
    if !board.submit(&draft, &sink).await {
        bail!("message not sent");
    }

    println!("{}", "Message sent".green().bold());
    if let Some(messages) = sink.take_messages() {
        println!("{}", format!("{} messages on the board", messages.len()).dimmed());
    }
    Ok(())
}

async fn react(board: &Board, catalog: &ReactionCatalog, message_id: &str, name: &str) -> Result<()> {
    let reaction = catalog.find(name).ok_or_else(|| {
        anyhow!("Unknown reaction '{}'. Run `msgboard reactions` to list them.", name)
    })?;

    let sink = ConsoleSink::default();
    let Some(ack) = board.react(message_id, reaction.name, &sink).await else {
        bail!("reaction not recorded");
    };

    // Prefer the server's own count; fall back to the refreshed list
    let count = ack.count().or_else(|| {
        sink.take_messages()
            .and_then(|messages| messages.into_iter().find(|m| m.id == message_id))
            .map(|m| m.reaction_count(reaction.name))
    });

    match count {
        Some(count) => println!("{} {} now at {}", reaction.emoji, reaction.name.bold(), count),
        None => println!("{} {} added", reaction.emoji, reaction.name.bold()),
    }
    Ok(())
}

fn list_reactions(catalog: &ReactionCatalog) {
    println!("{}", "Reactions".bold().blue());
    for row in catalog.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|r| format!("{} {}", r.emoji, r.name))
            .collect();
        println!("  {}", line.join("  "));
    }
}

fn show_config(config: &Config) -> Result<()> {
    let path = Config::get_config_path()?;
    let status = if path.exists() { "" } else { " (not created, using defaults)" };
    println!("{} {}{}", "Config:".bold(), path.display(), status.dimmed());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    // Start from the file itself so env overrides are not persisted
    let path = Config::get_config_path()?;
    let mut config = Config::load_from(&path)?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} in {}", "Saved".green(), key.bold(), path.display());
    Ok(())
}

fn reset_config() -> Result<()> {
    Config::new().save()?;
    println!("{} {}", "Reset".green(), Config::get_config_path()?.display());
    Ok(())
}

async fn run_tui(config: Config, catalog: ReactionCatalog, board: Board) -> Result<()> {
    // stderr belongs to the terminal UI, so logs go to a file
    if let Some(log_path) = logging::default_log_path() {
        logging::init_file(&log_path)?;
    }
    info!(server = %config.server_url, "starting terminal client");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    let sink = events.sender();
    let refresher = board.spawn_auto_refresh(sink.clone(), config.refresh_interval());

    let mut app = App::new(config, catalog, board, sink);
    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    refresher.abort();
    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
