//! quotebot CLI: chat in the terminal, ask one question, build the index, manage stored history.
//! Config from env (and `.env`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chat_history::{parse_messages, ChatStore};
use clap::{Parser, Subcommand};
use prompt::{ChatMessage, MessageRole};
use quotebot::{
    build_components, build_index, chat_store_dir_from_env, log_file_from_env, EngineRegistry,
    QuoteBotConfig, QuoteEngine, DEFAULT_USER_ID,
};
use quotebot_core::init_tracing;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "quotebot")]
#[command(about = "Game of Thrones quote chatbot: chat, ask, build-index, history, clear, sync", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat. In-chat commands: /clear, /history, /stats, /quit.
    Chat {
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,
    },
    /// Send one message and print the reply.
    Ask {
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,
        message: String,
    },
    /// Build the quote index, or load it when the persisted one is current.
    BuildIndex {
        /// Rebuild even if a current index exists.
        #[arg(long)]
        force: bool,
    },
    /// Print stored history.
    History {
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,
    },
    /// Clear stored history.
    Clear {
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,
    },
    /// Replace stored history with a JSON array of {role, content} messages from FILE.
    Sync {
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&log_file_from_env())?;

    match cli.command {
        Commands::Chat { user } => handle_chat(&user).await,
        Commands::Ask { user, message } => handle_ask(&user, &message).await,
        Commands::BuildIndex { force } => handle_build_index(force).await,
        Commands::History { user } => handle_history(&user),
        Commands::Clear { user } => handle_clear(&user),
        Commands::Sync { user, file } => handle_sync(&user, &file),
    }
}

async fn start_registry() -> Result<EngineRegistry> {
    let config = QuoteBotConfig::from_env()?;
    let components = build_components(&config).await?;
    Ok(EngineRegistry::new(components, config.engine))
}

fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "You",
        MessageRole::Assistant => "Bot",
    }
}

fn print_messages(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("(no history)");
        return;
    }
    for m in messages {
        println!("{:>6}: {}", role_label(m.role), m.content);
    }
}

fn print_stats(engine: &QuoteEngine) {
    let stats = engine.stats();
    println!(
        "Total messages: {}  (you: {}, bot: {})",
        stats.total_messages, stats.user_messages, stats.assistant_messages
    );
}

/// Handle the chat command: one line in, one reply out, until /quit or EOF.
async fn handle_chat(user: &str) -> Result<()> {
    let mut registry = start_registry().await?;
    let engine = registry.engine_for(user)?;
    info!(user_id = user, "Chat session started");

    match engine.greeting() {
        Some(greeting) => println!("   Bot: {}", greeting),
        None => println!(
            "Loaded {} message(s) for {}.",
            engine.chat_history().len(),
            user
        ),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "quit" | "exit" => break,
            "/clear" => {
                engine.clear_chat_history()?;
                println!("History cleared.");
            }
            "/history" => print_messages(engine.chat_history()),
            "/stats" => print_stats(engine),
            message => {
                let reply = engine.get_reply(message).await;
                println!("   Bot: {}", reply);
            }
        }
    }

    info!(user_id = user, "Chat session ended");
    Ok(())
}

fn print_prompt() -> Result<()> {
    use std::io::Write;
    print!("You: ");
    std::io::stdout().flush()?;
    Ok(())
}

async fn handle_ask(user: &str, message: &str) -> Result<()> {
    let mut registry = start_registry().await?;
    let reply = registry.get_reply(user, message).await?;
    println!("{}", reply);
    Ok(())
}

async fn handle_build_index(force: bool) -> Result<()> {
    let config = QuoteBotConfig::from_env()?;
    let index = build_index(&config, force).await?;
    println!(
        "Index ready: {} documents, dimension {}, model {} ({:?}) at {}",
        index.len(),
        index.dimension(),
        index.model(),
        index.source(),
        config.index_dir.display()
    );
    Ok(())
}

fn chat_store() -> ChatStore {
    ChatStore::new(chat_store_dir_from_env())
}

fn handle_history(user: &str) -> Result<()> {
    let history = chat_store().open(user)?;
    print_messages(history.messages());
    Ok(())
}

fn handle_clear(user: &str) -> Result<()> {
    chat_store().open(user)?.clear()?;
    println!("History cleared for {}.", user);
    Ok(())
}

/// Handle the sync command: FILE's messages become the authoritative history.
fn handle_sync(user: &str, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Read messages from {}", file.display()))?;
    let messages = parse_messages(&raw)?;
    let count = messages.len();
    chat_store().open(user)?.replace(messages)?;
    println!("Synced {} message(s) for {}.", count, user);
    Ok(())
}
