//! RogueCode - Entry Point
//!
//! Interactive terminal for the RogueCode hacking simulator. Reads one
//! command per line from stdin, resolves it, prints the response.
//! `quit` leaves the program; `exit` is an in-game command.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use roguecode::command::{CommandResolver, ResponseKind, ShellAction};
use roguecode::core::{GameConfig, Result};
use roguecode::llm::{EnrichmentProvider, LlmClient, LlmEnrichment, OfflineEnrichment};
use roguecode::session::{JsonFileStore, Session};

/// RogueCode - a terminal hacking simulator
#[derive(Parser, Debug)]
#[command(name = "roguecode")]
#[command(about = "Scan, inject and hack your way up the ranks")]
struct Args {
    /// Random seed for reproducible runs (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file (overrides ROGUECODE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save file, written after every command
    #[arg(long, default_value = "roguecode-save.json")]
    save: PathBuf,

    /// Start fresh without reading or writing a save file
    #[arg(long, default_value_t = false)]
    no_save: bool,

    /// Never call the LLM even if LLM_API_KEY is set
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roguecode=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::from_env_or_default()?,
    };

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let enrichment: Box<dyn EnrichmentProvider> = if args.offline {
        Box::new(OfflineEnrichment)
    } else {
        match LlmClient::from_env() {
            Ok(client) => {
                tracing::info!("LLM enrichment enabled ({})", client.model());
                let timeout = Duration::from_millis(config.enrichment_timeout_ms);
                Box::new(LlmEnrichment::new(client, timeout))
            }
            Err(_) => {
                tracing::warn!("LLM_API_KEY not set - using local narration only");
                Box::new(OfflineEnrichment)
            }
        }
    };

    let rt = Runtime::new()?;
    let resolver = CommandResolver::with_parts(config, enrichment, Box::new(rng));
    let mut session = Session::new(resolver);

    if !args.no_save {
        session = session.with_store(Box::new(JsonFileStore::new(&args.save)));
        match session.load_saved() {
            Ok(true) => tracing::info!("Loaded save {}", args.save.display()),
            Ok(false) => tracing::info!("No save at {}, starting fresh", args.save.display()),
            Err(e) => tracing::warn!("Could not load {}: {} - starting fresh", args.save.display(), e),
        }
    }

    for line in session.log() {
        println!("{}", line.text);
    }
    println!();

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("rogue@code:~$ ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "q" {
            break;
        }

        let response = rt.block_on(session.submit(line));
        if response.action == Some(ShellAction::ClearTerminal) {
            print!("\x1B[2J\x1B[H");
        }

        match response.kind {
            ResponseKind::Error => println!("[!] {}", response.text),
            ResponseKind::Warning => println!("[~] {}", response.text),
            _ => println!("{}", response.text),
        }
        if let Some(action) = response.action {
            tracing::debug!("Shell action: {}", action);
        }
        println!();
    }

    if let Err(e) = session.autosave() {
        tracing::warn!("Final save failed: {}", e);
    }
    tracing::info!("Session closed after {} command(s)", session.history().len());
    Ok(())
}
