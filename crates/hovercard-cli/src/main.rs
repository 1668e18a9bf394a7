//! Hovercard - floating Anki study panel for the terminal
//!
//! A draggable, resizable overlay panel that tracks your Anki decks:
//! - Deck selection with debounced search, backed by AnkiConnect
//! - Card list for the selected decks
//! - Persisted geometry and colors across sessions

use anyhow::Result;
use clap::{Parser, Subcommand};

use hovercard_core::anki::AnkiClient;
use hovercard_core::{constants, paths};

mod tui;

/// Hovercard - floating Anki study panel
#[derive(Parser)]
#[command(name = "hovercard")]
#[command(about = "Floating Anki study panel for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// AnkiConnect endpoint
    #[arg(long, default_value = constants::anki::DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the floating panel
    Panel,

    /// List decks with their statistics and exit
    Decks,
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    use crossterm::{
        event::DisableMouseCapture,
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    // Initialize logging to file (not stdout/stderr which would mess up TUI)
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = std::fs::File::create(log_dir.join("hovercard.log"))
        .unwrap_or_else(|_| std::fs::File::create(null_device).unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Decks) => {
            let client = AnkiClient::new(&cli.endpoint);
            let names_to_ids = client.deck_names_and_ids().await?;
            let ids: Vec<_> = names_to_ids.values().copied().collect();
            let stats = client.get_deck_stats(&ids).await?;

            let mut names: Vec<_> = names_to_ids.iter().collect();
            names.sort_by(|a, b| a.0.cmp(b.0));

            println!("Decks ({}):", names.len());
            for (name, id) in names {
                match stats.get(id) {
                    Some(s) => println!(
                        "  {:<40} new {:>4} · learn {:>4} · due {:>4}",
                        name, s.new_count, s.learn_count, s.review_count
                    ),
                    None => println!("  {:<40} (no stats)", name),
                }
            }
        }
        Some(Commands::Panel) | None => {
            let mut app = tui::App::new(&cli.endpoint);
            app.run().await?;
        }
    }

    Ok(())
}
