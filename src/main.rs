mod action;
mod app;
mod config;
mod error;
mod event;
mod fs;
mod mode;
mod navigator;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::event::read_event;
use crate::fs::Listing;
use crate::fs::listing::resolve_path;
use crate::ui::TerminalScreen;

const LOG_ENV: &str = "RFD_LOG";

fn main() -> Result<()> {
  let args: Vec<String> = std::env::args().skip(1).collect();

  let mut show_help = false;
  let mut show_version = false;
  let mut path_arg: Option<String> = None;

  for arg in &args {
    match arg.as_str() {
      "--help" | "-h" => show_help = true,
      "--version" | "-V" => show_version = true,
      a if !a.starts_with('-') => path_arg = Some(a.to_string()),
      _ => {
        eprintln!("rfd: unknown option '{arg}'");
        std::process::exit(1);
      }
    }
  }

  if show_help {
    println!(concat!(
      "rfd - terminal file directory browser\n",
      "\n",
      "Usage: rfd [options] [path]\n",
      "\n",
      "Options:\n",
      "  -h, --help               Print this help message\n",
      "  -V, --version            Print version\n",
      "\n",
      "Keys:\n",
      "  j/Down k/Up              Move the cursor\n",
      "  Enter                    Open a directory or view a file\n",
      "  v                        View the selected file\n",
      "  d                        Move the selected entry to the trash\n",
      "  Backspace/Esc            Close the viewer\n",
      "  q, Ctrl+C                Quit\n",
      "\n",
      "If no path is given, opens the current directory.",
    ));
    return Ok(());
  }

  if show_version {
    println!("rfd {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  let (config, config_errors) = Config::load();
  let _log_guard = init_logging(&config);

  let root = path_arg.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
  let listing = match resolve_path(&root).and_then(|root| Listing::open(&root)) {
    Ok(listing) => listing,
    Err(e) => {
      tracing::error!(target: "session", error = %e, "cannot start");
      eprintln!("rfd: {e}");
      std::process::exit(1);
    }
  };
  tracing::info!(target: "session", root = %listing.current_path().display(), "start");

  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    tracing::error!(target: "runtime.panic", ?info, "panic");
    original_hook(info);
  }));

  setup_terminal()?;
  let result = run(listing, &config, config_errors);
  restore_terminal()?;
  if let Err(e) = &result {
    tracing::error!(target: "session", error = %e, "terminal failure");
  }
  result
}

fn run(listing: Listing, config: &Config, config_errors: Vec<String>) -> Result<()> {
  let screen = TerminalScreen::new()?;
  let mut app = App::new(screen, listing, config)?;
  app.show_errors(&config_errors)?;

  while !app.should_quit() {
    let event = read_event()?;
    app.handle_event(event)?;
  }
  Ok(())
}

/// Sends log records to `rfd.log` in the data directory. Logging stays off
/// when no directory is available.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
  let log_dir = Config::log_dir()?;
  std::fs::create_dir_all(&log_dir).ok()?;

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
  let file_appender = tracing_appender::rolling::never(&log_dir, "rfd.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .ok()?;
  Some(guard)
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen)?;
  Ok(())
}
