//! desk-tui: terminal client for the support desk

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use desk_client::config::DEFAULT_BASE_URL;
use desk_client::{ClientConfig, DeskClient, SessionContext};
use desk_tui::{App, logging};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "desk-tui", version, about = "Support desk terminal client")]
struct Cli {
    /// API base URL
    #[arg(long, env = "SUPPORT_DESK_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds (none by default)
    #[arg(long, env = "SUPPORT_DESK_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Where the session survives restarts
    #[arg(long, env = "SUPPORT_DESK_SESSION_FILE", default_value = ".desk-session.json")]
    session_file: PathBuf,

    #[arg(long, env = "SUPPORT_DESK_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Initial path, e.g. `/ticket/3`
    #[arg(long)]
    open: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _guard = logging::init_logging(&cli.log_dir)?;
    tracing::info!(api_url = %cli.api_url, "Starting desk-tui");

    let mut config = ClientConfig::new(&cli.api_url).with_session_file(&cli.session_file);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(secs);
    }
    let session = SessionContext::from_config(&config);
    let client = DeskClient::connect(&config, session)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let app = App::new(client, cli.open.as_deref());
    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        tracing::error!("desk-tui failed: {:#}", e);
    }
    res
}
