use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use health_tracker::config::{default_config_path, load_config, save_config, AppConfig};
use health_tracker::quiz::questions::{default_questions, load_questions};
use health_tracker::tracker::{CommandShareTarget, ShareTarget, SystemClipboard};
use health_tracker::{
    draw_app, logger, spawn_store_worker, App, AppSettings, HealthStore, SqliteStore, UserProfile,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "health-tracker", about = "Terminal health tracker", version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(short, long)]
    user: Option<String>,

    /// SQLite database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Redeem a referral code before starting
    #[arg(long = "ref", value_name = "CODE")]
    ref_code: Option<String>,

    /// Forget onboarding answers and run the questionnaire again
    #[arg(long)]
    reset_onboarding: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;
    if config.ensure_user_id() {
        save_config(&config_path, &config)?;
    }
    apply_overrides(&mut config, &cli);

    logger::init(&config.log_path(), &config.logging.level)?;
    tracing::info!(user_id = %config.user.id, config = %config_path.display(), "starting health tracker");

    let mut store = SqliteStore::open(&config.db_path())
        .with_context(|| format!("Failed to open database {}", config.db_path().display()))?;
    let user_id = config.user.id.clone();

    if cli.reset_onboarding {
        store.reset_onboarding(&user_id)?;
        tracing::info!(%user_id, "onboarding reset");
    }

    if let Some(code) = &cli.ref_code {
        match store.redeem_referral_code(&user_id, code) {
            Ok(referrer) => tracing::info!(%user_id, %referrer, "referral code redeemed"),
            Err(e) => {
                tracing::warn!(error = %e, %code, "referral code rejected");
                eprintln!("Could not redeem referral code {}: {}", code, e);
            }
        }
    }

    let profile = store
        .load_profile(&user_id)?
        .unwrap_or_else(|| UserProfile::new(&user_id));

    let questions = match &config.onboarding.questions_file {
        Some(path) => load_questions(path)
            .with_context(|| format!("Failed to load questions from {}", path.display()))?,
        None => default_questions(),
    };

    let share_target = CommandShareTarget::from_command_line(&config.referral.share_command)
        .map(|target| Box::new(target) as Box<dyn ShareTarget>);
    let mut app = App::new(
        profile,
        questions,
        AppSettings {
            today: Local::now().date_naive(),
            mindfulness: config.mindfulness.clone(),
            referral_base_url: config.referral.base_url.clone(),
        },
        Box::new(SystemClipboard::new()),
        share_target,
    )?;

    let (store_handle, worker) = spawn_store_worker(Box::new(store))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &store_handle);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(store_handle);
    if worker.join().is_err() {
        tracing::error!("store worker panicked");
    }
    tracing::info!("health tracker exited");

    result
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(user) = &cli.user {
        config.user.id = user.clone();
    }
    if let Some(db) = &cli.db {
        config.storage.db_path = Some(db.clone());
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &health_tracker::StoreHandle,
) -> Result<()> {
    loop {
        for request in app.take_requests() {
            if let Err(e) = store.send(request) {
                tracing::error!(error = %e, "failed to dispatch store request");
            }
        }
        for response in store.poll() {
            app.apply_store_response(response);
        }
        app.poll_share();

        terminal.draw(|f| draw_app(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
