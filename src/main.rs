use carrot_field::{
    app::{App, ExitType, TICK_RATE_MS},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    field::{Field, FieldGeometry},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    sound::{AudioCueProvider, Muted, TerminalBell},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    rc::Rc,
    time::Duration,
};

/// click every carrot before the clock runs out, and leave the bugs alone
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed carrot-picking game for the terminal. Click all the carrots in the field with the mouse before the countdown ends; clicking a bug loses the round."
)]
pub struct Cli {
    /// number of seconds on the clock
    #[clap(short = 'd', long)]
    duration: Option<u32>,

    /// number of carrots to pick
    #[clap(short = 'c', long)]
    carrots: Option<u32>,

    /// number of bugs hiding in the field
    #[clap(short = 'b', long)]
    bugs: Option<u32>,

    /// seed for item placement, for repeatable layouts
    #[clap(long)]
    seed: Option<u64>,

    /// play without the terminal bell
    #[clap(long)]
    mute: bool,

    /// write the resulting settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Flags given on the command line win over the stored config.
    fn merge(&self, stored: Config) -> Config {
        Config {
            duration_secs: self.duration.unwrap_or(stored.duration_secs),
            carrot_count: self.carrots.unwrap_or(stored.carrot_count),
            bug_count: self.bugs.unwrap_or(stored.bug_count),
            sound: stored.sound && !self.mute,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let config = cli.merge(store.load());
    let game_config = match config.game_config() {
        Ok(game_config) => game_config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    if cli.save_config {
        store.save(&config)?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let field = match cli.seed {
        Some(seed) => Field::with_seed(FieldGeometry::default(), seed),
        None => Field::new(FieldGeometry::default()),
    };
    let audio: Rc<dyn AudioCueProvider> = if config.sound {
        Rc::new(TerminalBell::stdout())
    } else {
        Rc::new(Muted)
    };

    let events = CrosstermEventSource::new();
    let mut app = App::new(game_config, field, audio, events.sender());
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    let result = start_tui(&mut terminal, &runner, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        if app.handle_event(runner.step()) == ExitType::Quit {
            break;
        }
        // every tick redraws so the bugs keep swaying
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    log::info!("bye");
    Ok(())
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}
