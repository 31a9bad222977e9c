mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pimem::{
    app_dirs::{init_logging, AppDirs},
    config::{Config, ConfigStore, FileConfigStore},
    digits::{Digit, PiSequence},
    game::Game,
    report::{self, ReportError},
    runtime::{
        digit_from_key, is_quit_chord, AppEvent, CrosstermEventSource, EventSource, Runner,
    },
    scores::FileScoreStore,
    session::Mode,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    panic,
    path::PathBuf,
};

/// memory game for the digits of pi
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the digits of pi from memory. Practice mode shows the next digits when \
                  you slip; the real game ends after three wrong guesses and tracks your best \
                  streak per day."
)]
pub struct Cli {
    /// directory holding high_score.txt and daily_scores.txt
    #[clap(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// skip the menu and start straight into a game
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// do not ring the terminal bell on wrong guesses
    #[clap(long)]
    no_bell: bool,

    /// characters of "3.1415..." kept visible while typing
    #[clap(short = 't', long)]
    trail_width: Option<usize>,

    /// where "export" writes the CSV of daily scores
    #[clap(short = 'e', long)]
    export_path: Option<PathBuf>,
}

/// CLI flags layered over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub bell: bool,
    pub trail_width: usize,
    pub export_path: PathBuf,
    pub start_mode: Option<Mode>,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        let explicit_dir = cli.data_dir.clone().or(config.data_dir);
        Self {
            data_dir: AppDirs::resolve_data_dir(explicit_dir.as_deref()),
            bell: config.bell && !cli.no_bell,
            trail_width: cli.trail_width.unwrap_or(config.trail_width),
            export_path: cli.export_path.clone().unwrap_or(config.export_path),
            start_mode: cli.mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Menu,
    Instructions,
    Playing,
    Progress,
    Graph,
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum MenuItem {
    #[strum(to_string = "How to Play")]
    HowToPlay,
    #[strum(to_string = "Practice Game")]
    Practice,
    #[strum(to_string = "Real Game")]
    RealGame,
    #[strum(to_string = "View Progress")]
    Progress,
    #[strum(to_string = "Progress Graph")]
    Graph,
}

pub const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem::HowToPlay,
    MenuItem::Practice,
    MenuItem::RealGame,
    MenuItem::Progress,
    MenuItem::Graph,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game<FileScoreStore>,
    pub settings: Settings,
    pub state: AppState,
    pub menu_index: usize,
    pub progress_scroll: usize,
    /// One-off informational message (export result, no data, ...)
    pub notice: Option<String>,
    pub last_digit: Option<Digit>,
    bell_pending: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let store = FileScoreStore::open(&settings.data_dir);
        let mut app = Self {
            game: Game::new(PiSequence::new(), store),
            state: AppState::Menu,
            menu_index: 0,
            progress_scroll: 0,
            notice: None,
            last_digit: None,
            bell_pending: false,
            settings,
        };
        if let Some(mode) = app.settings.start_mode {
            app.start_game(mode);
        }
        app
    }

    pub fn start_game(&mut self, mode: Mode) {
        self.game.start(mode);
        self.last_digit = None;
        self.notice = None;
        self.state = AppState::Playing;
    }

    pub fn back_to_menu(&mut self) {
        self.game.leave();
        self.last_digit = None;
        self.state = AppState::Menu;
    }

    pub fn select(&mut self, item: MenuItem) {
        self.notice = None;
        match item {
            MenuItem::HowToPlay => self.state = AppState::Instructions,
            MenuItem::Practice => self.start_game(Mode::Practice),
            MenuItem::RealGame => self.start_game(Mode::Timed),
            MenuItem::Progress => {
                self.progress_scroll = 0;
                self.state = AppState::Progress;
            }
            MenuItem::Graph => {
                if self.game.scores().daily_best.is_empty() {
                    self.notice = Some("No scores to plot yet! Play some games first.".to_string());
                } else {
                    self.state = AppState::Graph;
                }
            }
        }
    }

    pub fn export(&mut self) {
        let message = match report::export_csv(self.game.scores(), &self.settings.export_path) {
            Ok(path) => format!("Scores exported! Location: {}", path.display()),
            Err(ReportError::NoData) => "No scores to export yet!".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                format!("Export failed: {e}")
            }
        };
        self.notice = Some(message);
    }

    /// True once per outcome that should ring the bell
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if is_quit_chord(&key) {
            return Flow::Quit;
        }

        match self.state {
            AppState::Menu => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Up => self.menu_index = self.menu_index.saturating_sub(1),
                KeyCode::Down => self.menu_index = (self.menu_index + 1).min(MENU_ITEMS.len() - 1),
                KeyCode::Enter => self.select(MENU_ITEMS[self.menu_index]),
                KeyCode::Char(c) => {
                    let picked = c
                        .to_digit(10)
                        .and_then(|n| (n as usize).checked_sub(1))
                        .and_then(|i| MENU_ITEMS.get(i).copied());
                    if let Some(item) = picked {
                        self.menu_index = MENU_ITEMS.iter().position(|m| *m == item).unwrap_or(0);
                        self.select(item);
                    }
                }
                _ => {}
            },
            AppState::Instructions | AppState::Graph => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace) {
                    self.state = AppState::Menu;
                }
            }
            AppState::Progress => match key.code {
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.notice = None;
                    self.state = AppState::Menu;
                }
                KeyCode::Char('e') => self.export(),
                KeyCode::Up => self.progress_scroll = self.progress_scroll.saturating_sub(1),
                // Clamped while rendering
                KeyCode::Down => self.progress_scroll += 1,
                _ => {}
            },
            AppState::Playing => {
                if let Some(digit) = digit_from_key(&key) {
                    let outcome = self.game.submit(digit);
                    self.last_digit = Some(digit);
                    self.bell_pending = self.settings.bell && outcome.wants_bell();
                    return Flow::Continue;
                }
                match key.code {
                    KeyCode::Esc | KeyCode::Char('b') => self.back_to_menu(),
                    KeyCode::Char('r') if self.playing_mode() == Some(Mode::Practice) => {
                        self.game.restart();
                        self.last_digit = None;
                    }
                    _ => {}
                }
            }
        }

        Flow::Continue
    }

    pub fn playing_mode(&self) -> Option<Mode> {
        self.game.session().map(|s| s.mode)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let settings = Settings::resolve(&cli, config);
    init_logging(&settings.data_dir);
    tracing::info!(data_dir = %settings.data_dir.display(), "starting");

    // Restore the terminal before a panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings);
    let result = start_tui(&mut terminal, &mut app, Runner::new(CrosstermEventSource::new()));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Some(warning) = app.game.warning() {
        eprintln!("{warning}");
    }

    result
}

fn start_tui<B: Backend + Write, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    while let Some(event) = runner.step()? {
        match event {
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
                if app.take_bell() {
                    let backend = terminal.backend_mut();
                    backend.write_all(b"\x07")?;
                    Write::flush(backend)?;
                }
            }
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}
