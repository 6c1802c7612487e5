mod ui;

use aimdrill::config::{Config, ConfigStore, FileConfigStore};
use aimdrill::engine::{Engine, Phase, COUNTDOWN_TICK_MS};
use aimdrill::runtime::{
    CrosstermEventSource, DrillEvent, FixedTicker, Runner, SystemClock,
};
use aimdrill::settings::{self, GameMode, GameSettings, DURATION_STEP, SIZE_STEP};
use aimdrill::spawner::Viewport;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// terminal aim trainer with zone scoring and cursor-path analytics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal aim trainer: click targets with the mouse across four drill modes while the engine scores hit zones, reaction times, and cursor-path efficiency."
)]
pub struct Cli {
    /// drill mode to preselect in the menu
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// session length in seconds (10-120)
    #[clap(short = 'd', long)]
    duration: Option<u64>,

    /// base target diameter in pixels (40-140)
    #[clap(short = 't', long)]
    target_size: Option<f64>,

    /// make targets shrink over time in every mode
    #[clap(long)]
    shrink: bool,

    /// seed target placement for reproducible drills
    #[clap(long)]
    seed: Option<u64>,
}

/// Menu selections being edited before a session starts.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub mode_idx: usize,
    pub duration_secs: u64,
    pub target_size: f64,
    pub shrink_targets: bool,
}

impl MenuState {
    fn from_config(cfg: &Config, cli: &Cli) -> Self {
        let mode = cli.mode.unwrap_or(cfg.mode);
        Self {
            mode_idx: GameMode::ALL.iter().position(|m| *m == mode).unwrap_or(0),
            duration_secs: settings::clamp_duration(cli.duration.unwrap_or(cfg.duration_secs)),
            target_size: settings::clamp_size(cli.target_size.unwrap_or(cfg.target_size)),
            shrink_targets: cli.shrink || cfg.shrink_targets,
        }
    }

    fn mode(&self) -> GameMode {
        GameMode::ALL[self.mode_idx]
    }

    fn settings(&self) -> GameSettings {
        let mut s = GameSettings::preset(self.mode(), self.duration_secs, self.target_size);
        s.shrink_targets = s.shrink_targets || self.shrink_targets;
        s
    }
}

pub struct App {
    pub engine: Engine<SystemClock>,
    pub menu: MenuState,
    store: FileConfigStore,
}

impl App {
    pub fn new(cli: &Cli, viewport: Viewport) -> Self {
        let store = FileConfigStore::new();
        let menu = MenuState::from_config(&store.load(), cli);
        let engine = match cli.seed {
            Some(seed) => Engine::with_seed(SystemClock::new(), viewport, seed),
            None => Engine::new(SystemClock::new(), viewport),
        };
        Self {
            engine,
            menu,
            store,
        }
    }

    fn start_session(&mut self) {
        let settings = self.menu.settings();
        let _ = self.store.save(&Config::from(&settings));
        self.engine.start(settings);
    }

    fn restart_session(&mut self) {
        let settings = *self.engine.settings();
        self.engine.start(settings);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let (vw, vh) = ui::viewport_px(size.width, size.height);
    let mut app = App::new(&cli, Viewport::new(vw, vh));

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(COUNTDOWN_TICK_MS)),
    );

    terminal.draw(|f| draw(app, f))?;

    loop {
        match runner.step() {
            DrillEvent::Tick => {
                if app.engine.phase() == Phase::Playing {
                    app.engine.on_tick();
                    terminal.draw(|f| draw(app, f))?;
                }
            }
            DrillEvent::Resize(w, h) => {
                let (vw, vh) = ui::viewport_px(w, h);
                app.engine.set_viewport(vw, vh);
                terminal.draw(|f| draw(app, f))?;
            }
            DrillEvent::Mouse(mouse) => {
                handle_mouse(app, mouse);
                terminal.draw(|f| draw(app, f))?;
            }
            DrillEvent::Key(key) => {
                if should_quit(app, key) {
                    break;
                }
                terminal.draw(|f| draw(app, f))?;
            }
        }
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.engine.phase() != Phase::Playing {
        return;
    }
    let (px, py) = ui::cell_center_px(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => resolve_click(app, px, py),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => app.engine.on_pointer_move(px, py),
        _ => {}
    }
}

/// Resolve a click against the live target set: the first target whose
/// current rendered rings contain the point takes the hit, anything else is
/// a miss.
fn resolve_click(app: &mut App, px: f64, py: f64) {
    let now = app.engine.now_ms();
    let hit = app.engine.targets().iter().rev().find_map(|target| {
        let zone = target.classify_click(px, py, now);
        zone.is_hit().then_some((target.id, zone))
    });
    match hit {
        Some((id, zone)) => app.engine.on_target_hit(id, zone, px, py),
        None => app.engine.on_miss(),
    }
}

/// Returns true when the app should exit.
fn should_quit(app: &mut App, key: KeyEvent) -> bool {
    // ctrl+c quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.engine.phase() {
        Phase::Menu => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Left => {
                app.menu.mode_idx =
                    (app.menu.mode_idx + GameMode::ALL.len() - 1) % GameMode::ALL.len();
            }
            KeyCode::Right => {
                app.menu.mode_idx = (app.menu.mode_idx + 1) % GameMode::ALL.len();
            }
            KeyCode::Up => {
                app.menu.duration_secs =
                    settings::clamp_duration(app.menu.duration_secs + DURATION_STEP);
            }
            KeyCode::Down => {
                app.menu.duration_secs = settings::clamp_duration(
                    app.menu.duration_secs.saturating_sub(DURATION_STEP),
                );
            }
            KeyCode::Char(']') => {
                app.menu.target_size = settings::clamp_size(app.menu.target_size + SIZE_STEP);
            }
            KeyCode::Char('[') => {
                app.menu.target_size = settings::clamp_size(app.menu.target_size - SIZE_STEP);
            }
            KeyCode::Enter => app.start_session(),
            _ => {}
        },
        Phase::Playing => {
            // esc abandons the session early and shows results
            if key.code == KeyCode::Esc {
                app.engine.end();
            }
        }
        Phase::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('r') => app.restart_session(),
            KeyCode::Char('m') => app.engine.reset_to_menu(),
            _ => {}
        },
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            mode: None,
            duration: None,
            target_size: None,
            shrink: false,
            seed: Some(7),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&cli(), Viewport::new(1920.0, 1080.0))
    }

    #[test]
    fn test_menu_state_defaults() {
        let menu = MenuState::from_config(&Config::default(), &cli());
        assert_eq!(menu.mode(), GameMode::Classic);
        assert_eq!(menu.duration_secs, 30);
        assert_eq!(menu.target_size, 80.0);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut c = cli();
        c.mode = Some(GameMode::Tracking);
        c.duration = Some(60);
        c.target_size = Some(100.0);
        let menu = MenuState::from_config(&Config::default(), &c);
        assert_eq!(menu.mode(), GameMode::Tracking);
        assert_eq!(menu.duration_secs, 60);
        assert_eq!(menu.target_size, 100.0);
    }

    #[test]
    fn test_cli_values_clamped() {
        let mut c = cli();
        c.duration = Some(500);
        c.target_size = Some(1.0);
        let menu = MenuState::from_config(&Config::default(), &c);
        assert_eq!(menu.duration_secs, 120);
        assert_eq!(menu.target_size, 40.0);
    }

    #[test]
    fn test_menu_mode_cycling() {
        let mut app = app();
        app.menu.mode_idx = 0;
        assert_eq!(app.menu.mode(), GameMode::Classic);
        should_quit(&mut app, key(KeyCode::Right));
        assert_eq!(app.menu.mode(), GameMode::Speed);
        should_quit(&mut app, key(KeyCode::Left));
        should_quit(&mut app, key(KeyCode::Left));
        assert_eq!(app.menu.mode(), GameMode::Tracking);
    }

    #[test]
    fn test_menu_duration_steps_and_clamps() {
        let mut app = app();
        for _ in 0..30 {
            should_quit(&mut app, key(KeyCode::Up));
        }
        assert_eq!(app.menu.duration_secs, 120);
        for _ in 0..30 {
            should_quit(&mut app, key(KeyCode::Down));
        }
        assert_eq!(app.menu.duration_secs, 10);
    }

    #[test]
    fn test_menu_size_steps_and_clamps() {
        let mut app = app();
        for _ in 0..10 {
            should_quit(&mut app, key(KeyCode::Char(']')));
        }
        assert_eq!(app.menu.target_size, 140.0);
        for _ in 0..15 {
            should_quit(&mut app, key(KeyCode::Char('[')));
        }
        assert_eq!(app.menu.target_size, 40.0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(should_quit(&mut app, key(KeyCode::Esc)));
        assert!(should_quit(&mut app, key(KeyCode::Char('q'))));
        assert!(should_quit(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn test_escape_during_play_ends_session() {
        let mut app = app();
        app.engine.start(GameSettings::default());
        assert!(!should_quit(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.engine.phase(), Phase::Results);
    }

    #[test]
    fn test_results_keys() {
        let mut app = app();
        app.engine.start(GameSettings::default());
        app.engine.end();

        assert!(!should_quit(&mut app, key(KeyCode::Char('r'))));
        assert_eq!(app.engine.phase(), Phase::Playing);

        app.engine.end();
        assert!(!should_quit(&mut app, key(KeyCode::Char('m'))));
        assert_eq!(app.engine.phase(), Phase::Menu);
    }

    #[test]
    fn test_click_resolution() {
        let mut app = app();
        app.engine.start(GameSettings::default());
        let target = app.engine.targets()[0].clone();
        let (cx, cy) = target.center();

        resolve_click(&mut app, cx, cy);
        assert_eq!(app.engine.stats().hits, 1);
        assert_eq!(app.engine.stats().shots[0].score, 5);

        resolve_click(&mut app, -100.0, -100.0);
        assert_eq!(app.engine.stats().misses, 1);
    }
}
