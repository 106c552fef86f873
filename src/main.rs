use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use neon_snake::config::EngineConfig;
use neon_snake::constants::FRAME_POLL_MS;
use neon_snake::game::{
    process_input, restart_game, tick_snake, FinishedRun, GameInput, GamePhase, GridSpec,
    InputOutcome, SnakeGame,
};
use neon_snake::input::{map_key, SwipeTracker};
use neon_snake::ui::snake_scene::{field_viewport, render_snake_scene};
use neon_snake::utils::persistence::{self, RunRecord};
use neon_snake::utils::{build_info, logging};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const CANNOT_START: &str = "Cannot start: the terminal is too small for a play field";

/// Raw mode + alternate screen + mouse capture, undone on drop so a panic or
/// early return still leaves a usable terminal.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(DisableMouseCapture);
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn grid_for(area: Rect, config: &EngineConfig) -> GridSpec {
    let (w, h) = field_viewport(area);
    GridSpec::from_viewport(w, h, &config.grid)
}

/// Save the high score and append to the run history. Failures are logged only.
fn persist_run(run: &FinishedRun) {
    if run.new_high_score {
        match persistence::save_high_score(run.score) {
            Ok(()) => info!(score = run.score, "high score saved"),
            Err(e) => warn!(error = %e, "could not save high score"),
        }
    }
    if let Err(e) = persistence::record_run(RunRecord::from_finished(run)) {
        warn!(error = %e, "could not record run history");
    }
}

fn print_history() {
    let history = persistence::load_history();
    if history.is_empty() {
        println!("No games played yet.");
        return;
    }
    println!("{:<27} {:>7} {:>5} {:>6}  Cause", "Finished", "Score", "Level", "Length");
    for run in history.iter().rev() {
        println!(
            "{:<27} {:>7} {:>5} {:>6}  {}",
            run.finished_at,
            run.score,
            run.level,
            run.length,
            run.cause.describe()
        );
    }
}

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Neon Snake - terminal snake with power-ups\n");
                println!("Usage: neon-snake [option]\n");
                println!("Options:");
                println!("  --history           Show the last games played");
                println!("  --reset-high-score  Set the saved high score back to 0");
                println!("  --version           Show version information");
                println!("  --help              Show this help message");
                println!("\nControls: arrows/WASD move, Shift+arrow or B boosts,");
                println!("Space pauses, R restarts, Q or Esc quits.");
                std::process::exit(0);
            }
            "--history" => {
                print_history();
                std::process::exit(0);
            }
            "--reset-high-score" => {
                persistence::save_high_score(0)?;
                println!("High score reset.");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'neon-snake --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = logging::init() {
        eprintln!("Logging disabled: {}", e);
    }
    info!(version = %build_info::version_line(), "starting");

    let config = EngineConfig::load();
    let high_score = persistence::load_high_score();

    let mut session = TerminalSession::start()?;
    let mut rng = rand::thread_rng();

    let mut latest_grid = grid_for(session.terminal.size()?, &config);
    let mut game = SnakeGame::new(latest_grid, config.clone(), high_score, &mut rng);
    info!(
        width = latest_grid.width,
        height = latest_grid.height,
        cell = latest_grid.cell_size,
        "play field sized"
    );

    let clock = Instant::now();
    let mut last_tick = Instant::now();
    let mut swipes = SwipeTracker::new();
    let mut notice: Option<&str> = None;

    // Main loop
    loop {
        session.terminal.draw(|frame| {
            render_snake_scene(frame, frame.size(), &game, notice);
        })?;

        if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
            let input = match event::read()? {
                Event::Key(key) => Some(map_key(key)),
                Event::Mouse(mouse) => {
                    let now_ms = clock.elapsed().as_millis() as u64;
                    swipes.handle(mouse, now_ms).map(GameInput::Move)
                }
                Event::Resize(cols, rows) => {
                    latest_grid = grid_for(Rect::new(0, 0, cols, rows), &config);
                    None
                }
                _ => None,
            };

            if let Some(input) = input {
                // Leaving game over starts a fresh run, which may take the new size.
                let replays = matches!(
                    input,
                    GameInput::Start | GameInput::Pause | GameInput::Restart
                );
                if game.phase == GamePhase::GameOver && replays {
                    game.grid = latest_grid;
                }

                if input != GameInput::Other {
                    notice = None;
                }
                match process_input(&mut game, input, &mut rng) {
                    InputOutcome::Continue => {}
                    InputOutcome::CannotStart => notice = Some(CANNOT_START),
                    InputOutcome::Quit => {
                        if let Some(run) = game.take_finished() {
                            persist_run(&run);
                        }
                        break;
                    }
                }
            }
        }

        // The grid never changes under a running game.
        if game.phase == GamePhase::Ready && game.grid != latest_grid {
            game.grid = latest_grid;
            let _ = restart_game(&mut game, false, &mut rng);
            info!(
                width = latest_grid.width,
                height = latest_grid.height,
                "play field resized"
            );
        }

        let now = Instant::now();
        let dt_ms = now.duration_since(last_tick).as_millis() as u64;
        last_tick = now;
        tick_snake(&mut game, dt_ms, &mut rng);

        if let Some(run) = game.take_finished() {
            persist_run(&run);
        }
    }

    info!("neon-snake exiting");
    Ok(())
}
