//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key events
//! - Timer threads: one per correct answer, send a ticketed AutoAdvance
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::types::{Operation, PlayConfig};

use super::state::{Action, App, AppEvent, Effect};
use super::update::{apply_action, handle_background_event, initial_session};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char(' ') | KeyCode::Char('n') => Some(Action::Next),

        // Operations (start screen)
        KeyCode::Char('*') | KeyCode::Char('x') | KeyCode::Char('m') => {
            Some(Action::Operation(Operation::Multiply))
        }
        KeyCode::Char('/') | KeyCode::Char('d') => Some(Action::Operation(Operation::Divide)),
        KeyCode::Char('+') | KeyCode::Char('a') => Some(Action::Operation(Operation::Add)),
        KeyCode::Char('-') | KeyCode::Char('s') => Some(Action::Operation(Operation::Subtract)),

        // Digits: operation menu, operand toggles, answers
        KeyCode::Char(c @ '0'..='9') => Some(Action::Digit(c as u8 - b'0')),

        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                // Windows reports releases too; only presses count
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore mouse, resize, releases
                Err(_) => break,
            }
        }
    });
}

/// Spawn a one-shot timer that requests an advance after `delay`.
fn spawn_advance_timer(ticket: u64, delay: Duration, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        thread::sleep(delay);
        // Best-effort: the loop may already be gone
        let _ = tx.send(AppEvent::AutoAdvance { ticket });
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop until the user quits.
pub fn run(config: PlayConfig) -> io::Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Validate preselections before touching the terminal
    let session = initial_session(&config, &mut rng)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::with_session(session);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx.clone());
    info!("session started (auto-advance: {:?})", config.auto_advance);

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key) {
                    if let Some(effect) = apply_action(&mut app, &action, &mut rng) {
                        handle_effect(effect, &mut app, &config, &tx, &mut rng);
                    }
                }
            }
            background_event => {
                handle_background_event(&mut app, background_event, &mut rng);
            }
        }
    }

    restore_terminal()?;
    info!(
        "session ended: {}/{} correct",
        app.session.score(),
        app.session.total_answered()
    );
    Ok(())
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Handle a side effect requested by a pure transition.
fn handle_effect(
    effect: Effect,
    app: &mut App,
    config: &PlayConfig,
    tx: &mpsc::Sender<AppEvent>,
    rng: &mut StdRng,
) {
    match effect {
        Effect::ScheduleAdvance => match config.auto_advance {
            None => {} // manual mode: wait for Enter
            Some(delay) if delay.is_zero() => {
                let ticket = app.schedule_advance();
                handle_background_event(app, AppEvent::AutoAdvance { ticket }, rng);
            }
            Some(delay) => {
                let ticket = app.schedule_advance();
                debug!("auto-advance {} in {:?}", ticket, delay);
                spawn_advance_timer(ticket, delay, tx.clone());
            }
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn q_maps_to_quit() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn symbol_keys_map_to_operations() {
        assert_eq!(
            map_key(press(KeyCode::Char('*'))),
            Some(Action::Operation(Operation::Multiply))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('/'))),
            Some(Action::Operation(Operation::Divide))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('+'))),
            Some(Action::Operation(Operation::Add))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('-'))),
            Some(Action::Operation(Operation::Subtract))
        );
    }

    #[test]
    fn digit_keys_map_to_digit_actions() {
        for n in 0..=9u8 {
            let key = press(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(key), Some(Action::Digit(n)));
        }
    }

    #[test]
    fn enter_esc_and_space_map_to_navigation() {
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Action::Enter));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::Next));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('z'))), None);
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn immediate_auto_advance_moves_on_without_timer() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = PlayConfig {
            auto_advance: Some(Duration::ZERO),
            operation: Some(Operation::Add),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng).unwrap();
        let mut app = App::with_session(session);
        let correct = app.session.current_question().unwrap().correct_index as u8 + 1;
        let (tx, _rx) = mpsc::channel();

        let effect = apply_action(&mut app, &Action::Digit(correct), &mut rng).unwrap();
        handle_effect(effect, &mut app, &config, &tx, &mut rng);

        assert!(!app.session.is_answered());
        assert_eq!(app.session.score(), 1);
        assert_eq!(app.pending_advance, None);
    }

    #[test]
    fn manual_mode_leaves_question_answered() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = PlayConfig {
            auto_advance: None,
            operation: Some(Operation::Subtract),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng).unwrap();
        let mut app = App::with_session(session);
        let correct = app.session.current_question().unwrap().correct_index as u8 + 1;
        let (tx, _rx) = mpsc::channel();

        let effect = apply_action(&mut app, &Action::Digit(correct), &mut rng).unwrap();
        handle_effect(effect, &mut app, &config, &tx, &mut rng);

        assert!(app.session.is_answered());
        assert_eq!(app.pending_advance, None);
    }

    #[test]
    fn delayed_auto_advance_sends_ticketed_event() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = PlayConfig {
            auto_advance: Some(Duration::from_millis(1)),
            operation: Some(Operation::Add),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng).unwrap();
        let mut app = App::with_session(session);
        let correct = app.session.current_question().unwrap().correct_index as u8 + 1;
        let (tx, rx) = mpsc::channel();

        let effect = apply_action(&mut app, &Action::Digit(correct), &mut rng).unwrap();
        handle_effect(effect, &mut app, &config, &tx, &mut rng);
        let pending = app.pending_advance.expect("ticket scheduled");

        let event = rx.recv_timeout(Duration::from_secs(5)).expect("timer fires");
        match event {
            AppEvent::AutoAdvance { ticket } => assert_eq!(ticket, pending),
            other => panic!("Expected AutoAdvance, got {:?}", other),
        }
    }
}
