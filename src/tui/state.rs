//! TUI state algebra: pure types, zero effects.
//!
//! The quiz session itself lives in [`SessionState`]; this module adds what
//! only the terminal front end needs: the event channel payloads, semantic
//! key actions, and the bookkeeping for the auto-advance timer.

use crossterm::event::KeyEvent;

use crate::session::SessionState;
use crate::types::Operation;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - A key reader thread sends `Key` variants
/// - One-shot timer threads send `AutoAdvance` after a correct answer
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// A scheduled advance fired. Ignored unless `ticket` is still pending.
    AutoAdvance { ticket: u64 },
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug, Default)]
pub struct App {
    /// The quiz session being rendered.
    pub session: SessionState,

    /// Ticket of the one auto-advance allowed to fire, if any.
    pub pending_advance: Option<u64>,

    /// Next ticket to hand out. Tickets are never reused.
    pub next_ticket: u64,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already prepared session (e.g. operation preselected).
    pub fn with_session(session: SessionState) -> Self {
        App {
            session,
            ..Self::default()
        }
    }

    /// Reserve a ticket for a new auto-advance, superseding any pending one.
    pub fn schedule_advance(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending_advance = Some(ticket);
        ticket
    }

    /// Drop the pending auto-advance so a late timer does nothing.
    pub fn cancel_advance(&mut self) {
        self.pending_advance = None;
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
///
/// The effects layer maps key presses to Actions.
/// The transition function decides what each Action means per screen:
/// a digit picks an operation, toggles an operand or answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Choose an operation by its symbol key.
    Operation(Operation),
    /// A digit key 0-9.
    Digit(u8),
    /// Confirm: start practice, or next question once answered.
    Enter,
    /// Next question (Space / n).
    Next,
    /// Leave the current screen.
    Back,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this session (may be unchanged).
    Session(SessionState),
    /// Quit the application.
    Quit,
    /// Render this session and execute a side effect.
    Effect { session: SessionState, effect: Effect },
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The answer was correct: advance after the configured delay.
    ScheduleAdvance,
}

// ============================================================================
// TESTS
// ============================================================================
