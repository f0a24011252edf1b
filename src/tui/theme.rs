//! TUI color semantics and style constants.
//!
//! Color semantics:
//! - Green: correct answer, selected operand
//! - Red: the wrong answer the learner picked
//! - Cyan: interactive elements (keybinding hints, answer keys)
//! - Yellow: the question itself
//! - Dim: de-emphasized (disabled hints, other choices once answered)

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Correct / success: green.
pub const STYLE_CORRECT: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Wrong pick: red.
pub const STYLE_WRONG: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Interactive element / keybinding hint: cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized text: dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

/// Important text: bold.
pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Question prompt.
pub const STYLE_QUESTION: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Operand toggle: on.
pub const STYLE_CHECKED: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Operand toggle: off.
pub const STYLE_UNCHECKED: Style = Style::new().fg(Color::DarkGray);

/// Score counter in the title bar.
pub const STYLE_SCORE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// TESTS
// ============================================================================
