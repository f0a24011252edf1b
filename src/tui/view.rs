//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()`
//! dispatches on the session's current Screen. Widget-building functions
//! are pure (state in, widgets out); the only effect is
//! Frame::render_widget() which writes to the terminal buffer.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::session::{Screen, SessionState};
use crate::types::{Feedback, Operation, Question, OPERAND_MAX};

use super::state::App;
use super::theme;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Common layout: title bar at top, content in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // content
        Constraint::Length(1), // help
    ])
    .split(area);

    let session = &app.session;

    frame.render_widget(render_title(session), chunks[0]);
    frame.render_widget(render_help(session), chunks[2]);

    let content_area = chunks[1];

    match session.screen() {
        Screen::Start => render_start(frame, content_area),
        Screen::OperandSelection => render_selection(session, frame, content_area),
        Screen::Quiz => match session.current_question() {
            Some(question) => render_quiz(
                question,
                session,
                app.pending_advance.is_some(),
                frame,
                content_area,
            ),
            None => {
                let err = Paragraph::new("No question").style(theme::STYLE_WRONG);
                frame.render_widget(err, content_area);
            }
        },
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar: app name, or operation and running score.
fn render_title(session: &SessionState) -> Paragraph<'static> {
    let mut spans = Vec::new();

    match (session.screen(), session.operation()) {
        (Screen::OperandSelection, Some(op)) => {
            spans.push(Span::styled(
                format!("Choose {} Numbers", op.name()),
                theme::STYLE_TITLE,
            ));
        }
        (Screen::Quiz, Some(op)) => {
            spans.push(Span::styled(format!("{} Practice", op.name()), theme::STYLE_TITLE));
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("Score: {} / {}", session.score(), session.total_answered()),
                theme::STYLE_SCORE,
            ));
        }
        _ => spans.push(Span::styled("Friendly Numbers", theme::STYLE_TITLE)),
    }

    Paragraph::new(Line::from(spans))
}

/// Help line showing available keybindings for the current screen.
fn render_help(session: &SessionState) -> Paragraph<'static> {
    let help_text = match session.screen() {
        Screen::Start => "[1-4] or [* / + -] choose  [q] quit",
        Screen::OperandSelection => "[0-9] toggle  [Enter] start  [Esc] back  [q] quit",
        Screen::Quiz => {
            let back_to_numbers = session.operation().is_some_and(Operation::uses_operands);
            match (session.is_answered(), back_to_numbers) {
                (false, true) => "[1-3] answer  [Esc] back to numbers  [q] quit",
                (false, false) => "[1-3] answer  [Esc] back to start  [q] quit",
                (true, true) => "[Enter] next question  [Esc] back to numbers  [q] quit",
                (true, false) => "[Enter] next question  [Esc] back to start  [q] quit",
            }
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

// ============================================================================
// SCREEN: START
// ============================================================================

fn render_start(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  What would you like to practice?",
            theme::STYLE_IMPORTANT,
        )),
        Line::from(""),
    ];

    for (i, op) in Operation::ALL.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), theme::STYLE_INTERACTIVE),
            Span::styled(format!("{}  ", op.symbol()), theme::STYLE_QUESTION),
            Span::raw(op.name()),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// SCREEN: OPERAND SELECTION
// ============================================================================

fn render_selection(session: &SessionState, frame: &mut Frame, area: Rect) {
    let selected = session.selected_operands();
    let noun = match session.operation() {
        Some(Operation::Divide) => "divisors",
        _ => "multipliers",
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(format!("  Select the {} you want to practice with:", noun)),
        Line::from(""),
    ];

    let mut toggles = vec![Span::raw("  ")];
    for n in 0..=OPERAND_MAX {
        if selected.contains(n) {
            toggles.push(Span::styled(format!("[{}]", n), theme::STYLE_CHECKED));
        } else {
            toggles.push(Span::styled(format!(" {} ", n), theme::STYLE_UNCHECKED));
        }
        toggles.push(Span::raw(" "));
    }
    lines.push(Line::from(toggles));
    lines.push(Line::from(""));

    if selected.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Select at least one number to start",
            theme::STYLE_DIM,
        )));
    } else {
        lines.push(Line::from(vec![
            Span::raw("  Selected: "),
            Span::styled(selected.to_string(), theme::STYLE_IMPORTANT),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  [Enter] ", theme::STYLE_INTERACTIVE),
            Span::raw("Start practice"),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// SCREEN: QUIZ
// ============================================================================

fn render_quiz(
    question: &Question,
    session: &SessionState,
    advance_pending: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let selected = session.selected_answer();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", question.text), theme::STYLE_QUESTION)),
        Line::from(""),
    ];

    for (i, choice) in question.choices.iter().enumerate() {
        let style = match selected {
            None => theme::STYLE_IMPORTANT,
            Some(_) if i == question.correct_index => theme::STYLE_CORRECT,
            Some(picked) if picked == i => theme::STYLE_WRONG,
            Some(_) => theme::STYLE_DIM,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}]  ", i + 1), theme::STYLE_INTERACTIVE),
            Span::styled(choice.to_string(), style),
        ]));
    }

    lines.push(Line::from(""));

    match session.feedback() {
        Some(Feedback::Correct) => {
            lines.push(Line::from(Span::styled(
                "  Correct! Great job!",
                theme::STYLE_CORRECT,
            )));
            if advance_pending {
                lines.push(Line::from(Span::styled(
                    "  Next question coming up...",
                    theme::STYLE_DIM,
                )));
            }
        }
        Some(Feedback::Incorrect { correct_value }) => {
            lines.push(Line::from(Span::styled(
                format!("  Oops! The correct answer is {}", correct_value),
                theme::STYLE_WRONG,
            )));
        }
        None => {}
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// TESTS
// ============================================================================
