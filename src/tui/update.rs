//! Pure state transitions: (SessionState, Action) → Transition.
//!
//! Maps semantic key actions onto session transitions. Fully testable
//! without a terminal. A transition the session rejects is logged and the
//! session is returned unchanged (no-op).

use log::debug;

use crate::error::QuizError;
use crate::generator::RandomSource;
use crate::session::{Screen, SessionState};
use crate::types::{Feedback, Operation, PlayConfig};

use super::state::{Action, App, AppEvent, Effect, Transition};

/// Pure state transition function.
///
/// Given the current session, an action and a random source, produces the
/// next transition. The effects boundary interprets the result.
pub fn update<R: RandomSource + ?Sized>(
    session: SessionState,
    action: &Action,
    rng: &mut R,
) -> Transition {
    if *action == Action::Quit {
        return Transition::Quit;
    }

    match session.screen() {
        Screen::Start => update_start(session, action, rng),
        Screen::OperandSelection => update_selection(session, action, rng),
        Screen::Quiz => update_quiz(session, action, rng),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Start: symbol keys or 1-4 pick an operation.
fn update_start<R: RandomSource + ?Sized>(
    mut session: SessionState,
    action: &Action,
    rng: &mut R,
) -> Transition {
    let operation = match action {
        Action::Operation(op) => Some(*op),
        Action::Digit(n @ 1..=4) => Operation::ALL.get(usize::from(*n) - 1).copied(),
        _ => None,
    };

    if let Some(op) = operation {
        let result = session.select_operation(op, rng);
        log_rejected(action, result);
    }
    Transition::Session(session)
}

/// OperandSelection: digits toggle, Enter starts, Back returns to start.
fn update_selection<R: RandomSource + ?Sized>(
    mut session: SessionState,
    action: &Action,
    rng: &mut R,
) -> Transition {
    match action {
        Action::Digit(n) => {
            let result = session.toggle_operand(*n);
            log_rejected(action, result);
        }
        Action::Enter => {
            let result = session.start_practice(rng);
            log_rejected(action, result);
        }
        Action::Back => session.return_to_start(),
        _ => {}
    }
    Transition::Session(session)
}

/// Quiz: 1-3 answer, Enter/Next advance once answered, Back leaves.
///
/// A correct answer requests a scheduled advance; a wrong one waits for
/// the learner.
fn update_quiz<R: RandomSource + ?Sized>(
    mut session: SessionState,
    action: &Action,
    rng: &mut R,
) -> Transition {
    match action {
        Action::Digit(n) => {
            let Some(index) = usize::from(*n).checked_sub(1) else {
                return Transition::Session(session);
            };
            match session.select_answer(index) {
                Ok(Feedback::Correct) => {
                    return Transition::Effect {
                        session,
                        effect: Effect::ScheduleAdvance,
                    };
                }
                Ok(Feedback::Incorrect { .. }) => {}
                Err(e) => log_rejected(action, Err(e)),
            }
        }
        Action::Enter | Action::Next => {
            if session.is_answered() {
                let result = session.advance(rng);
                log_rejected(action, result);
            }
        }
        Action::Back => {
            let result = session.return_to_operand_context();
            log_rejected(action, result);
        }
        _ => {}
    }
    Transition::Session(session)
}

fn log_rejected(action: &Action, result: Result<(), QuizError>) {
    if let Err(e) = result {
        debug!("ignored {:?}: {}", action, e);
    }
}

// ============================================================================
// APP-LEVEL HANDLERS
// ============================================================================

/// Apply a key action to the app and return the effect to execute, if any.
///
/// Any change to the session cancels a pending auto-advance, so a timer
/// armed for an earlier question can never advance a later one.
pub fn apply_action<R: RandomSource + ?Sized>(
    app: &mut App,
    action: &Action,
    rng: &mut R,
) -> Option<Effect> {
    match update(app.session.clone(), action, rng) {
        Transition::Session(next) => {
            if next != app.session {
                app.cancel_advance();
                app.session = next;
            }
            None
        }
        Transition::Quit => {
            app.should_quit = true;
            None
        }
        Transition::Effect { session, effect } => {
            app.cancel_advance();
            app.session = session;
            Some(effect)
        }
    }
}

/// Handle a non-key event.
///
/// An auto-advance only fires if its ticket is still the pending one and
/// the current question is still answered.
pub fn handle_background_event<R: RandomSource + ?Sized>(
    app: &mut App,
    event: AppEvent,
    rng: &mut R,
) {
    match event {
        AppEvent::AutoAdvance { ticket } => {
            if app.pending_advance != Some(ticket) {
                debug!("stale auto-advance {} ignored", ticket);
                return;
            }
            app.cancel_advance();
            if app.session.is_answered() {
                if let Err(e) = app.session.advance(rng) {
                    debug!("auto-advance failed: {}", e);
                }
            }
        }
        // Keys are routed through map_key -> apply_action
        AppEvent::Key(_) => {}
    }
}

/// Build the first session from CLI preselections.
///
/// With an operation preselected, + and - land in the quiz. × and ÷ land
/// on operand selection, or straight in the quiz when operands are given.
pub fn initial_session<R: RandomSource + ?Sized>(
    config: &PlayConfig,
    rng: &mut R,
) -> Result<SessionState, QuizError> {
    let mut session = SessionState::new();

    if let Some(op) = config.operation {
        session.select_operation(op, rng)?;
        if op.uses_operands() && !config.operands.is_empty() {
            for n in config.operands.iter() {
                session.toggle_operand(n)?;
            }
            session.start_practice(rng)?;
        }
    }

    Ok(session)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperandSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn expect_session(t: Transition) -> SessionState {
        match t {
            Transition::Session(s) => s,
            other => panic!("Expected Session, got {:?}", other),
        }
    }

    fn quiz(op: Operation, rng: &mut StdRng) -> SessionState {
        let mut session = SessionState::new();
        session.select_operation(op, rng).unwrap();
        if op.uses_operands() {
            session.toggle_operand(3).unwrap();
            session.start_practice(rng).unwrap();
        }
        session
    }

    fn correct_digit(session: &SessionState) -> u8 {
        session.current_question().unwrap().correct_index as u8 + 1
    }

    fn wrong_digit(session: &SessionState) -> u8 {
        (session.current_question().unwrap().correct_index as u8 + 1) % 3 + 1
    }

    // -- Quit --

    #[test]
    fn quit_from_every_screen() {
        let mut rng = rng();
        for session in [SessionState::new(), quiz(Operation::Add, &mut rng)] {
            assert_eq!(update(session, &Action::Quit, &mut rng), Transition::Quit);
        }
    }

    // -- Start --

    #[test]
    fn start_symbol_selects_operation() {
        let s = expect_session(update(
            SessionState::new(),
            &Action::Operation(Operation::Divide),
            &mut rng(),
        ));
        assert_eq!(s.screen(), Screen::OperandSelection);
        assert_eq!(s.operation(), Some(Operation::Divide));
    }

    #[test]
    fn start_number_keys_follow_menu_order() {
        let s = expect_session(update(SessionState::new(), &Action::Digit(3), &mut rng()));
        assert_eq!(s.operation(), Some(Operation::Add));
        assert_eq!(s.screen(), Screen::Quiz);
    }

    #[test]
    fn start_ignores_other_digits() {
        let s = expect_session(update(SessionState::new(), &Action::Digit(7), &mut rng()));
        assert_eq!(s, SessionState::new());
    }

    // -- OperandSelection --

    #[test]
    fn selection_digits_toggle() {
        let mut rng = rng();
        let mut session = SessionState::new();
        session.select_operation(Operation::Multiply, &mut rng).unwrap();

        let s = expect_session(update(session, &Action::Digit(0), &mut rng));
        assert!(s.selected_operands().contains(0));
        let s = expect_session(update(s, &Action::Digit(0), &mut rng));
        assert!(s.selected_operands().is_empty());
    }

    #[test]
    fn selection_enter_without_operands_is_noop() {
        let mut rng = rng();
        let mut session = SessionState::new();
        session.select_operation(Operation::Multiply, &mut rng).unwrap();
        let before = session.clone();
        let s = expect_session(update(session, &Action::Enter, &mut rng));
        assert_eq!(s, before);
    }

    #[test]
    fn selection_enter_starts_practice() {
        let mut rng = rng();
        let mut session = SessionState::new();
        session.select_operation(Operation::Multiply, &mut rng).unwrap();
        let s = expect_session(update(session, &Action::Digit(5), &mut rng));
        let s = expect_session(update(s, &Action::Digit(7), &mut rng));
        let s = expect_session(update(s, &Action::Enter, &mut rng));
        assert_eq!(s.screen(), Screen::Quiz);
        assert_eq!(s.practice_operands(), &OperandSet::from_operands([5, 7]).unwrap());
    }

    #[test]
    fn selection_back_returns_to_start() {
        let mut rng = rng();
        let mut session = SessionState::new();
        session.select_operation(Operation::Divide, &mut rng).unwrap();
        let s = expect_session(update(session, &Action::Back, &mut rng));
        assert_eq!(s, SessionState::new());
    }

    // -- Quiz --

    #[test]
    fn correct_answer_schedules_advance() {
        let mut rng = rng();
        let session = quiz(Operation::Add, &mut rng);
        let digit = correct_digit(&session);
        match update(session, &Action::Digit(digit), &mut rng) {
            Transition::Effect { session, effect } => {
                assert_eq!(effect, Effect::ScheduleAdvance);
                assert_eq!(session.score(), 1);
            }
            other => panic!("Expected Effect, got {:?}", other),
        }
    }

    #[test]
    fn wrong_answer_waits_for_learner() {
        let mut rng = rng();
        let session = quiz(Operation::Subtract, &mut rng);
        let digit = wrong_digit(&session);
        let s = expect_session(update(session, &Action::Digit(digit), &mut rng));
        assert_eq!((s.score(), s.total_answered()), (0, 1));
        assert!(s.is_answered());
    }

    #[test]
    fn digit_zero_and_four_are_ignored_in_quiz() {
        let mut rng = rng();
        let session = quiz(Operation::Add, &mut rng);
        let before = session.clone();
        let s = expect_session(update(session, &Action::Digit(0), &mut rng));
        let s = expect_session(update(s, &Action::Digit(4), &mut rng));
        assert_eq!(s, before);
    }

    #[test]
    fn enter_before_answer_is_noop() {
        let mut rng = rng();
        let session = quiz(Operation::Add, &mut rng);
        let before = session.clone();
        let s = expect_session(update(session, &Action::Enter, &mut rng));
        assert_eq!(s, before);
    }

    #[test]
    fn next_after_answer_advances() {
        let mut rng = rng();
        let session = quiz(Operation::Multiply, &mut rng);
        let digit = wrong_digit(&session);
        let s = expect_session(update(session, &Action::Digit(digit), &mut rng));
        let s = expect_session(update(s, &Action::Next, &mut rng));
        assert!(!s.is_answered());
        assert_eq!(s.total_answered(), 1);
        assert_eq!(s.current_question().unwrap().right, 3);
    }

    #[test]
    fn back_from_multiply_quiz_goes_to_selection() {
        let mut rng = rng();
        let session = quiz(Operation::Multiply, &mut rng);
        let s = expect_session(update(session, &Action::Back, &mut rng));
        assert_eq!(s.screen(), Screen::OperandSelection);
    }

    #[test]
    fn back_from_add_quiz_goes_to_start() {
        let mut rng = rng();
        let session = quiz(Operation::Add, &mut rng);
        let s = expect_session(update(session, &Action::Back, &mut rng));
        assert_eq!(s, SessionState::new());
    }

    // -- App-level: auto-advance tickets --

    #[test]
    fn correct_answer_returns_effect_from_apply() {
        let mut rng = rng();
        let mut app = App::with_session(quiz(Operation::Add, &mut rng));
        let digit = correct_digit(&app.session);
        let effect = apply_action(&mut app, &Action::Digit(digit), &mut rng);
        assert_eq!(effect, Some(Effect::ScheduleAdvance));
        assert!(app.session.is_answered());
    }

    #[test]
    fn pending_ticket_advances() {
        let mut rng = rng();
        let mut app = App::with_session(quiz(Operation::Add, &mut rng));
        let digit = correct_digit(&app.session);
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        let ticket = app.schedule_advance();

        handle_background_event(&mut app, AppEvent::AutoAdvance { ticket }, &mut rng);
        assert!(!app.session.is_answered());
        assert_eq!(app.pending_advance, None);
        assert_eq!(app.session.score(), 1);
    }

    #[test]
    fn navigating_away_cancels_auto_advance() {
        let mut rng = rng();
        let mut app = App::with_session(quiz(Operation::Multiply, &mut rng));
        let digit = correct_digit(&app.session);
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        let ticket = app.schedule_advance();

        apply_action(&mut app, &Action::Back, &mut rng);
        assert_eq!(app.pending_advance, None);

        let before = app.session.clone();
        handle_background_event(&mut app, AppEvent::AutoAdvance { ticket }, &mut rng);
        assert_eq!(app.session, before);
    }

    #[test]
    fn manual_advance_then_new_answer_ignores_old_timer() {
        let mut rng = rng();
        let mut app = App::with_session(quiz(Operation::Add, &mut rng));
        let digit = correct_digit(&app.session);
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        let stale = app.schedule_advance();

        // Learner moves on and answers the next question wrongly
        apply_action(&mut app, &Action::Enter, &mut rng);
        let digit = wrong_digit(&app.session);
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        let answered = app.session.clone();

        handle_background_event(&mut app, AppEvent::AutoAdvance { ticket: stale }, &mut rng);
        assert_eq!(app.session, answered);
    }

    #[test]
    fn unchanged_session_keeps_pending_ticket() {
        let mut rng = rng();
        let mut app = App::with_session(quiz(Operation::Add, &mut rng));
        let digit = correct_digit(&app.session);
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        let ticket = app.schedule_advance();

        // Pressing another answer key is rejected and changes nothing
        apply_action(&mut app, &Action::Digit(digit), &mut rng);
        assert_eq!(app.pending_advance, Some(ticket));
        assert_eq!(app.session.total_answered(), 1);
    }

    #[test]
    fn apply_quit_sets_flag() {
        let mut app = App::new();
        apply_action(&mut app, &Action::Quit, &mut rng());
        assert!(app.should_quit);
    }

    // -- Initial session --

    #[test]
    fn initial_session_defaults_to_start() {
        let session = initial_session(&PlayConfig::default(), &mut rng()).unwrap();
        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn initial_session_with_operands_starts_practice() {
        let config = PlayConfig {
            operation: Some(Operation::Divide),
            operands: OperandSet::from_operands([2, 9]).unwrap(),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng()).unwrap();
        assert_eq!(session.screen(), Screen::Quiz);
        assert_eq!(session.practice_operands().to_vec(), vec![2, 9]);
    }

    #[test]
    fn initial_session_multiply_without_operands_waits_for_selection() {
        let config = PlayConfig {
            operation: Some(Operation::Multiply),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng()).unwrap();
        assert_eq!(session.screen(), Screen::OperandSelection);
    }

    #[test]
    fn initial_session_add_ignores_operands() {
        let config = PlayConfig {
            operation: Some(Operation::Add),
            operands: OperandSet::from_operands([4]).unwrap(),
            ..Default::default()
        };
        let session = initial_session(&config, &mut rng()).unwrap();
        assert_eq!(session.screen(), Screen::Quiz);
        assert!(session.practice_operands().is_empty());
    }
}
