//! Error taxonomy for the quiz core.
//!
//! Every variant is a caller contract violation surfaced synchronously.
//! None of them are runtime I/O failures: the core does no I/O.

use thiserror::Error;

/// Errors emitted by the generator and the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// Text that does not name one of the four operations.
    #[error("unknown operation: {0:?}")]
    InvalidOperation(String),

    /// Operand outside the selectable 0-9 range.
    #[error("operand {0} is outside 0-9")]
    InvalidOperand(u8),

    /// A transition was invoked while its precondition does not hold.
    #[error("cannot {transition}: {reason}")]
    InvalidState {
        transition: &'static str,
        reason: &'static str,
    },

    /// Answer index does not name one of the displayed choices.
    #[error("answer index {index} is out of range ({choices} choices)")]
    AnswerOutOfRange { index: usize, choices: usize },

    /// The bounded distractor retry ran out of draws.
    #[error("no distinct wrong answers for {correct_value} after {attempts} draws")]
    DistractorsExhausted { correct_value: u32, attempts: usize },
}

impl QuizError {
    pub(crate) fn invalid_state(transition: &'static str, reason: &'static str) -> Self {
        QuizError::InvalidState { transition, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_transition() {
        let err = QuizError::invalid_state("start practice", "no operands selected");
        assert_eq!(err.to_string(), "cannot start practice: no operands selected");
    }

    #[test]
    fn invalid_operation_quotes_input() {
        let err = QuizError::InvalidOperation("%".into());
        assert_eq!(err.to_string(), "unknown operation: \"%\"");
    }
}
