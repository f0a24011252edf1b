//! Question generation.
//!
//! Pure functions over an injected random source: (Operation, OperandSet,
//! rng) -> Question. No session state, no I/O.
//!
//! Division questions are built backwards (quotient × divisor = dividend), so
//! every quotient is an exact positive integer and the divisor is never 0.

use log::trace;
use rand::Rng;

use crate::error::QuizError;
use crate::types::{
    Operation, OperandSet, Question, CHOICE_COUNT, FACTOR_MAX, MAX_DISTRACTOR_ATTEMPTS,
    WRONG_ANSWER_COUNT,
};

// ============================================================================
// RANDOM SOURCE
// ============================================================================

/// Uniform integer source the generator draws from.
///
/// Every `rand::Rng` is a `RandomSource`; tests supply scripted sources to
/// pin exact outputs.
pub trait RandomSource {
    /// Uniform value in `0..bound`. `bound` is always at least 1.
    fn pick_below(&mut self, bound: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick_below(&mut self, bound: u32) -> u32 {
        self.gen_range(0..bound)
    }
}

// ============================================================================
// QUESTION GENERATION
// ============================================================================

/// Generate one question for `operation`.
///
/// A non-empty `practice_operands` fixes the second factor (×) or the divisor
/// (÷) to one of its members; it is ignored for + and -.
///
/// # Errors
/// Returns `DistractorsExhausted` if the bounded wrong-answer retry runs out.
pub fn generate<R: RandomSource + ?Sized>(
    operation: Operation,
    practice_operands: &OperandSet,
    rng: &mut R,
) -> Result<Question, QuizError> {
    let (left, right, correct_value) = match operation {
        Operation::Multiply => {
            let (f1, f2) = if practice_operands.is_empty() {
                let f1 = draw_factor(rng);
                (f1, draw_factor(rng))
            } else {
                let f2 = draw_operand(practice_operands, rng);
                (draw_factor(rng), f2)
            };
            (f1, f2, f1 * f2)
        }
        Operation::Divide => {
            let (quotient, divisor) = if practice_operands.is_empty() {
                let quotient = draw_factor(rng);
                (quotient, draw_factor(rng))
            } else {
                // 0 is selectable but never a divisor
                let divisor = draw_operand(practice_operands, rng).max(1);
                (draw_factor(rng), divisor)
            };
            (quotient * divisor, divisor, quotient)
        }
        Operation::Add => {
            let a = draw_factor(rng);
            let b = draw_factor(rng);
            (a, b, a + b)
        }
        Operation::Subtract => {
            let minuend = draw_factor(rng);
            let subtrahend = 1 + rng.pick_below(minuend);
            (minuend, subtrahend, minuend - subtrahend)
        }
    };

    let wrong = generate_wrong_answers(correct_value, operation, rng)?;

    let mut choices = [correct_value; CHOICE_COUNT];
    choices[1..].copy_from_slice(&wrong);
    shuffle(&mut choices, rng);

    let correct_index = choices
        .iter()
        .position(|&c| c == correct_value)
        .unwrap_or_default();

    let question = Question {
        operation,
        left,
        right,
        text: format!("{} {} {} = ?", left, operation.symbol(), right),
        choices,
        correct_value,
        correct_index,
    };
    trace!("generated {:?} choices={:?}", question.text, question.choices);

    Ok(question)
}

/// Generate from an operation given as text (symbol or alias).
///
/// # Errors
/// Returns `InvalidOperation` if `symbol` names no operation.
pub fn generate_for_symbol<R: RandomSource + ?Sized>(
    symbol: &str,
    practice_operands: &OperandSet,
    rng: &mut R,
) -> Result<Question, QuizError> {
    let operation: Operation = symbol.parse()?;
    generate(operation, practice_operands, rng)
}

/// Synthesize the wrong choices for `correct_value`.
///
/// Each candidate is `correct_value + offset` with the offset drawn from the
/// operation's range. Candidates that are not positive, equal the correct
/// value, or repeat an accepted one are redrawn, at most
/// `MAX_DISTRACTOR_ATTEMPTS` times in total.
pub fn generate_wrong_answers<R: RandomSource + ?Sized>(
    correct_value: u32,
    operation: Operation,
    rng: &mut R,
) -> Result<[u32; WRONG_ANSWER_COUNT], QuizError> {
    let (lo, hi) = operation.distractor_offsets();
    let span = (hi - lo) as u32;

    let mut wrong = [0u32; WRONG_ANSWER_COUNT];
    let mut found = 0;

    for _ in 0..MAX_DISTRACTOR_ATTEMPTS {
        let offset = lo + i64::from(rng.pick_below(span));
        let Ok(candidate) = u32::try_from(i64::from(correct_value) + offset) else {
            continue;
        };
        if candidate == 0 || candidate == correct_value || wrong[..found].contains(&candidate) {
            continue;
        }

        wrong[found] = candidate;
        found += 1;
        if found == WRONG_ANSWER_COUNT {
            return Ok(wrong);
        }
    }

    Err(QuizError::DistractorsExhausted {
        correct_value,
        attempts: MAX_DISTRACTOR_ATTEMPTS,
    })
}

/// Fisher-Yates shuffle: for i from the last index down to 1, swap with a
/// uniform index in `0..=i`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.pick_below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}

// ============================================================================
// INTERNAL
// ============================================================================

fn draw_factor<R: RandomSource + ?Sized>(rng: &mut R) -> u32 {
    1 + rng.pick_below(FACTOR_MAX)
}

fn draw_operand<R: RandomSource + ?Sized>(operands: &OperandSet, rng: &mut R) -> u32 {
    let pool = operands.to_vec();
    let index = rng.pick_below(pool.len() as u32) as usize;
    u32::from(pool[index])
}

// ============================================================================
// TEST SUPPORT
// ============================================================================

/// Replays a fixed sequence of draws.
#[cfg(test)]
pub(crate) struct ScriptedSource(std::collections::VecDeque<u32>);

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(values: &[u32]) -> Self {
        ScriptedSource(values.iter().copied().collect())
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn pick_below(&mut self, bound: u32) -> u32 {
        let value = self.0.pop_front().expect("scripted source exhausted");
        assert!(value < bound, "scripted draw {} not below {}", value, bound);
        value
    }
}

// ============================================================================
// TESTS
// ============================================================================
