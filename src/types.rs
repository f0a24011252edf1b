//! Domain types for friendly-numbers.
//!
//! Value objects only: operations, questions, operand sets, and the
//! configuration structs the CLI fills in.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Largest operand a learner can select (operands are 0..=9).
pub const OPERAND_MAX: u8 = 9;

/// Operands drawn without a practice set come from 1..=FACTOR_MAX.
pub const FACTOR_MAX: u32 = 9;

/// Answer buttons shown per question.
pub const CHOICE_COUNT: usize = 3;

/// Distractors generated alongside the correct answer.
pub const WRONG_ANSWER_COUNT: usize = CHOICE_COUNT - 1;

/// Upper bound on distractor draws before giving up.
pub const MAX_DISTRACTOR_ATTEMPTS: usize = 100;

/// Delay before a correct answer moves on by itself.
pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 500;

// ============================================================================
// OPERATION
// ============================================================================

/// The four drill operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Multiply,
        Operation::Divide,
        Operation::Add,
        Operation::Subtract,
    ];

    /// Glyph used in question text.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Add => "+",
            Operation::Subtract => "-",
        }
    }

    /// Human name, used in titles.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Multiply => "Multiplication",
            Operation::Divide => "Division",
            Operation::Add => "Addition",
            Operation::Subtract => "Subtraction",
        }
    }

    /// Whether practice can be restricted to chosen operands.
    ///
    /// True for Multiply and Divide; Add and Subtract go straight to the quiz.
    pub fn uses_operands(self) -> bool {
        matches!(self, Operation::Multiply | Operation::Divide)
    }

    /// Half-open offset range `[lo, hi)` for distractor synthesis.
    pub fn distractor_offsets(self) -> (i64, i64) {
        match self {
            Operation::Add | Operation::Multiply => (-10, 10),
            Operation::Divide | Operation::Subtract => (-5, 5),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operation {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "×" | "x" | "*" | "mul" | "multiply" | "times" => Ok(Operation::Multiply),
            "÷" | "/" | "div" | "divide" => Ok(Operation::Divide),
            "+" | "add" | "plus" => Ok(Operation::Add),
            "-" | "−" | "sub" | "minus" | "subtract" => Ok(Operation::Subtract),
            _ => Err(QuizError::InvalidOperation(s.to_string())),
        }
    }
}

// ============================================================================
// QUESTION
// ============================================================================

/// One multiple-choice question.
///
/// `choices[correct_index] == correct_value`, the choices are pairwise
/// distinct and every wrong choice is positive. Never mutated after the
/// generator builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub operation: Operation,
    /// Left operand as displayed (factor, dividend, addend or minuend).
    pub left: u32,
    /// Right operand as displayed (factor, divisor, addend or subtrahend).
    pub right: u32,
    pub text: String,
    pub choices: [u32; CHOICE_COUNT],
    pub correct_value: u32,
    pub correct_index: usize,
}

impl Question {
    /// Value of the choice at `index`, if it exists.
    pub fn choice(&self, index: usize) -> Option<u32> {
        self.choices.get(index).copied()
    }

    /// Whether picking `index` answers the question correctly.
    pub fn is_correct(&self, index: usize) -> bool {
        self.choice(index) == Some(self.correct_value)
    }
}

/// What the learner is told after answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_value: u32 },
}

impl Feedback {
    pub fn is_correct(self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

/// A batch of questions generated for the `drill` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillReport {
    pub operation: Operation,
    /// Practice operands used (empty = unrestricted).
    pub operands: OperandSet,
    pub questions: Vec<Question>,
}

// ============================================================================
// OPERAND SET
// ============================================================================

/// Operands (0-9) the learner restricted practice to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OperandSet(BTreeSet<u8>);

impl OperandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting anything outside 0-9.
    pub fn from_operands<I: IntoIterator<Item = u8>>(operands: I) -> Result<Self, QuizError> {
        let mut set = OperandSet::new();
        for n in operands {
            check_operand(n)?;
            set.0.insert(n);
        }
        Ok(set)
    }

    /// Add `n` if absent, remove it if present. Returns whether `n` is now selected.
    pub fn toggle(&mut self, n: u8) -> Result<bool, QuizError> {
        check_operand(n)?;
        if self.0.remove(&n) {
            Ok(false)
        } else {
            self.0.insert(n);
            Ok(true)
        }
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.contains(&n)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl fmt::Display for OperandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|n| n.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}

fn check_operand(n: u8) -> Result<(), QuizError> {
    if n > OPERAND_MAX {
        Err(QuizError::InvalidOperand(n))
    } else {
        Ok(())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for drill reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable numbered list.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

/// Configuration for an interactive session.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Delay before a correct answer advances on its own. None = manual only.
    pub auto_advance: Option<Duration>,
    /// Seed for a reproducible session (None = OS entropy).
    pub seed: Option<u64>,
    /// Operation to select before the first frame.
    pub operation: Option<Operation>,
    /// Operands to practice with; starts practice immediately for ×/÷.
    pub operands: OperandSet,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            auto_advance: Some(Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS)),
            seed: None,
            operation: None,
            operands: OperandSet::new(),
        }
    }
}

/// Configuration for a non-interactive drill printout.
#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub operation: Operation,
    pub operands: OperandSet,
    /// Number of questions to generate.
    pub count: usize,
    pub seed: Option<u64>,
    /// Mark the correct choice in human output.
    pub show_answers: bool,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            operation: Operation::Multiply,
            operands: OperandSet::new(),
            count: 10,
            seed: None,
            show_answers: false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_parses_symbols_and_aliases() {
        assert_eq!("×".parse::<Operation>(), Ok(Operation::Multiply));
        assert_eq!("x".parse::<Operation>(), Ok(Operation::Multiply));
        assert_eq!("÷".parse::<Operation>(), Ok(Operation::Divide));
        assert_eq!("/".parse::<Operation>(), Ok(Operation::Divide));
        assert_eq!(" Plus ".parse::<Operation>(), Ok(Operation::Add));
        assert_eq!("-".parse::<Operation>(), Ok(Operation::Subtract));
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert_eq!(
            "%".parse::<Operation>(),
            Err(QuizError::InvalidOperation("%".into()))
        );
    }

    #[test]
    fn only_multiply_and_divide_use_operands() {
        assert!(Operation::Multiply.uses_operands());
        assert!(Operation::Divide.uses_operands());
        assert!(!Operation::Add.uses_operands());
        assert!(!Operation::Subtract.uses_operands());
    }

    #[test]
    fn toggle_twice_restores_set() {
        let mut set = OperandSet::from_operands([2, 4]).unwrap();
        let before = set.clone();
        assert_eq!(set.toggle(7), Ok(true));
        assert_eq!(set.toggle(7), Ok(false));
        assert_eq!(set, before);
    }

    #[test]
    fn toggle_out_of_range_is_rejected() {
        let mut set = OperandSet::new();
        assert_eq!(set.toggle(10), Err(QuizError::InvalidOperand(10)));
        assert!(set.is_empty());
    }

    #[test]
    fn operand_set_iterates_in_order() {
        let set = OperandSet::from_operands([7, 0, 5]).unwrap();
        assert_eq!(set.to_vec(), vec![0, 5, 7]);
        assert_eq!(set.to_string(), "0, 5, 7");
    }

    #[test]
    fn operand_set_serializes_as_list() {
        let set = OperandSet::from_operands([5, 7]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[5,7]");
    }

    #[test]
    fn play_config_defaults_to_auto_advance() {
        let config = PlayConfig::default();
        assert_eq!(config.auto_advance, Some(Duration::from_millis(500)));
        assert!(config.operands.is_empty());
    }
}
