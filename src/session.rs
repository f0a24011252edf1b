//! Quiz session state machine.
//!
//! `SessionState` is the single owned aggregate of a drill session. Every
//! transition checks its precondition first: a rejected transition returns
//! an error and leaves the state exactly as it was, so counters can never
//! be double-counted.
//!
//! ```text
//! Start --select_operation(×/÷)--> OperandSelection --start_practice--> Quiz
//! Start --select_operation(+/-)--> Quiz
//! Quiz --select_answer--> Quiz (answered) --advance--> Quiz
//! Quiz --return_to_operand_context--> OperandSelection | Start
//! any --return_to_start--> Start
//! ```

use log::debug;

use crate::error::QuizError;
use crate::generator::{generate, RandomSource};
use crate::types::{Feedback, Operation, OperandSet, Question, CHOICE_COUNT};

/// Which screen the UI should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Pick an operation.
    #[default]
    Start,
    /// Pick operands to practice (× and ÷ only).
    OperandSelection,
    /// Answer questions.
    Quiz,
}

/// Session aggregate. `score <= total_answered` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    screen: Screen,
    operation: Option<Operation>,
    selected_operands: OperandSet,
    practice_operands: OperandSet,
    current_question: Option<Question>,
    selected_answer: Option<usize>,
    score: u32,
    total_answered: u32,
}

impl SessionState {
    /// Fresh session on the start screen.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    /// Operands toggled on the selection screen.
    pub fn selected_operands(&self) -> &OperandSet {
        &self.selected_operands
    }

    /// Operands frozen when practice started.
    pub fn practice_operands(&self) -> &OperandSet {
        &self.practice_operands
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    pub fn is_answered(&self) -> bool {
        self.selected_answer.is_some()
    }

    /// Feedback for the current question, once answered.
    pub fn feedback(&self) -> Option<Feedback> {
        let question = self.current_question.as_ref()?;
        let index = self.selected_answer?;
        Some(feedback_for(question, index))
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Choose the operation to drill.
    ///
    /// + and - start the quiz immediately with fresh counters. × and ÷ move
    /// to operand selection with an empty selection; score and question are
    /// left alone until practice starts.
    pub fn select_operation<R: RandomSource + ?Sized>(
        &mut self,
        operation: Operation,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        if operation.uses_operands() {
            self.operation = Some(operation);
            self.selected_operands.clear();
            self.screen = Screen::OperandSelection;
        } else {
            let question = generate(operation, &OperandSet::new(), rng)?;
            self.operation = Some(operation);
            self.practice_operands.clear();
            self.begin_quiz(question);
        }
        debug!("selected {:?}, now on {:?}", operation, self.screen);
        Ok(())
    }

    /// Add or remove an operand from the selection.
    pub fn toggle_operand(&mut self, n: u8) -> Result<(), QuizError> {
        if self.screen != Screen::OperandSelection {
            return Err(QuizError::invalid_state(
                "toggle operand",
                "not on the operand selection screen",
            ));
        }
        let selected = self.selected_operands.toggle(n)?;
        debug!("operand {} {}", n, if selected { "on" } else { "off" });
        Ok(())
    }

    /// Freeze the selection and start the quiz.
    pub fn start_practice<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if self.screen != Screen::OperandSelection {
            return Err(QuizError::invalid_state(
                "start practice",
                "not on the operand selection screen",
            ));
        }
        let Some(operation) = self.operation else {
            return Err(QuizError::invalid_state("start practice", "no operation selected"));
        };
        if self.selected_operands.is_empty() {
            return Err(QuizError::invalid_state("start practice", "no operands selected"));
        }

        let question = generate(operation, &self.selected_operands, rng)?;
        self.practice_operands = self.selected_operands.clone();
        self.begin_quiz(question);
        debug!("practice started with [{}]", self.practice_operands);
        Ok(())
    }

    /// Record the learner's answer. Bookkeeping only; never generates.
    ///
    /// A question can be answered once: a second call before `advance`
    /// is rejected and the counters stay put.
    pub fn select_answer(&mut self, index: usize) -> Result<Feedback, QuizError> {
        if self.screen != Screen::Quiz {
            return Err(QuizError::invalid_state("select answer", "not in a quiz"));
        }
        let Some(question) = self.current_question.as_ref() else {
            return Err(QuizError::invalid_state("select answer", "no current question"));
        };
        if self.selected_answer.is_some() {
            return Err(QuizError::invalid_state("select answer", "question already answered"));
        }
        if index >= CHOICE_COUNT {
            return Err(QuizError::AnswerOutOfRange {
                index,
                choices: CHOICE_COUNT,
            });
        }

        let feedback = feedback_for(question, index);
        self.selected_answer = Some(index);
        self.total_answered += 1;
        if feedback.is_correct() {
            self.score += 1;
        }
        debug!("answered {} ({:?}), score {}/{}", index, feedback, self.score, self.total_answered);
        Ok(feedback)
    }

    /// Replace the current question with a fresh one.
    ///
    /// Does not require an answer first: calling it on an unanswered
    /// question just swaps the question.
    pub fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if self.screen != Screen::Quiz {
            return Err(QuizError::invalid_state("advance", "not in a quiz"));
        }
        let Some(operation) = self.operation else {
            return Err(QuizError::invalid_state("advance", "no operation selected"));
        };

        let question = generate(operation, &self.practice_operands, rng)?;
        self.current_question = Some(question);
        self.selected_answer = None;
        Ok(())
    }

    /// Discard the whole session and go back to the start screen.
    pub fn return_to_start(&mut self) {
        *self = SessionState::new();
        debug!("session reset");
    }

    /// Leave the quiz: back to operand selection for × and ÷, back to the
    /// start screen for + and -. Counters are reset either way.
    pub fn return_to_operand_context(&mut self) -> Result<(), QuizError> {
        if self.screen != Screen::Quiz {
            return Err(QuizError::invalid_state(
                "return to operand selection",
                "not in a quiz",
            ));
        }

        match self.operation {
            Some(op) if op.uses_operands() => {
                self.screen = Screen::OperandSelection;
                self.selected_operands.clear();
                self.current_question = None;
                self.selected_answer = None;
                self.score = 0;
                self.total_answered = 0;
                debug!("back to operand selection for {:?}", op);
            }
            _ => self.return_to_start(),
        }
        Ok(())
    }

    fn begin_quiz(&mut self, question: Question) {
        self.current_question = Some(question);
        self.selected_answer = None;
        self.score = 0;
        self.total_answered = 0;
        self.screen = Screen::Quiz;
    }
}

fn feedback_for(question: &Question, index: usize) -> Feedback {
    if question.is_correct(index) {
        Feedback::Correct
    } else {
        Feedback::Incorrect {
            correct_value: question.correct_value,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
