//! friendly-numbers: multiple-choice arithmetic drills.
//!
//! The core is [`generator`] (question synthesis) and [`session`] (the quiz
//! state machine). [`tui`] and [`report`] are front ends over it.

pub mod error;
pub mod generator;
pub mod report;
pub mod session;
pub mod tui;
pub mod types;
