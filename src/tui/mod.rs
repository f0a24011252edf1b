//! Terminal front end for the quiz.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Action, Transition, Effect)
//! - `update`: Pure transitions from key actions onto the session
//! - `view`: Pure rendering
//! - `theme`: Style constants
//! - `run`: Effects (terminal, event loop, auto-advance timers)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
