//! Drill reports: batches of questions printed outside the TUI.
//!
//! `build_drill` generates; `format_drill` is a pure (DrillReport,
//! OutputFormat) -> String function with no I/O.

use crate::error::QuizError;
use crate::generator::{generate, RandomSource};
use crate::types::{DrillConfig, DrillReport, OutputFormat, Question};

/// Generate `config.count` questions.
///
/// Operands are only applied to × and ÷, same as in the interactive quiz.
pub fn build_drill<R: RandomSource + ?Sized>(
    config: &DrillConfig,
    rng: &mut R,
) -> Result<DrillReport, QuizError> {
    let operands = if config.operation.uses_operands() {
        config.operands.clone()
    } else {
        Default::default()
    };

    let questions = (0..config.count)
        .map(|_| generate(config.operation, &operands, rng))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DrillReport {
        operation: config.operation,
        operands,
        questions,
    })
}

/// Format a drill report for output.
pub fn format_drill(report: &DrillReport, format: OutputFormat, show_answers: bool) -> String {
    match format {
        OutputFormat::Human => format_human(report, show_answers),
        OutputFormat::Json => format_json(report),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(report: &DrillReport, show_answers: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} Drill ===\n", report.operation.name()));
    let width = report.questions.len().to_string().len();
    for (i, question) in report.questions.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}. {:<14}{}\n",
            i + 1,
            question.text,
            format_choices(question, show_answers),
            width = width
        ));
    }
    out.push('\n');

    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Questions: {}\n", report.questions.len()));
    if !report.operands.is_empty() {
        out.push_str(&format!("Operands:  {}\n", report.operands));
    }

    out
}

/// "11   30   21", or "11   30  [21]" with answers shown.
fn format_choices(question: &Question, show_answers: bool) -> String {
    question
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            if show_answers && i == question.correct_index {
                format!("[{:>3}]", choice)
            } else {
                format!(" {:>3} ", choice)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn format_json(report: &DrillReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        // Only plain integers and strings: cannot fail
        panic!("Failed to serialize drill to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OperandSet, Operation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_question() -> Question {
        Question {
            operation: Operation::Multiply,
            left: 3,
            right: 7,
            text: "3 × 7 = ?".into(),
            choices: [11, 30, 21],
            correct_value: 21,
            correct_index: 2,
        }
    }

    fn sample_report() -> DrillReport {
        DrillReport {
            operation: Operation::Multiply,
            operands: OperandSet::from_operands([5, 7]).unwrap(),
            questions: vec![sample_question()],
        }
    }

    #[test]
    fn build_drill_generates_count_questions() {
        let config = DrillConfig {
            operation: Operation::Multiply,
            operands: OperandSet::from_operands([6]).unwrap(),
            count: 25,
            ..Default::default()
        };
        let report = build_drill(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(report.questions.len(), 25);
        assert!(report.questions.iter().all(|q| q.right == 6));
    }

    #[test]
    fn build_drill_drops_operands_for_addition() {
        let config = DrillConfig {
            operation: Operation::Add,
            operands: OperandSet::from_operands([0]).unwrap(),
            count: 5,
            ..Default::default()
        };
        let report = build_drill(&config, &mut StdRng::seed_from_u64(4)).unwrap();
        assert!(report.operands.is_empty());
        assert!(report.questions.iter().all(|q| q.operation == Operation::Add));
    }

    #[test]
    fn build_drill_is_reproducible_with_seed() {
        let config = DrillConfig::default();
        let a = build_drill(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = build_drill(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn human_format_lists_questions() {
        let output = format_drill(&sample_report(), OutputFormat::Human, false);
        assert!(output.contains("=== Multiplication Drill ==="));
        assert!(output.contains("1. 3 × 7 = ?"));
        assert!(output.contains("Questions: 1"));
        assert!(output.contains("Operands:  5, 7"));
        assert!(!output.contains('['));
    }

    #[test]
    fn human_format_marks_answer_when_asked() {
        let output = format_drill(&sample_report(), OutputFormat::Human, true);
        assert!(output.contains("[ 21]"));
    }

    #[test]
    fn human_format_omits_empty_operands() {
        let mut report = sample_report();
        report.operands = OperandSet::new();
        let output = format_drill(&report, OutputFormat::Human, false);
        assert!(!output.contains("Operands"));
    }

    #[test]
    fn json_format_is_valid() {
        let output = format_drill(&sample_report(), OutputFormat::Json, false);
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["operation"], "multiply");
        assert_eq!(parsed["operands"], serde_json::json!([5, 7]));
        assert_eq!(parsed["questions"][0]["text"], "3 × 7 = ?");
        assert_eq!(parsed["questions"][0]["correct_index"], 2);
    }
}
