use tracing::debug;

use crate::models::{AnswerRecord, QuestionBank, ScoreMap};

/// Reduces an answer sequence to per-label totals.
///
/// Answers are processed in order. An answer naming a question or option the
/// bank does not define contributes nothing. Zero weights never register a
/// label, so every entry in the result has a positive score.
pub fn score(bank: &QuestionBank, answers: &[AnswerRecord]) -> ScoreMap {
    let mut scores = ScoreMap::new();

    for answer in answers {
        let Some(option) = bank
            .question(&answer.question_id)
            .and_then(|question| question.option(&answer.option_id))
        else {
            debug!(
                bank = %bank.name,
                question = %answer.question_id,
                option = %answer.option_id,
                "answer not found in bank, contributes zero"
            );
            continue;
        };

        for (label, weight) in option.weights.iter() {
            if *weight > 0 {
                scores.add(label, *weight);
            }
        }
    }

    scores
}
