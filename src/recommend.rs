use crate::models::{Recommendation, ScoreMap};

/// Labels ordered by descending score. The sort is stable, so equal scores
/// keep the score map's first-seen order.
pub fn ranked(scores: &ScoreMap) -> Vec<(String, u64)> {
    let mut values: Vec<(String, u64)> = scores
        .iter()
        .map(|(label, score)| (label.to_string(), score))
        .collect();
    values.sort_by(|a, b| b.1.cmp(&a.1));
    values
}

pub fn recommend(scores: &ScoreMap) -> Recommendation {
    let mut top = ranked(scores).into_iter().map(|(label, _)| label);

    Recommendation {
        major: top.next(),
        minor: top.next(),
        backup: top.next(),
    }
}
