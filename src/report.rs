use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{CollegeRecord, QuizResult, Recommendation, Roadmap, ScoreMap};
use crate::recommend;

pub fn build_report(
    student: Option<&str>,
    generated_at: DateTime<Utc>,
    result: &QuizResult,
    roadmap: Option<&Roadmap>,
    colleges: &[&CollegeRecord],
) -> String {
    let mut output = String::new();
    let student_label = student.unwrap_or("anonymous student");

    let _ = writeln!(output, "# Career Compass Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        student_label,
        generated_at.format("%Y-%m-%d")
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Stream Recommendation");
    write_triple(&mut output, &result.stream, "No stream matched your answers.");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Stream Scores");
    write_scores(&mut output, &result.stream_scores);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Specialization");
    write_triple(
        &mut output,
        &result.specialization,
        "No specialization quiz is available for this stream.",
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Roadmap");
    match roadmap {
        Some(roadmap) => {
            if !roadmap.notes.is_empty() {
                let _ = writeln!(output, "{}", roadmap.notes);
            }
            for degree in roadmap.degrees.iter() {
                let _ = writeln!(output, "- Degree: {degree}");
            }
            for scope in roadmap.future_scope.iter() {
                let _ = writeln!(output, "- Future scope: {scope}");
            }
        }
        None => {
            let _ = writeln!(output, "No roadmap available for this career.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Matching Government Colleges");
    if colleges.is_empty() {
        let _ = writeln!(
            output,
            "No matching government colleges found for this career in the dataset."
        );
    } else {
        for college in colleges.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {}",
                college.college, college.location, college.course
            );
        }
    }

    output
}

fn write_triple(output: &mut String, recommendation: &Recommendation, empty: &str) {
    if recommendation.is_empty() {
        let _ = writeln!(output, "{empty}");
        return;
    }

    let slots = [
        ("Major", &recommendation.major),
        ("Minor", &recommendation.minor),
        ("Backup", &recommendation.backup),
    ];
    for (name, slot) in slots {
        let _ = writeln!(output, "- {}: {}", name, slot.as_deref().unwrap_or("none"));
    }
}

fn write_scores(output: &mut String, scores: &ScoreMap) {
    if scores.is_empty() {
        let _ = writeln!(output, "No answers carried any weight.");
        return;
    }

    for (label, score) in recommend::ranked(scores) {
        let _ = writeln!(output, "- {label}: {score}");
    }
}
