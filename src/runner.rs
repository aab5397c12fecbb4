use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;

use crate::models::{AnswerRecord, QuizResult, Recommendation};
use crate::session::{QuizPhase, QuizSession};

/// Answers for one full run: the main bank in order, then the
/// specialization bank chosen by the main result.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSheet {
    pub main: Vec<AnswerRecord>,
    #[serde(default)]
    pub specialization: Vec<AnswerRecord>,
}

impl AnswerSheet {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer sheet {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed answer sheet {}", path.display()))
    }
}

pub fn replay(session: &mut QuizSession<'_>, sheet: &AnswerSheet) -> anyhow::Result<QuizResult> {
    session.reset();
    submit_all(session, &sheet.main, |session| session.stream_result().is_some())?;
    if session.stream_result().is_none() {
        let (answered, total) = session.progress();
        bail!("answer sheet stops at main question {} of {}", answered + 1, total);
    }

    if session.is_complete() {
        if !sheet.specialization.is_empty() {
            warn!(
                count = sheet.specialization.len(),
                "no specialization bank for this stream, ignoring specialization answers"
            );
        }
    } else {
        submit_all(session, &sheet.specialization, |session| session.is_complete())?;
    }

    session
        .result()
        .with_context(|| {
            let (answered, total) = session.progress();
            format!("answer sheet stops at specialization question {} of {}", answered + 1, total)
        })
}

fn submit_all(
    session: &mut QuizSession<'_>,
    answers: &[AnswerRecord],
    part_done: impl Fn(&QuizSession<'_>) -> bool,
) -> anyhow::Result<()> {
    for (position, answer) in answers.iter().enumerate() {
        if part_done(&*session) {
            bail!("answer sheet has more answers than questions");
        }
        match session.submit_answer(&answer.question_id, &answer.option_id) {
            Ok(_) => {}
            Err(error) if error.is_stale() => {
                bail!("answer sheet is out of order at entry {}: {error}", position + 1)
            }
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Runs the quiz over a line-oriented terminal. Options are chosen by number,
/// `b` steps back and `q` quits. Returns `None` when the student quits or the
/// input ends before the quiz is complete.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut QuizSession<'_>,
    mut input: R,
    mut out: W,
) -> anyhow::Result<Option<QuizResult>> {
    session.start();

    loop {
        match session.phase() {
            QuizPhase::NotStarted => session.start(),
            QuizPhase::MainComplete => bail!("session stopped between the main and specialization quiz"),
            QuizPhase::Complete => return Ok(session.result()),
            QuizPhase::InMainQuiz(_) | QuizPhase::InSubQuiz(_) => {
                let Some(question) = session.current_question() else {
                    bail!("session has no current question in phase {:?}", session.phase());
                };
                let (answered, total) = session.progress();

                writeln!(out)?;
                writeln!(out, "[{}/{}] {}", answered + 1, total, question.prompt)?;
                for (number, option) in question.options.iter().enumerate() {
                    writeln!(out, "  {}. {}", number + 1, option.label)?;
                }
                write!(out, "> ")?;
                out.flush()?;

                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Ok(None);
                }

                match line.trim() {
                    "q" | "quit" => return Ok(None),
                    "b" | "back" => {
                        if !session.go_back() {
                            writeln!(out, "Already at the first question of this part.")?;
                        }
                    }
                    choice => match choice.parse::<usize>() {
                        Ok(number) if (1..=question.options.len()).contains(&number) => {
                            let option = &question.options[number - 1];
                            let before = session.phase();
                            let after = session.submit_answer(&question.id, &option.id)?;
                            if matches!(before, QuizPhase::InMainQuiz(_))
                                && !matches!(after, QuizPhase::InMainQuiz(_))
                            {
                                if let Some(stream) = session.stream_result() {
                                    write_stream(&mut out, stream)?;
                                }
                                if after == QuizPhase::Complete {
                                    writeln!(out, "No specialization quiz is available for this stream.")?;
                                } else {
                                    writeln!(out, "A few more questions to narrow it down.")?;
                                }
                            }
                        }
                        _ => {
                            writeln!(
                                out,
                                "Please enter a number between 1 and {}, b to go back, or q to quit.",
                                question.options.len()
                            )?;
                        }
                    },
                }
            }
        }
    }
}

fn write_stream<W: Write>(out: &mut W, stream: &Recommendation) -> std::io::Result<()> {
    writeln!(out)?;
    match stream.major.as_deref() {
        Some(major) => writeln!(out, "Your strongest stream: {major}")?,
        None => writeln!(out, "No strong matches from the quiz.")?,
    }
    if let Some(minor) = stream.minor.as_deref() {
        writeln!(out, "Also worth exploring: {minor}")?;
    }
    if let Some(backup) = stream.backup.as_deref() {
        writeln!(out, "Backup option: {backup}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::BankCatalog;

    const CATALOG: &str = r#"{
        "main": {"questions": [
            {"id": "q1", "prompt": "Computers?", "options": [
                {"id": "yes", "label": "Yes", "weights": {"Engineer": 2}},
                {"id": "no", "label": "No", "weights": {"Athlete": 2}}
            ]},
            {"id": "q2", "prompt": "Patients?", "options": [
                {"id": "yes", "label": "Yes", "weights": {"Doctor": 1}},
                {"id": "no", "label": "No"}
            ]}
        ]},
        "sub": {
            "Engineer": {"questions": [
                {"id": "e1", "prompt": "Which stream?", "options": [
                    {"id": "civil", "label": "Civil", "weights": {"Civil Engineer": 1}},
                    {"id": "ece", "label": "Electrical", "weights": {"ECE Engineer": 1}}
                ]}
            ]}
        }
    }"#;

    fn sheet(main: &[(&str, &str)], specialization: &[(&str, &str)]) -> AnswerSheet {
        let records = |pairs: &[(&str, &str)]| -> Vec<AnswerRecord> {
            pairs
                .iter()
                .map(|(question, option)| AnswerRecord::new(*question, *option))
                .collect()
        };
        AnswerSheet {
            main: records(main),
            specialization: records(specialization),
        }
    }

    #[test]
    fn replays_full_sheet() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let result = replay(
            &mut session,
            &sheet(&[("q1", "yes"), ("q2", "yes")], &[("e1", "ece")]),
        )
        .unwrap();
        assert_eq!(result.stream.major.as_deref(), Some("Engineer"));
        assert_eq!(result.stream.minor.as_deref(), Some("Doctor"));
        assert_eq!(result.specialization.major.as_deref(), Some("ECE Engineer"));
    }

    #[test]
    fn replay_skips_missing_specialization() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let result = replay(
            &mut session,
            &sheet(&[("q1", "no"), ("q2", "no")], &[("e1", "civil")]),
        )
        .unwrap();
        assert_eq!(result.stream.major.as_deref(), Some("Athlete"));
        assert!(result.specialization.is_empty());
    }

    #[test]
    fn replay_rejects_short_sheet() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let error = replay(&mut session, &sheet(&[("q1", "yes")], &[])).unwrap_err();
        assert!(error.to_string().contains("main question 2 of 2"));

        let error = replay(&mut session, &sheet(&[("q1", "yes"), ("q2", "no")], &[])).unwrap_err();
        assert!(error.to_string().contains("specialization question 1 of 1"));
    }

    #[test]
    fn replay_rejects_extra_answers() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let error = replay(
            &mut session,
            &sheet(&[("q1", "yes"), ("q2", "no"), ("q3", "yes")], &[]),
        )
        .unwrap_err();
        assert!(error.to_string().contains("more answers than questions"));
    }

    #[test]
    fn replay_rejects_out_of_order_sheet() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let error = replay(&mut session, &sheet(&[("q2", "yes"), ("q1", "yes")], &[])).unwrap_err();
        assert!(error.to_string().contains("out of order at entry 1"));
        assert_eq!(session.phase(), QuizPhase::InMainQuiz(0));
    }

    #[test]
    fn interactive_run_with_back_and_bad_input() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);
        let input = "2\nb\n1\nseven\n1\n2\n";
        let mut out = Vec::new();

        let result = run_interactive(&mut session, input.as_bytes(), &mut out)
            .unwrap()
            .unwrap();
        let transcript = String::from_utf8(out).unwrap();

        assert_eq!(result.stream.major.as_deref(), Some("Engineer"));
        assert_eq!(result.stream.minor.as_deref(), Some("Doctor"));
        assert_eq!(result.specialization.major.as_deref(), Some("ECE Engineer"));
        assert!(transcript.contains("[1/2] Computers?"));
        assert!(transcript.contains("Please enter a number between 1 and 2"));
        assert!(transcript.contains("Your strongest stream: Engineer"));
        assert!(transcript.contains("[1/1] Which stream?"));
    }

    #[test]
    fn interactive_quit_returns_none() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);

        let result = run_interactive(&mut session, "1\nq\n".as_bytes(), Vec::new()).unwrap();
        assert!(result.is_none());

        session.reset();
        let result = run_interactive(&mut session, "".as_bytes(), Vec::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn interactive_without_specialization() {
        let catalog = BankCatalog::from_json(CATALOG).unwrap();
        let mut session = QuizSession::new(&catalog);
        let mut out = Vec::new();

        let result = run_interactive(&mut session, "2\n2\n".as_bytes(), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(result.stream.major.as_deref(), Some("Athlete"));
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("No specialization quiz is available for this stream."));
    }
}
