use tracing::{debug, info, warn};

use crate::bank::BankCatalog;
use crate::error::SessionError;
use crate::models::{AnswerRecord, Question, QuestionBank, QuizResult, Recommendation, ScoreMap};
use crate::recommend::recommend;
use crate::scoring::score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NotStarted,
    InMainQuiz(usize),
    MainComplete,
    InSubQuiz(usize),
    Complete,
}

#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    catalog: &'a BankCatalog,
    phase: QuizPhase,
    main_answers: Vec<AnswerRecord>,
    sub_answers: Vec<AnswerRecord>,
    sub_bank: Option<&'a QuestionBank>,
    stream_scores: ScoreMap,
    stream: Option<Recommendation>,
    specialization_scores: ScoreMap,
    specialization: Option<Recommendation>,
}

impl<'a> QuizSession<'a> {
    pub fn new(catalog: &'a BankCatalog) -> Self {
        Self {
            catalog,
            phase: QuizPhase::NotStarted,
            main_answers: Vec::new(),
            sub_answers: Vec::new(),
            sub_bank: None,
            stream_scores: ScoreMap::new(),
            stream: None,
            specialization_scores: ScoreMap::new(),
            specialization: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Moves a fresh session onto the first main question. Has no effect in
    /// any other phase.
    pub fn start(&mut self) {
        if self.phase == QuizPhase::NotStarted {
            self.phase = QuizPhase::InMainQuiz(0);
            debug!("quiz started");
        }
        self.check_invariant();
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        match self.phase {
            QuizPhase::InMainQuiz(index) => self.catalog.main().questions.get(index),
            QuizPhase::InSubQuiz(index) => self
                .sub_bank
                .and_then(|bank| bank.questions.get(index)),
            _ => None,
        }
    }

    /// Records the answer to the current question and advances.
    ///
    /// The option id is not checked: an option the question does not define
    /// is kept and scores zero. A question id that is not the current
    /// question is rejected as stale and nothing changes.
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<QuizPhase, SessionError> {
        if self.phase == QuizPhase::NotStarted {
            self.start();
        }

        let Some(question) = self.current_question() else {
            return Err(SessionError::NotAcceptingAnswers(self.phase));
        };

        if question.id != question_id {
            warn!(
                expected = %question.id,
                got = %question_id,
                "ignoring stale answer"
            );
            return Err(SessionError::StaleAnswer {
                expected: question.id.clone(),
                got: question_id.to_string(),
            });
        }

        let answer = AnswerRecord::new(question_id, option_id);
        let phase = self.phase;
        self.phase = match phase {
            QuizPhase::InMainQuiz(index) => {
                self.main_answers.push(answer);
                if index + 1 < self.catalog.main().len() {
                    QuizPhase::InMainQuiz(index + 1)
                } else {
                    self.finish_main();
                    self.phase = QuizPhase::MainComplete;
                    self.enter_specialization()
                }
            }
            QuizPhase::InSubQuiz(index) => {
                self.sub_answers.push(answer);
                let total = self.sub_bank.map(QuestionBank::len).unwrap_or(0);
                if index + 1 < total {
                    QuizPhase::InSubQuiz(index + 1)
                } else {
                    self.finish_sub();
                    QuizPhase::Complete
                }
            }
            phase => return Err(SessionError::NotAcceptingAnswers(phase)),
        };

        debug!(phase = ?self.phase, "answer recorded");
        self.check_invariant();
        Ok(self.phase)
    }

    /// Steps back one question within the active pass, discarding the answer
    /// given to it. Returns whether the session moved.
    pub fn go_back(&mut self) -> bool {
        let moved = match self.phase {
            QuizPhase::InMainQuiz(index) if index > 0 => {
                self.main_answers.pop();
                self.phase = QuizPhase::InMainQuiz(index - 1);
                true
            }
            QuizPhase::InSubQuiz(index) if index > 0 => {
                self.sub_answers.pop();
                self.phase = QuizPhase::InSubQuiz(index - 1);
                true
            }
            _ => false,
        };

        self.check_invariant();
        moved
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.catalog);
        debug!("quiz reset");
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    pub fn stream_result(&self) -> Option<&Recommendation> {
        self.stream.as_ref()
    }

    pub fn result(&self) -> Option<QuizResult> {
        if !self.is_complete() {
            return None;
        }
        Some(QuizResult {
            stream: self.stream.clone().unwrap_or_default(),
            specialization: self.specialization.clone().unwrap_or_default(),
            stream_scores: self.stream_scores.clone(),
            specialization_scores: self.specialization_scores.clone(),
        })
    }

    pub fn progress(&self) -> (usize, usize) {
        let main_total = self.catalog.main().len();
        match self.phase {
            QuizPhase::NotStarted => (0, main_total),
            QuizPhase::InMainQuiz(index) => (index, main_total),
            QuizPhase::MainComplete => (main_total, main_total),
            QuizPhase::InSubQuiz(index) => {
                (index, self.sub_bank.map(QuestionBank::len).unwrap_or(0))
            }
            QuizPhase::Complete => {
                let total = self.sub_bank.map(QuestionBank::len).unwrap_or(main_total);
                (total, total)
            }
        }
    }

    fn finish_main(&mut self) {
        self.stream_scores = score(self.catalog.main(), &self.main_answers);
        let stream = recommend(&self.stream_scores);
        info!(
            major = ?stream.major,
            minor = ?stream.minor,
            backup = ?stream.backup,
            "stream recommendation fixed"
        );
        self.stream = Some(stream);
    }

    /// Picks the sub-bank for the fixed major. Without one the session
    /// completes with an empty specialization.
    fn enter_specialization(&mut self) -> QuizPhase {
        debug_assert_eq!(self.phase, QuizPhase::MainComplete);

        let major = self.stream.as_ref().and_then(|stream| stream.major.as_deref());
        self.sub_bank = major.and_then(|major| self.catalog.sub_bank(major));

        match self.sub_bank {
            Some(bank) => {
                debug!(bank = %bank.name, questions = bank.len(), "specialization started");
                QuizPhase::InSubQuiz(0)
            }
            None => {
                info!(major = ?major, "no specialization available");
                self.specialization_scores = ScoreMap::new();
                self.specialization = Some(Recommendation::none());
                QuizPhase::Complete
            }
        }
    }

    fn finish_sub(&mut self) {
        let Some(bank) = self.sub_bank else {
            return;
        };
        self.specialization_scores = score(bank, &self.sub_answers);
        let specialization = recommend(&self.specialization_scores);
        info!(
            bank = %bank.name,
            major = ?specialization.major,
            "specialization recommendation fixed"
        );
        self.specialization = Some(specialization);
    }

    fn check_invariant(&self) {
        match self.phase {
            QuizPhase::NotStarted => {
                debug_assert!(self.main_answers.is_empty() && self.sub_answers.is_empty());
            }
            QuizPhase::InMainQuiz(index) => {
                debug_assert!(index < self.catalog.main().len());
                debug_assert_eq!(self.main_answers.len(), index);
            }
            QuizPhase::MainComplete => {
                debug_assert_eq!(self.main_answers.len(), self.catalog.main().len());
            }
            QuizPhase::InSubQuiz(index) => {
                debug_assert!(self.sub_bank.is_some_and(|bank| index < bank.len()));
                debug_assert_eq!(self.sub_answers.len(), index);
            }
            QuizPhase::Complete => {
                debug_assert!(self.stream.is_some() && self.specialization.is_some());
            }
        }
    }
}
