use thiserror::Error;

use crate::session::QuizPhase;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("failed to read question banks from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question bank definition: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid question bank '{bank}': {reason}")]
    Invalid { bank: String, reason: String },

    #[error("unknown question bank '{0}'")]
    UnknownBank(String),
}

impl BankError {
    pub(crate) fn invalid(bank: &str, reason: impl Into<String>) -> Self {
        BankError::Invalid {
            bank: bank.to_string(),
            reason: reason.into(),
        }
    }
}

/// Rejected session events. The session is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("answer for question '{got}' does not match current question '{expected}'")]
    StaleAnswer { expected: String, got: String },

    #[error("session is not accepting answers in phase {0:?}")]
    NotAcceptingAnswers(QuizPhase),
}

impl SessionError {
    pub fn is_stale(&self) -> bool {
        matches!(self, SessionError::StaleAnswer { .. })
    }
}
