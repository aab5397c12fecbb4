pub mod bank;
pub mod colleges;
pub mod config;
pub mod db;
pub mod error;
pub mod matcher;
pub mod models;
pub mod recommend;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod session;

pub use bank::BankCatalog;
pub use error::{BankError, SessionError};
pub use models::{AnswerRecord, CollegeRecord, QuizResult, Recommendation, ScoreMap};
pub use session::{QuizPhase, QuizSession};
