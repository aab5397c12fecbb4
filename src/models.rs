use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One selectable answer. Weights keep their declared order so that labels
/// introduced by the same option rank in the order they were listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub weights: IndexMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub name: String,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == question_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub option_id: String,
}

impl AnswerRecord {
    pub fn new(question_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            option_id: option_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMap {
    scores: IndexMap<String, u64>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str, weight: u32) {
        let entry = self.scores.entry(label.to_string()).or_insert(0);
        *entry += u64::from(weight);
    }

    pub fn get(&self, label: &str) -> u64 {
        self.scores.get(label).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.scores.iter().map(|(label, score)| (label.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Top three labels of one quiz pass. `None` marks an unfilled slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub major: Option<String>,
    pub minor: Option<String>,
    pub backup: Option<String>,
}

impl Recommendation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.major.is_none()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        [&self.major, &self.minor, &self.backup]
            .into_iter()
            .filter_map(|slot| slot.as_deref())
    }
}

/// Everything a finished session produces. Only the two triples are
/// persisted; the score maps are kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub stream: Recommendation,
    pub specialization: Recommendation,
    pub stream_scores: ScoreMap,
    pub specialization_scores: ScoreMap,
}

impl QuizResult {
    /// Most specific label available: the specialization major when the
    /// second stage produced one, otherwise the stream major.
    pub fn final_label(&self) -> Option<&str> {
        self.specialization
            .major
            .as_deref()
            .or(self.stream.major.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeRecord {
    #[serde(rename = "College")]
    pub college: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "Course", default)]
    pub course: String,
    #[serde(rename = "Future_Scope", default)]
    pub future_scope: String,
    #[serde(rename = "Study_Materials", default)]
    pub study_materials: String,
    #[serde(rename = "Exam_Info", default)]
    pub exam_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub degrees: Vec<String>,
    #[serde(default)]
    pub future_scope: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StoredRecommendation {
    pub email: String,
    pub stream: Recommendation,
    pub specialization: Recommendation,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}
