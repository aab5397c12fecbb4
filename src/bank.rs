use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::BankError;
use crate::models::{QuestionBank, Roadmap};

pub const MAIN_BANK: &str = "main";

const DEFAULT_CATALOG: &str = include_str!("../data/question_banks.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    main: QuestionBank,
    #[serde(default)]
    sub: IndexMap<String, QuestionBank>,
    #[serde(default)]
    synonyms: IndexMap<String, String>,
    #[serde(default)]
    roadmaps: IndexMap<String, Roadmap>,
}

#[derive(Debug, Clone)]
pub struct BankCatalog {
    main: QuestionBank,
    sub: IndexMap<String, QuestionBank>,
    synonyms: IndexMap<String, String>,
    roadmaps: IndexMap<String, Roadmap>,
}

impl BankCatalog {
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, BankError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            sub_banks = catalog.sub.len(),
            "loaded question banks"
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let file: CatalogFile = serde_json::from_str(raw)?;

        let mut main = file.main;
        main.name = MAIN_BANK.to_string();
        validate_bank(&main)?;
        if main.is_empty() {
            return Err(BankError::invalid(MAIN_BANK, "bank has no questions"));
        }

        let mut sub = IndexMap::new();
        for (label, mut bank) in file.sub {
            if label.trim().is_empty() {
                return Err(BankError::invalid(MAIN_BANK, "sub-bank keyed by a blank label"));
            }
            bank.name = label.clone();
            validate_bank(&bank)?;
            sub.insert(label, bank);
        }

        for (key, target) in file.synonyms.iter() {
            if key.trim().is_empty() || target.trim().is_empty() {
                return Err(BankError::invalid(
                    "synonyms",
                    format!("blank synonym entry '{key}' -> '{target}'"),
                ));
            }
        }

        Ok(Self {
            main,
            sub,
            synonyms: file.synonyms,
            roadmaps: file.roadmaps,
        })
    }

    /// Looks up a bank by name. `"main"` is the stream-level bank, any other
    /// name must be a declared sub-bank.
    pub fn load(&self, bank_name: &str) -> Result<&QuestionBank, BankError> {
        if bank_name == MAIN_BANK {
            return Ok(&self.main);
        }
        self.sub
            .get(bank_name)
            .ok_or_else(|| BankError::UnknownBank(bank_name.to_string()))
    }

    pub fn main(&self) -> &QuestionBank {
        &self.main
    }

    /// Specialization bank for a major. `None` means no specialization is
    /// available, which includes a declared but empty sub-bank.
    pub fn sub_bank(&self, major: &str) -> Option<&QuestionBank> {
        self.sub.get(major).filter(|bank| !bank.is_empty())
    }

    pub fn sub_bank_names(&self) -> impl Iterator<Item = &str> {
        self.sub.keys().map(String::as_str)
    }

    pub fn synonyms(&self) -> &IndexMap<String, String> {
        &self.synonyms
    }

    pub fn roadmap(&self, label: &str) -> Option<&Roadmap> {
        self.roadmaps.get(label)
    }
}

fn validate_bank(bank: &QuestionBank) -> Result<(), BankError> {
    let mut question_ids = HashSet::new();

    for question in bank.questions.iter() {
        if question.id.trim().is_empty() {
            return Err(BankError::invalid(&bank.name, "question with a blank id"));
        }
        if !question_ids.insert(question.id.as_str()) {
            return Err(BankError::invalid(
                &bank.name,
                format!("duplicate question id '{}'", question.id),
            ));
        }
        if question.options.is_empty() {
            return Err(BankError::invalid(
                &bank.name,
                format!("question '{}' has no options", question.id),
            ));
        }

        let mut option_ids = HashSet::new();
        for option in question.options.iter() {
            if option.id.trim().is_empty() {
                return Err(BankError::invalid(
                    &bank.name,
                    format!("question '{}' has an option with a blank id", question.id),
                ));
            }
            if !option_ids.insert(option.id.as_str()) {
                return Err(BankError::invalid(
                    &bank.name,
                    format!(
                        "duplicate option id '{}' in question '{}'",
                        option.id, question.id
                    ),
                ));
            }
            if option.weights.keys().any(|label| label.trim().is_empty()) {
                return Err(BankError::invalid(
                    &bank.name,
                    format!(
                        "option '{}' of question '{}' weights a blank label",
                        option.id, question.id
                    ),
                ));
            }
            if !option.weights.values().any(|weight| *weight > 0) {
                debug!(
                    bank = %bank.name,
                    question = %question.id,
                    option = %option.id,
                    "option carries no positive weight"
                );
            }
        }
    }

    Ok(())
}
