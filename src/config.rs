use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::bank::BankCatalog;

pub const BANKS_ENV: &str = "CAREER_COMPASS_BANKS";
pub const COLLEGES_ENV: &str = "CAREER_COMPASS_COLLEGES";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_COLLEGES_CSV: &str = "jk_colleges.csv";

/// Runtime configuration. Each setting is taken from the command line first,
/// then the environment (including a `.env` file), then a built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` selects the question banks compiled into the binary.
    pub banks_path: Option<PathBuf>,
    pub colleges_path: PathBuf,
    pub database_url: Option<String>,
    pub rust_log: Option<String>,
}

impl Config {
    pub fn resolve(banks_arg: Option<PathBuf>, colleges_arg: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve_with(banks_arg, colleges_arg, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        banks_arg: Option<PathBuf>,
        colleges_arg: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        Config {
            banks_path: banks_arg.or_else(|| non_empty(BANKS_ENV).map(PathBuf::from)),
            colleges_path: colleges_arg
                .or_else(|| non_empty(COLLEGES_ENV).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COLLEGES_CSV)),
            database_url: non_empty(DATABASE_URL_ENV),
            rust_log: non_empty("RUST_LOG"),
        }
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url.as_deref().with_context(|| {
            format!("{DATABASE_URL_ENV} must be set to store or read recommendations")
        })
    }

    pub fn load_catalog(&self) -> Result<BankCatalog> {
        let catalog = match &self.banks_path {
            Some(path) => BankCatalog::from_path(path)?,
            None => BankCatalog::builtin().context("built-in question banks are invalid")?,
        };
        Ok(catalog)
    }
}
