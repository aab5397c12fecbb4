use std::path::PathBuf;

use anyhow::Context;
use career_compass::bank::BankCatalog;
use career_compass::config::Config;
use career_compass::models::{CollegeRecord, QuizResult, Recommendation};
use career_compass::runner::{self, AnswerSheet};
use career_compass::session::QuizSession;
use career_compass::{colleges, db, matcher, recommend, report};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "career-compass")]
#[command(about = "Career guidance quiz with stream and specialization recommendations", long_about = None)]
struct Cli {
    /// Question bank JSON (defaults to the built-in banks)
    #[arg(long, global = true)]
    banks: Option<PathBuf>,
    /// College CSV (defaults to jk_colleges.csv)
    #[arg(long, global = true)]
    colleges: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the quiz in the terminal
    Quiz {
        /// Store the result for this student
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Score a recorded answer sheet
    Replay {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List colleges matching a career label
    Colleges {
        #[arg(long)]
        career: String,
    },
    /// Validate and list the question banks
    Banks,
    /// Create or upgrade the database schema
    InitDb,
    /// Show the stored recommendation for a student
    Profile {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.banks.clone(), cli.colleges.clone());

    let filter = match config.rust_log.as_deref() {
        Some(directives) => EnvFilter::new(directives),
        None => match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Career Compass v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Quiz { email, report } => {
            let catalog = config.load_catalog()?;
            let mut session = QuizSession::new(&catalog);
            let stdin = std::io::stdin();
            let result = runner::run_interactive(&mut session, stdin.lock(), std::io::stdout())?;

            match result {
                Some(result) => {
                    finish(&config, &catalog, &result, email.as_deref(), report).await?;
                }
                None => println!("Quiz not finished; nothing was saved."),
            }
        }
        Commands::Replay {
            answers,
            email,
            report,
        } => {
            let catalog = config.load_catalog()?;
            let sheet = AnswerSheet::from_path(&answers)?;
            let mut session = QuizSession::new(&catalog);
            let result = runner::replay(&mut session, &sheet)?;
            finish(&config, &catalog, &result, email.as_deref(), report).await?;
        }
        Commands::Colleges { career } => {
            let catalog = config.load_catalog()?;
            let records = colleges::load_colleges(&config.colleges_path)?;
            let matches = matcher::match_colleges(&career, &records, catalog.synonyms());
            print_colleges(&matches);
        }
        Commands::Banks => {
            let catalog = config.load_catalog()?;
            println!("main: {} questions", catalog.main().len());
            for name in catalog.sub_bank_names() {
                let size = catalog.sub_bank(name).map(|bank| bank.len()).unwrap_or(0);
                println!("{name}: {size} questions");
            }
            println!("{} course synonyms", catalog.synonyms().len());
        }
        Commands::InitDb => {
            let pool = db::connect(config.require_database_url()?).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Profile { email } => {
            let pool = db::connect(config.require_database_url()?).await?;
            match db::fetch_result(&pool, &email).await? {
                Some(stored) => {
                    println!("{} (recorded {})", stored.email, stored.recorded_at.format("%Y-%m-%d"));
                    print_triple("Stream", &stored.stream);
                    print_triple("Specialization", &stored.specialization);
                }
                None => println!("No recommendation stored for {email}."),
            }
        }
    }

    Ok(())
}

async fn finish(
    config: &Config,
    catalog: &BankCatalog,
    result: &QuizResult,
    email: Option<&str>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!();
    if result.stream_scores.is_empty() {
        println!("No strong matches from the quiz; try exploring careers on your own.");
    } else {
        println!("Suggested streams:");
        for (label, score) in recommend::ranked(&result.stream_scores) {
            println!("- {label} (score {score})");
        }
    }
    print_triple("Stream", &result.stream);
    print_triple("Specialization", &result.specialization);

    let records = colleges::load_colleges(&config.colleges_path)?;
    let mut matches = Vec::new();
    if let Some(label) = result.final_label() {
        matches = matcher::match_colleges(label, &records, catalog.synonyms());
        if matches.is_empty() {
            if let Some(major) = result.stream.major.as_deref() {
                matches = matcher::match_colleges(major, &records, catalog.synonyms());
            }
        }
    }
    println!();
    println!("Government colleges offering related courses:");
    print_colleges(&matches);

    if let Some(path) = report_path {
        let roadmap = result
            .stream
            .major
            .as_deref()
            .and_then(|major| catalog.roadmap(major));
        let output = report::build_report(email, chrono::Utc::now(), result, roadmap, &matches);
        std::fs::write(&path, output)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!("Report written to {}.", path.display());
    }

    if let Some(email) = email {
        let pool = db::connect(config.require_database_url()?).await?;
        db::save_result(&pool, email, result).await?;
        println!("Saved recommendation for {email}.");
    }

    Ok(())
}

fn print_triple(title: &str, recommendation: &Recommendation) {
    if recommendation.is_empty() {
        println!("{title}: none");
        return;
    }
    let labels: Vec<&str> = recommendation.labels().collect();
    println!("{title}: {}", labels.join(" > "));
}

fn print_colleges(matches: &[&CollegeRecord]) {
    if matches.is_empty() {
        println!("No matching government colleges found for this career in the dataset.");
        return;
    }
    for college in matches {
        println!("- {} ({}): {}", college.college, college.location, college.course);
        if !college.exam_info.is_empty() {
            println!("  Exams: {}", college.exam_info);
        }
    }
}
