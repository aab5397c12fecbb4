use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::models::CollegeRecord;

/// Reads college records from a CSV with columns
/// `College,Location,Course,Future_Scope,Study_Materials,Exam_Info`.
/// A missing file yields the built-in sample rows; an unreadable one is an
/// error.
pub fn load_colleges(path: &Path) -> anyhow::Result<Vec<CollegeRecord>> {
    if !path.exists() {
        warn!(path = %path.display(), "college CSV not found, using sample colleges");
        return Ok(fallback_colleges());
    }

    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open college CSV {}", path.display()))?;
    let records = read_colleges(reader)
        .with_context(|| format!("failed to parse college CSV {}", path.display()))?;

    info!(path = %path.display(), count = records.len(), "loaded colleges");
    Ok(records)
}

pub fn read_colleges<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> anyhow::Result<Vec<CollegeRecord>> {
    let mut records = Vec::new();
    for result in reader.deserialize::<CollegeRecord>() {
        records.push(result?);
    }
    Ok(records)
}

pub fn fallback_colleges() -> Vec<CollegeRecord> {
    vec![
        CollegeRecord {
            college: "Government Degree College Sopore".to_string(),
            location: "Baramulla".to_string(),
            course: "BSc".to_string(),
            future_scope: "BSc -> Research, MSc, Govt jobs".to_string(),
            study_materials: "Basic Physics/Chemistry/Maths textbooks".to_string(),
            exam_info: "University of Kashmir semester exams".to_string(),
        },
        CollegeRecord {
            college: "Government Degree College Anantnag".to_string(),
            location: "Anantnag".to_string(),
            course: "BA".to_string(),
            future_scope: "BA -> Civil Services, Masters, Teaching".to_string(),
            study_materials: "History/Pol. Science/English resources".to_string(),
            exam_info: "University semester exams & state entrance tests".to_string(),
        },
    ]
}
