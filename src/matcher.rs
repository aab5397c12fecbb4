use indexmap::IndexMap;
use tracing::debug;

use crate::models::CollegeRecord;

/// Colleges whose course mentions the label's first word. When nothing
/// matches, the first label word with a synonym entry is tried instead
/// (e.g. "Doctor" -> "MBBS"). An empty result is a normal outcome.
pub fn match_colleges<'r>(
    label: &str,
    records: &'r [CollegeRecord],
    synonyms: &IndexMap<String, String>,
) -> Vec<&'r CollegeRecord> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    let Some(query) = tokens.first() else {
        return Vec::new();
    };

    let results = filter_by_course(records, query);
    if !results.is_empty() {
        return results;
    }

    let Some(synonym) = tokens.iter().find_map(|token| lookup_synonym(synonyms, token)) else {
        debug!(label, "no course match and no synonym");
        return Vec::new();
    };

    debug!(label, synonym, "retrying course match with synonym");
    filter_by_course(records, synonym)
}

pub fn filter_by_course<'r>(records: &'r [CollegeRecord], query: &str) -> Vec<&'r CollegeRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.course.to_lowercase().contains(&needle))
        .collect()
}

fn lookup_synonym<'s>(synonyms: &'s IndexMap<String, String>, token: &str) -> Option<&'s str> {
    synonyms
        .get(token)
        .or_else(|| {
            synonyms
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(token))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(name: &str, course: &str) -> CollegeRecord {
        CollegeRecord {
            college: name.to_string(),
            location: "Srinagar".to_string(),
            course: course.to_string(),
            future_scope: String::new(),
            study_materials: String::new(),
            exam_info: String::new(),
        }
    }

    fn synonyms() -> IndexMap<String, String> {
        [("Doctor", "MBBS"), ("Engineer", "BTech")]
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn matches_first_word_case_insensitively() {
        let records = vec![
            college("GDC Sopore", "BSc"),
            college("GCET Jammu", "Computer Science BTech"),
        ];

        let results = match_colleges("computer science engineer", &records, &synonyms());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].college, "GCET Jammu");
    }

    #[test]
    fn falls_back_to_synonym() {
        let records = vec![
            college("GMC Srinagar", "MBBS Program"),
            college("GDC Anantnag", "BA"),
        ];

        let results = match_colleges("Doctor", &records, &synonyms());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].college, "GMC Srinagar");
    }

    #[test]
    fn synonym_found_on_later_token() {
        let records = vec![college("NIT Srinagar", "BTech")];

        let results = match_colleges("Civil Engineer", &records, &synonyms());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn direct_match_skips_synonym() {
        let records = vec![
            college("GMC Srinagar", "MBBS Program"),
            college("Doctoral Institute", "Doctor of Philosophy"),
        ];

        let results = match_colleges("Doctor", &records, &synonyms());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].college, "Doctoral Institute");
    }

    #[test]
    fn no_match_is_empty() {
        let records = vec![college("GDC Sopore", "BSc")];
        assert!(match_colleges("Athlete", &records, &synonyms()).is_empty());
        assert!(match_colleges("Doctor", &records, &synonyms()).is_empty());
    }

    #[test]
    fn blank_label_matches_nothing() {
        let records = vec![college("GDC Sopore", "BSc")];
        assert!(match_colleges("   ", &records, &synonyms()).is_empty());
    }

    #[test]
    fn synonym_keys_ignore_case() {
        let records = vec![college("GMC Jammu", "MBBS")];
        let results = match_colleges("DOCTOR", &records, &synonyms());
        assert_eq!(results.len(), 1);
    }
}
