//! Upstream student record as returned by the student information system.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Everything the projector needs from one fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentData {
    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub reporting_terms: Vec<ReportingTerm>,

    #[serde(default)]
    pub final_grades: Vec<FinalGrade>,

    #[serde(default)]
    pub assignments: Vec<Assignment>,

    #[serde(default)]
    pub assignment_scores: Vec<AssignmentScore>,
}

/// A course section the student is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub title: String,
}

/// A named grading period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingTerm {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "date_or_datetime")]
    pub end_date: DateTime<Utc>,
}

/// Final grade for one section in one reporting term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalGrade {
    pub section_id: i64,
    pub reporting_term_id: i64,
    #[serde(default)]
    pub grade: String,
}

/// An assignment posted to a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    pub section_id: i64,
    #[serde(deserialize_with = "date_or_datetime")]
    pub due_date: DateTime<Utc>,
}

/// Score for an assignment; empty means not graded yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentScore {
    pub assignment_id: i64,
    #[serde(default)]
    pub score: String,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn date_or_datetime<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant_accepts_both_forms() {
        let date = parse_instant("2024-02-01").unwrap();
        let stamp = parse_instant("2024-02-01T00:00:00Z").unwrap();
        assert_eq!(date, stamp);

        let offset = parse_instant("2024-02-01T09:00:00+09:00").unwrap();
        assert_eq!(offset, stamp);

        assert!(parse_instant("02/01/2024").is_none());
    }

    #[test]
    fn test_student_data_from_json() {
        let json = r#"{
            "sections": [{"id": 10, "title": "Biology"}],
            "reportingTerms": [
                {"id": 1, "title": "Q1", "startDate": "2024-01-01", "endDate": "2024-03-15"}
            ],
            "finalGrades": [{"sectionId": 10, "reportingTermId": 1, "grade": "A"}],
            "assignments": [
                {"id": 100, "name": "Lab 1", "sectionId": 10, "dueDate": "2024-02-15T12:00:00Z"}
            ],
            "assignmentScores": [{"assignmentId": 100, "score": "95"}]
        }"#;

        let data: StudentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.sections[0].title, "Biology");
        assert_eq!(data.reporting_terms[0].end_date, parse_instant("2024-03-15").unwrap());
        assert_eq!(data.final_grades[0].grade, "A");
        assert_eq!(data.assignments[0].section_id, 10);
        assert_eq!(data.assignment_scores[0].score, "95");
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let data: StudentData = serde_json::from_str("{}").unwrap();
        assert!(data.sections.is_empty());
        assert!(data.assignment_scores.is_empty());
    }

    #[test]
    fn test_invalid_date_rejected() {
        let json = r#"{"id": 1, "title": "Q1", "startDate": "soon", "endDate": "2024-03-15"}"#;
        assert!(serde_json::from_str::<ReportingTerm>(json).is_err());
    }
}
