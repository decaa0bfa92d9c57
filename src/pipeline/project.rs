//! Projection of the upstream student record into snapshot records.

use std::collections::{HashMap, HashSet};

use crate::models::{AssignmentRecord, ClassRecord, Snapshot, StudentData};
use crate::pipeline::TermWindow;

/// Build the class and assignment collections for the active window.
pub fn project(student: &StudentData, window: &TermWindow) -> Snapshot {
    let classes = project_classes(student, window);
    let assignments = project_assignments(student, window, &classes);
    Snapshot {
        classes,
        assignments,
    }
}

/// One record per section graded in an active term.
///
/// Overlapping quarter terms may each carry a final grade for the same
/// section; the first one in upstream order is kept so class ids stay unique.
pub fn project_classes(student: &StudentData, window: &TermWindow) -> Vec<ClassRecord> {
    let titles: HashMap<i64, &str> = student
        .sections
        .iter()
        .map(|s| (s.id, s.title.as_str()))
        .collect();
    let mut seen = HashSet::new();

    student
        .final_grades
        .iter()
        .filter(|g| window.is_active(g.reporting_term_id))
        .filter(|g| seen.insert(g.section_id))
        .map(|g| ClassRecord {
            id: g.section_id,
            name: titles
                .get(&g.section_id)
                .copied()
                .unwrap_or_default()
                .to_string(),
            grade: g.grade.clone(),
        })
        .collect()
}

/// One record per graded assignment due strictly inside the window.
///
/// Assignments without a score are skipped entirely; a previously graded
/// assignment whose score is cleared therefore shows up as removed.
pub fn project_assignments(
    student: &StudentData,
    window: &TermWindow,
    classes: &[ClassRecord],
) -> Vec<AssignmentRecord> {
    let scores: HashMap<i64, String> = student
        .assignment_scores
        .iter()
        .filter(|s| !s.score.is_empty())
        .map(|s| (s.assignment_id, format!("{}%", s.score)))
        .collect();

    student
        .assignments
        .iter()
        .filter(|a| window.contains(a.due_date))
        .filter_map(|a| {
            let grade = scores.get(&a.id)?;
            let class_name = classes
                .iter()
                .find(|c| c.id == a.section_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();

            Some(AssignmentRecord {
                id: a.id,
                name: a.name.clone(),
                grade: grade.clone(),
                class_id: a.section_id,
                class_name,
            })
        })
        .collect()
}
