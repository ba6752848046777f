//! Validation and deduplication of parsed task candidates, then enrichment
//! into displayable recommendations.

use std::collections::HashSet;

use tracing::warn;

use super::parser::TaskCandidate;
use crate::server::models::{assignment::Assignment, chat::TaskRecommendation};

/// Keeps only candidates whose id belongs to the authoritative set for the
/// target project, preserving order. Every dropped candidate is a model
/// hallucination and is logged individually.
pub fn validate(
    candidates: Vec<TaskCandidate>,
    authoritative_ids: &HashSet<String>,
) -> Vec<TaskCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let known = authoritative_ids.contains(&candidate.id);
            if !known {
                warn!(
                    task_id = %candidate.id,
                    title = %candidate.title,
                    "dropping hallucinated task reference"
                );
            }
            known
        })
        .collect()
}

/// Drops candidates already present in the user's assignment. Idempotent
/// for a fixed assignment snapshot; a user with no assignment passes all
/// candidates through.
pub fn filter_assigned(
    candidates: Vec<TaskCandidate>,
    assignment: Option<&Assignment>,
) -> Vec<TaskCandidate> {
    let Some(assignment) = assignment else {
        return candidates;
    };
    let assigned: HashSet<&str> = assignment
        .tasks
        .iter()
        .map(|t| t.task_id.as_str())
        .collect();
    candidates
        .into_iter()
        .filter(|candidate| !assigned.contains(candidate.id.as_str()))
        .collect()
}

/// Pure rewrite of surviving candidates into recommendation records.
/// Identifier and title are carried over untouched.
pub fn enrich(
    candidates: Vec<TaskCandidate>,
    project_id: &str,
    project_name: &str,
) -> Vec<TaskRecommendation> {
    candidates
        .into_iter()
        .map(|candidate| TaskRecommendation {
            task_id: candidate.id,
            task_name: candidate.title,
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::models::assignment::{Actor, AssignedTask};
    use chrono::Utc;

    fn candidate(id: &str, title: &str) -> TaskCandidate {
        TaskCandidate {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    fn assignment_with(task_ids: &[&str]) -> Assignment {
        Assignment {
            user_id: "u1".to_string(),
            tasks: task_ids
                .iter()
                .map(|id| AssignedTask::new(*id, Actor::User))
                .collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn validate_keeps_only_authoritative_ids_in_order() {
        let authoritative: HashSet<String> =
            ["t1", "t2", "t3"].iter().map(|s| s.to_string()).collect();
        let candidates = vec![
            candidate("t3", "Advanced"),
            candidate("t9", "Fake"),
            candidate("t1", "Intro"),
        ];
        let valid = validate(candidates.clone(), &authoritative);
        assert_eq!(valid, vec![candidate("t3", "Advanced"), candidate("t1", "Intro")]);
        assert!(valid.len() <= candidates.len());
    }

    #[test]
    fn validate_with_empty_authoritative_set_drops_everything() {
        let valid = validate(vec![candidate("t1", "Intro")], &HashSet::new());
        assert!(valid.is_empty());
    }

    #[test]
    fn filter_assigned_excludes_existing_tasks() {
        let assignment = assignment_with(&["t1"]);
        let survivors = filter_assigned(
            vec![candidate("t1", "Intro"), candidate("t2", "Basics")],
            Some(&assignment),
        );
        assert_eq!(survivors, vec![candidate("t2", "Basics")]);
    }

    #[test]
    fn filter_assigned_is_idempotent() {
        let assignment = assignment_with(&["t1", "t3"]);
        let candidates = vec![
            candidate("t1", "Intro"),
            candidate("t2", "Basics"),
            candidate("t3", "Advanced"),
        ];
        let once = filter_assigned(candidates, Some(&assignment));
        let twice = filter_assigned(once.clone(), Some(&assignment));
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_without_assignment_passes_through() {
        let candidates = vec![candidate("t1", "Intro")];
        assert_eq!(filter_assigned(candidates.clone(), None), candidates);
    }

    #[test]
    fn enrich_only_adds_project_fields() {
        let recs = enrich(vec![candidate("t1", "Intro")], "p1", "Learning Path");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].task_id, "t1");
        assert_eq!(recs[0].task_name, "Intro");
        assert_eq!(recs[0].project_id, "p1");
        assert_eq!(recs[0].project_name, "Learning Path");
    }
}
