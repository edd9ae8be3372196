//! Aggregation of availability answers into a candidates × users grid.

use std::collections::HashMap;

use shared::models::{AvailabilityEntry, AvailabilityKind, Candidate, User};

/// One row of the grid: a candidate and one answer per grid user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub candidate: Candidate,
    pub answers: Vec<AvailabilityKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityGrid {
    pub users: Vec<User>,
    pub rows: Vec<GridRow>,
}

impl AvailabilityGrid {
    /// Build the grid for `candidates`.
    ///
    /// Columns are every user that answered, ordered by user id, followed by
    /// `viewer` when they have not answered yet. Missing answers read as
    /// [`AvailabilityKind::Unavailable`].
    pub fn build(
        candidates: Vec<Candidate>,
        entries: &[AvailabilityEntry],
        viewer: Option<&User>,
    ) -> Self {
        let mut users: Vec<User> = Vec::new();
        for entry in entries {
            if !users.iter().any(|u| u.user_id == entry.user.user_id) {
                users.push(entry.user.clone());
            }
        }
        users.sort_by_key(|u| u.user_id);
        if let Some(viewer) = viewer {
            if !users.iter().any(|u| u.user_id == viewer.user_id) {
                users.push(viewer.clone());
            }
        }

        let answers: HashMap<(i32, i64), AvailabilityKind> = entries
            .iter()
            .map(|e| ((e.candidate_id, e.user.user_id), e.availability))
            .collect();

        let rows = candidates
            .into_iter()
            .map(|candidate| {
                let row_answers = users
                    .iter()
                    .map(|u| {
                        answers
                            .get(&(candidate.candidate_id, u.user_id))
                            .copied()
                            .unwrap_or_default()
                    })
                    .collect();
                GridRow {
                    candidate,
                    answers: row_answers,
                }
            })
            .collect();

        Self { users, rows }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn user(id: i64, name: &str) -> User {
        User {
            user_id: id,
            username: name.to_string(),
        }
    }

    fn candidate(id: i32, schedule_id: Uuid) -> Candidate {
        Candidate {
            candidate_id: id,
            candidate_name: format!("候補{}", id),
            schedule_id,
        }
    }

    #[test]
    fn missing_answers_default_to_unavailable() {
        let schedule_id = Uuid::new_v4();
        let entries = vec![AvailabilityEntry {
            candidate_id: 1,
            user: user(5, "alice"),
            availability: AvailabilityKind::Available,
        }];

        let grid = AvailabilityGrid::build(
            vec![candidate(1, schedule_id), candidate(2, schedule_id)],
            &entries,
            None,
        );

        assert_eq!(grid.users, vec![user(5, "alice")]);
        assert_eq!(grid.rows[0].answers, vec![AvailabilityKind::Available]);
        assert_eq!(grid.rows[1].answers, vec![AvailabilityKind::Unavailable]);
    }

    #[test]
    fn viewer_column_is_appended_once() {
        let schedule_id = Uuid::new_v4();
        let entries = vec![
            AvailabilityEntry {
                candidate_id: 1,
                user: user(9, "bob"),
                availability: AvailabilityKind::Undecided,
            },
            AvailabilityEntry {
                candidate_id: 1,
                user: user(3, "carol"),
                availability: AvailabilityKind::Available,
            },
        ];

        let viewer = user(3, "carol");
        let grid = AvailabilityGrid::build(vec![candidate(1, schedule_id)], &entries, Some(&viewer));
        assert_eq!(grid.users, vec![user(3, "carol"), user(9, "bob")]);
        assert_eq!(
            grid.rows[0].answers,
            vec![AvailabilityKind::Available, AvailabilityKind::Undecided]
        );

        let newcomer = user(20, "dave");
        let grid =
            AvailabilityGrid::build(vec![candidate(1, schedule_id)], &entries, Some(&newcomer));
        assert_eq!(grid.users.last(), Some(&newcomer));
        assert_eq!(grid.rows[0].answers[2], AvailabilityKind::Unavailable);
    }

    #[test]
    fn rows_follow_candidate_order() {
        let schedule_id = Uuid::new_v4();
        let grid = AvailabilityGrid::build(
            vec![candidate(3, schedule_id), candidate(1, schedule_id)],
            &[],
            None,
        );
        let ids: Vec<i32> = grid.rows.iter().map(|r| r.candidate.candidate_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(grid.users.is_empty());
    }
}
