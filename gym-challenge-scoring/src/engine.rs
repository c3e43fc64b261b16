//! Score and badge award rules.
//!
//! Everything here is a pure computation over records the caller has
//! already loaded. Persisting the results (and refusing unknown users or
//! challenges) is the caller's job.

use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;

use crate::state::{ChallengeRecord, ScoringTable, UserRecord};

/// Granted on a user's first created challenge.
pub const FIRST_CHALLENGE_CREATOR: &str = "first-challenge-creator";
/// Granted the first time a user shares a challenge with someone else.
pub const COMMUNITY_PLAYER: &str = "community-player";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Accepts the English labels and the legacy French ones stored by
    /// older clients, matched exactly. Anything else is unrecognised.
    pub fn parse(raw: &str) -> Option<Difficulty> {
        match raw {
            "easy" | "facile" => Some(Difficulty::Easy),
            "medium" | "intermédiaire" => Some(Difficulty::Medium),
            "hard" | "difficile" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[cw_serde]
pub struct CompletionOutcome {
    pub already_completed: bool,
    pub points_awarded: u64,
    pub new_score: u64,
}

/// Base points for the challenge difficulty.
pub fn base_points(table: &ScoringTable, difficulty: Option<&str>) -> u64 {
    match difficulty.and_then(Difficulty::parse) {
        Some(Difficulty::Easy) => table.easy,
        Some(Difficulty::Medium) => table.medium,
        Some(Difficulty::Hard) => table.hard,
        None => table.fallback,
    }
}

/// Points one completion of `challenge` is worth to `user_id`.
pub fn points_for(table: &ScoringTable, user_id: &str, challenge: &ChallengeRecord) -> u64 {
    let base = base_points(table, challenge.difficulty.as_deref());
    if challenge.invitees.contains(user_id) {
        base.saturating_add(table.invite_bonus)
    } else {
        base
    }
}

pub fn evaluate_completion(
    table: &ScoringTable,
    user: &UserRecord,
    challenge: &ChallengeRecord,
) -> CompletionOutcome {
    // Retried requests must never award twice
    if user.completed_challenges.contains(&challenge.id) {
        return CompletionOutcome {
            already_completed: true,
            points_awarded: 0,
            new_score: user.score,
        };
    }

    let points = points_for(table, &user.id, challenge);
    CompletionOutcome {
        already_completed: false,
        points_awarded: points,
        new_score: user.score.saturating_add(points),
    }
}

/// Badges earned by creating a challenge.
///
/// `creator_challenge_count` includes the challenge just created and
/// `shared_with_count` is the number of other users it was shared with.
/// `in_catalog` reports whether a badge id is defined; undefined badges
/// are skipped without affecting the others. Badges the user already holds
/// are never returned.
pub fn evaluate_challenge_creation_badges<F>(
    user: &UserRecord,
    creator_challenge_count: u64,
    shared_with_count: u64,
    in_catalog: F,
) -> BTreeSet<String>
where
    F: Fn(&str) -> bool,
{
    let candidates = [
        (FIRST_CHALLENGE_CREATOR, creator_challenge_count == 1),
        (COMMUNITY_PLAYER, shared_with_count > 0),
    ];

    candidates
        .into_iter()
        .filter(|(_, earned)| *earned)
        .map(|(badge_id, _)| badge_id)
        .filter(|badge_id| !user.badges.contains(*badge_id))
        .filter(|badge_id| in_catalog(*badge_id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(difficulty: Option<&str>, invitees: &[&str]) -> ChallengeRecord {
        ChallengeRecord {
            id: "c1".to_string(),
            creator: "owner1".to_string(),
            difficulty: difficulty.map(str::to_string),
            invitees: invitees.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn full_catalog(_: &str) -> bool {
        true
    }

    #[test]
    fn difficulty_mapping() {
        let table = ScoringTable::default();
        let user = UserRecord::new("u1");
        let cases = [
            (Some("easy"), 20),
            (Some("medium"), 40),
            (Some("hard"), 70),
            (Some("extreme"), 20),
            (Some(""), 20),
            (None, 20),
        ];
        for (difficulty, expected) in cases {
            let out = evaluate_completion(&table, &user, &challenge(difficulty, &[]));
            assert_eq!(out.points_awarded, expected, "difficulty {difficulty:?}");
            assert!(!out.already_completed);
        }
    }

    #[test]
    fn legacy_difficulty_labels() {
        assert_eq!(Difficulty::parse("facile"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("intermédiaire"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("difficile"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("intermediaire"), None);
        assert_eq!(Difficulty::parse("brutal"), None);
    }

    #[test]
    fn miscased_labels_score_fallback() {
        let table = ScoringTable::default();
        for label in ["Hard", " HARD ", "Difficile", "MEDIUM", "Easy "] {
            let c = challenge(Some(label), &[]);
            assert_eq!(points_for(&table, "u1", &c), 20, "label {label:?}");
        }
    }

    #[test]
    fn invite_bonus_is_additive() {
        let table = ScoringTable::default();
        let user = UserRecord::new("u1");
        let out = evaluate_completion(&table, &user, &challenge(Some("hard"), &["u1", "u2"]));
        assert_eq!(out.points_awarded, 80);
        assert_eq!(out.new_score, 80);
    }

    #[test]
    fn invitation_of_someone_else_gives_no_bonus() {
        let table = ScoringTable::default();
        let mut user = UserRecord::new("u1");
        let c = challenge(Some("medium"), &["other"]);

        let first = evaluate_completion(&table, &user, &c);
        assert_eq!(
            first,
            CompletionOutcome {
                already_completed: false,
                points_awarded: 40,
                new_score: 40,
            }
        );

        user.completed_challenges.insert(c.id.clone());
        user.score = first.new_score;

        let second = evaluate_completion(&table, &user, &c);
        assert_eq!(
            second,
            CompletionOutcome {
                already_completed: true,
                points_awarded: 0,
                new_score: 40,
            }
        );
    }

    #[test]
    fn completion_does_not_touch_inputs() {
        let table = ScoringTable::default();
        let user = UserRecord::new("u1");
        let c = challenge(Some("easy"), &[]);
        let before = user.clone();
        evaluate_completion(&table, &user, &c);
        assert_eq!(user, before);
    }

    #[test]
    fn custom_table_is_honoured() {
        let table = ScoringTable {
            easy: 1,
            medium: 2,
            hard: 3,
            fallback: 0,
            invite_bonus: 100,
        };
        let user = UserRecord::new("u1");
        let out = evaluate_completion(&table, &user, &challenge(Some("unknown"), &["u1"]));
        assert_eq!(out.points_awarded, 100);
    }

    #[test]
    fn first_creation_grants_creator_badge_once() {
        let mut user = UserRecord::new("u1");
        let grants = evaluate_challenge_creation_badges(&user, 1, 0, full_catalog);
        assert_eq!(grants, BTreeSet::from([FIRST_CHALLENGE_CREATOR.to_string()]));

        user.badges.extend(grants);
        let retry = evaluate_challenge_creation_badges(&user, 1, 0, full_catalog);
        assert!(retry.is_empty());
    }

    #[test]
    fn second_creation_never_grants_creator_badge() {
        let user = UserRecord::new("u1");
        let grants = evaluate_challenge_creation_badges(&user, 2, 0, full_catalog);
        assert!(grants.is_empty());
    }

    #[test]
    fn sharing_grants_community_badge() {
        let user = UserRecord::new("u1");
        let grants = evaluate_challenge_creation_badges(&user, 1, 3, full_catalog);
        assert_eq!(
            grants,
            BTreeSet::from([
                COMMUNITY_PLAYER.to_string(),
                FIRST_CHALLENGE_CREATOR.to_string(),
            ])
        );
    }

    #[test]
    fn missing_catalog_entry_only_skips_that_badge() {
        let user = UserRecord::new("u1");
        let grants =
            evaluate_challenge_creation_badges(&user, 1, 1, |id| id == COMMUNITY_PLAYER);
        assert_eq!(grants, BTreeSet::from([COMMUNITY_PLAYER.to_string()]));
    }
}
