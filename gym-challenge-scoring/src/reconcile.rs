//! Full score recomputation from completion history.

use cosmwasm_std::StdResult;

use crate::engine::points_for;
use crate::state::{ChallengeRecord, ScoringTable, UserRecord};

/// Rebuild one user's score from scratch.
///
/// Completed ids that `lookup` cannot resolve are skipped. Lookup errors
/// are storage failures and propagate.
pub fn recalculate_user_score<F>(
    table: &ScoringTable,
    user: &UserRecord,
    mut lookup: F,
) -> StdResult<u64>
where
    F: FnMut(&str) -> StdResult<Option<ChallengeRecord>>,
{
    let mut score = 0u64;
    for challenge_id in &user.completed_challenges {
        let Some(challenge) = lookup(challenge_id.as_str())? else {
            continue;
        };
        score = score.saturating_add(points_for(table, &user.id, &challenge));
    }
    Ok(score)
}

/// Overwrite every user's score with its recomputed value.
/// Returns the number of users updated.
pub fn recalculate_all_scores<F>(
    table: &ScoringTable,
    users: &mut [UserRecord],
    mut lookup: F,
) -> StdResult<u32>
where
    F: FnMut(&str) -> StdResult<Option<ChallengeRecord>>,
{
    let mut updated = 0u32;
    for user in users.iter_mut() {
        user.score = recalculate_user_score(table, user, &mut lookup)?;
        updated += 1;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use cosmwasm_std::StdError;

    use super::*;
    use crate::engine::evaluate_completion;

    fn challenge(id: &str, difficulty: &str, invitees: &[&str]) -> ChallengeRecord {
        ChallengeRecord {
            id: id.to_string(),
            creator: "owner1".to_string(),
            difficulty: Some(difficulty.to_string()),
            invitees: invitees.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog() -> BTreeMap<String, ChallengeRecord> {
        [
            challenge("a", "easy", &[]),
            challenge("b", "medium", &["u1"]),
            challenge("c", "hard", &[]),
        ]
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect()
    }

    fn user_with(id: &str, score: u64, completed: &[&str]) -> UserRecord {
        let mut user = UserRecord::new(id);
        user.score = score;
        user.completed_challenges = completed.iter().map(|s| s.to_string()).collect();
        user
    }

    #[test]
    fn matches_replayed_completions() {
        let table = ScoringTable::default();
        let challenges = catalog();

        // Replay completions one by one through the engine, in several orders
        for order in [["a", "b", "c"], ["c", "a", "b"], ["b", "c", "a"]] {
            let mut replayed = UserRecord::new("u1");
            for id in order {
                let out = evaluate_completion(&table, &replayed, &challenges[id]);
                replayed.completed_challenges.insert(id.to_string());
                replayed.score = out.new_score;
            }

            let rebuilt = recalculate_user_score(&table, &replayed, |id| {
                Ok(challenges.get(id).cloned())
            })
            .unwrap();
            assert_eq!(rebuilt, 20 + 50 + 70);
            assert_eq!(rebuilt, replayed.score);
        }
    }

    #[test]
    fn dangling_references_are_skipped() {
        let table = ScoringTable::default();
        let challenges = catalog();
        let user = user_with("u2", 999, &["a", "gone", "c"]);

        let score =
            recalculate_user_score(&table, &user, |id| Ok(challenges.get(id).cloned())).unwrap();
        assert_eq!(score, 90);
    }

    #[test]
    fn all_users_overwritten_independently() {
        let table = ScoringTable::default();
        let challenges = catalog();
        let mut users = vec![
            user_with("u1", 5, &["b"]),
            user_with("u2", 1_000, &["missing"]),
            user_with("u3", 0, &[]),
        ];

        let updated =
            recalculate_all_scores(&table, &mut users, |id| Ok(challenges.get(id).cloned()))
                .unwrap();
        assert_eq!(updated, 3);
        assert_eq!(users[0].score, 50);
        assert_eq!(users[1].score, 0);
        assert_eq!(users[2].score, 0);

        // Running again changes nothing
        let snapshot = users.clone();
        recalculate_all_scores(&table, &mut users, |id| Ok(challenges.get(id).cloned())).unwrap();
        assert_eq!(users, snapshot);
    }

    #[test]
    fn lookup_failure_propagates() {
        let table = ScoringTable::default();
        let user = user_with("u1", 0, &["a"]);
        let err = recalculate_user_score(&table, &user, |_| {
            Err(StdError::generic_err("storage offline"))
        })
        .unwrap_err();
        assert!(err.to_string().contains("storage offline"));
    }
}
