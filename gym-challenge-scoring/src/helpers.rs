use std::collections::BTreeSet;

use cosmwasm_std::{Addr, Deps, MessageInfo, Order, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{
    ChallengeRecord, UserRecord, CHALLENGES, CONFIG, CREATED_CHALLENGES, SCORE_INDEX, USERS,
};

pub const MAX_ID_LEN: usize = 128;

pub fn assert_owner(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if *sender != config.owner {
        return Err(ContractError::Unauthorized {
            role: "owner".to_string(),
        });
    }
    Ok(())
}

pub fn assert_operator(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if *sender != config.operator {
        return Err(ContractError::Unauthorized {
            role: "operator".to_string(),
        });
    }
    Ok(())
}

pub fn assert_not_paused(deps: Deps) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::Paused);
    }
    Ok(())
}

pub fn reject_funds(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::UnexpectedFunds);
    }
    Ok(())
}

/// Ids are opaque, but must be non-empty, bounded and whitespace-free.
pub fn validate_id(kind: &str, id: &str) -> Result<(), ContractError> {
    let reason = if id.is_empty() {
        "must not be empty"
    } else if id.len() > MAX_ID_LEN {
        "too long"
    } else if id.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(ContractError::InvalidId {
        kind: kind.to_string(),
        reason: reason.to_string(),
    })
}

pub fn load_user(deps: Deps, user_id: &str) -> Result<UserRecord, ContractError> {
    USERS
        .may_load(deps.storage, user_id)?
        .ok_or_else(|| ContractError::UserNotFound {
            user_id: user_id.to_string(),
        })
}

pub fn load_challenge(deps: Deps, challenge_id: &str) -> Result<ChallengeRecord, ContractError> {
    CHALLENGES
        .may_load(deps.storage, challenge_id)?
        .ok_or_else(|| ContractError::ChallengeNotFound {
            challenge_id: challenge_id.to_string(),
        })
}

/// Validated, de-duplicated invitee set. The creator is dropped and every
/// other invitee must be a registered user.
pub fn resolve_invitees(
    deps: Deps,
    creator: &str,
    invitees: Vec<String>,
) -> Result<BTreeSet<String>, ContractError> {
    let mut resolved = BTreeSet::new();
    for invitee in invitees {
        validate_id("user", &invitee)?;
        if invitee == creator {
            continue;
        }
        if !USERS.has(deps.storage, &invitee) {
            return Err(ContractError::UserNotFound { user_id: invitee });
        }
        resolved.insert(invitee);
    }
    Ok(resolved)
}

/// Challenges `creator` has created so far, counted from the creation index.
pub fn created_challenge_count(deps: Deps, creator: &str) -> StdResult<u64> {
    CREATED_CHALLENGES
        .prefix(creator)
        .keys(deps.storage, None, None, Order::Ascending)
        .try_fold(0u64, |count, key| key.map(|_| count + 1))
}

/// Persist a user and move its leaderboard entry from `previous_score`
/// (the score currently stored, if any) to its new score.
pub fn save_user(
    storage: &mut dyn Storage,
    previous_score: Option<u64>,
    user: &UserRecord,
) -> StdResult<()> {
    if let Some(old) = previous_score {
        SCORE_INDEX.remove(storage, (old, &user.id));
    }
    SCORE_INDEX.save(storage, (user.score, &user.id), &true)?;
    USERS.save(storage, &user.id, user)
}

/// Drop a user and its leaderboard entry.
pub fn remove_user(storage: &mut dyn Storage, user: &UserRecord) {
    SCORE_INDEX.remove(storage, (user.score, &user.id));
    USERS.remove(storage, &user.id);
}
