use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdResult,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::engine::{evaluate_challenge_creation_badges, evaluate_completion};
use crate::error::ContractError;
use crate::helpers::{
    assert_not_paused, assert_operator, assert_owner, created_challenge_count, load_challenge,
    load_user, reject_funds, remove_user, resolve_invitees, save_user, validate_id,
};
use crate::msg::*;
use crate::reconcile::recalculate_all_scores;
use crate::state::*;

const CONTRACT_NAME: &str = "crates.io:gym-challenge-scoring";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_QUERY_LIMIT: u32 = 30;
const MAX_QUERY_LIMIT: u32 = 100;

// ─── Instantiate ────────────────────────────────────────────────────────────

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps.api.addr_validate(&msg.owner)?;
    let operator = deps.api.addr_validate(&msg.operator)?;

    let config = Config {
        owner,
        operator,
        paused: false,
        scoring: msg.scoring.unwrap_or_default(),
    };
    CONFIG.save(deps.storage, &config)?;

    for badge in &msg.badges {
        validate_id("badge", &badge.id)?;
        BADGES.save(deps.storage, &badge.id, badge)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", CONTRACT_NAME)
        .add_attribute("owner", config.owner.as_str())
        .add_attribute("operator", config.operator.as_str())
        .add_attribute("badges", msg.badges.len().to_string()))
}

// ─── Execute: Users & challenges ────────────────────────────────────────────

pub fn execute_register_user(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    user_id: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_not_paused(deps.as_ref())?;
    assert_operator(deps.as_ref(), &info.sender)?;
    validate_id("user", &user_id)?;

    if USERS.has(deps.storage, &user_id) {
        return Err(ContractError::UserAlreadyExists { user_id });
    }
    save_user(deps.storage, None, &UserRecord::new(user_id.clone()))?;

    Ok(Response::new()
        .add_attribute("action", "register_user")
        .add_attribute("user_id", &user_id))
}

pub fn execute_create_challenge(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    challenge_id: String,
    creator: String,
    difficulty: Option<String>,
    invitees: Vec<String>,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_not_paused(deps.as_ref())?;
    assert_operator(deps.as_ref(), &info.sender)?;
    validate_id("challenge", &challenge_id)?;
    validate_id("user", &creator)?;

    let mut user = load_user(deps.as_ref(), &creator)?;
    if CHALLENGES.has(deps.storage, &challenge_id) {
        return Err(ContractError::ChallengeAlreadyExists { challenge_id });
    }
    let invitees = resolve_invitees(deps.as_ref(), &creator, invitees)?;

    let challenge = ChallengeRecord {
        id: challenge_id.clone(),
        creator: creator.clone(),
        difficulty,
        invitees,
    };
    CHALLENGES.save(deps.storage, &challenge_id, &challenge)?;
    CREATED_CHALLENGES.save(deps.storage, (&creator, &challenge_id), &true)?;

    // Count includes the challenge saved above
    let created = created_challenge_count(deps.as_ref(), &creator)?;
    let shared_with = challenge.invitees.len() as u64;
    let grants = evaluate_challenge_creation_badges(&user, created, shared_with, |badge_id| {
        let defined = BADGES.has(deps.storage, badge_id);
        if !defined {
            deps.api
                .debug(&format!("badge {badge_id} earned by {creator} but not defined"));
        }
        defined
    });

    if !grants.is_empty() {
        user.badges.extend(grants.iter().cloned());
        // Badges don't move the score, so the index entry is unchanged
        USERS.save(deps.storage, &creator, &user)?;
    }

    let badges_granted: Vec<String> = grants.into_iter().collect();
    let data = CreateChallengeResponse {
        challenge_id: challenge_id.clone(),
        badges_granted: badges_granted.clone(),
    };

    Ok(Response::new()
        .set_data(to_json_binary(&data)?)
        .add_attribute("action", "create_challenge")
        .add_attribute("challenge_id", &challenge_id)
        .add_attribute("creator", &creator)
        .add_attribute("shared_with", shared_with.to_string())
        .add_attribute("badges_granted", badges_granted.join(",")))
}

/// Check-and-record happens within one message, so a retried or
/// concurrent duplicate sees the first completion and awards nothing.
pub fn execute_complete_challenge(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    user_id: String,
    challenge_id: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_not_paused(deps.as_ref())?;
    assert_operator(deps.as_ref(), &info.sender)?;
    validate_id("user", &user_id)?;
    validate_id("challenge", &challenge_id)?;

    let config = CONFIG.load(deps.storage)?;
    let mut user = load_user(deps.as_ref(), &user_id)?;
    let challenge = load_challenge(deps.as_ref(), &challenge_id)?;

    let outcome = evaluate_completion(&config.scoring, &user, &challenge);
    if !outcome.already_completed {
        let previous = user.score;
        user.completed_challenges.insert(challenge.id.clone());
        user.score = outcome.new_score;
        save_user(deps.storage, Some(previous), &user)?;
    }

    Ok(Response::new()
        .set_data(to_json_binary(&outcome)?)
        .add_attribute("action", "complete_challenge")
        .add_attribute("user_id", &user_id)
        .add_attribute("challenge_id", &challenge_id)
        .add_attribute("already_completed", outcome.already_completed.to_string())
        .add_attribute("points_awarded", outcome.points_awarded.to_string())
        .add_attribute("new_score", outcome.new_score.to_string()))
}

// ─── Execute: Admin ─────────────────────────────────────────────────────────

pub fn execute_remove_challenge(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    challenge_id: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    let challenge = load_challenge(deps.as_ref(), &challenge_id)?;
    CHALLENGES.remove(deps.storage, &challenge_id);
    CREATED_CHALLENGES.remove(deps.storage, (&challenge.creator, &challenge_id));

    Ok(Response::new()
        .add_attribute("action", "remove_challenge")
        .add_attribute("challenge_id", &challenge_id)
        .add_attribute("creator", &challenge.creator))
}

/// Deletes the user's created challenges first, then the user record.
pub fn execute_remove_user(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    user_id: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    let user = load_user(deps.as_ref(), &user_id)?;

    let created: Vec<String> = CREATED_CHALLENGES
        .prefix(&user_id)
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;

    for challenge_id in &created {
        CHALLENGES.remove(deps.storage, challenge_id);
        CREATED_CHALLENGES.remove(deps.storage, (&user_id, challenge_id));
    }
    remove_user(deps.storage, &user);

    Ok(Response::new()
        .add_attribute("action", "remove_user")
        .add_attribute("user_id", &user_id)
        .add_attribute("challenges_removed", created.len().to_string()))
}

pub fn execute_upsert_badge(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    badge: BadgeDefinition,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_id("badge", &badge.id)?;

    BADGES.save(deps.storage, &badge.id, &badge)?;

    Ok(Response::new()
        .add_attribute("action", "upsert_badge")
        .add_attribute("badge_id", &badge.id))
}

pub fn execute_remove_badge(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    badge_id: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    if !BADGES.has(deps.storage, &badge_id) {
        return Err(ContractError::BadgeNotFound { badge_id });
    }
    BADGES.remove(deps.storage, &badge_id);

    Ok(Response::new()
        .add_attribute("action", "remove_badge")
        .add_attribute("badge_id", &badge_id))
}

pub fn execute_update_scoring(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    scoring: ScoringTable,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    CONFIG.update(deps.storage, |mut c| -> StdResult<_> {
        c.scoring = scoring.clone();
        Ok(c)
    })?;

    Ok(Response::new()
        .add_attribute("action", "update_scoring")
        .add_attribute("easy", scoring.easy.to_string())
        .add_attribute("medium", scoring.medium.to_string())
        .add_attribute("hard", scoring.hard.to_string())
        .add_attribute("fallback", scoring.fallback.to_string())
        .add_attribute("invite_bonus", scoring.invite_bonus.to_string()))
}

pub fn execute_recalculate_scores(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    start_after: Option<String>,
    limit: Option<u32>,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    let result = rescore_users(deps, start_after, limit)?;

    Ok(Response::new()
        .set_data(to_json_binary(&result)?)
        .add_attribute("action", "recalculate_scores")
        .add_attribute("updated", result.updated.to_string())
        .add_attribute(
            "last_user_id",
            result.last_user_id.as_deref().unwrap_or_default(),
        ))
}

/// Recompute and persist scores for one page of users. Each user is saved
/// on its own, so an interrupted run leaves users either fully recomputed
/// or untouched.
fn rescore_users(
    deps: DepsMut,
    start_after: Option<String>,
    limit: Option<u32>,
) -> Result<RecalculateResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let start = start_after.as_deref().map(Bound::exclusive);
    let take = limit.map_or(usize::MAX, |l| l as usize);

    let mut users: Vec<UserRecord> = USERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(take)
        .map(|item| item.map(|(_, user)| user))
        .collect::<StdResult<Vec<_>>>()?;

    let previous: Vec<u64> = users.iter().map(|u| u.score).collect();
    let updated = recalculate_all_scores(&config.scoring, &mut users, |challenge_id| {
        let challenge = CHALLENGES.may_load(deps.storage, challenge_id)?;
        if challenge.is_none() {
            deps.api
                .debug(&format!("skipping dangling challenge reference {challenge_id}"));
        }
        Ok(challenge)
    })?;

    for (user, old_score) in users.iter().zip(previous) {
        save_user(deps.storage, Some(old_score), user)?;
    }

    Ok(RecalculateResponse {
        updated,
        last_user_id: users.last().map(|u| u.id.clone()),
    })
}

pub fn execute_pause(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    CONFIG.update(deps.storage, |mut c| -> StdResult<_> {
        c.paused = true;
        Ok(c)
    })?;

    Ok(Response::new().add_attribute("action", "pause"))
}

pub fn execute_unpause(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    if !config.paused {
        return Err(ContractError::NotPaused);
    }

    CONFIG.update(deps.storage, |mut c| -> StdResult<_> {
        c.paused = false;
        Ok(c)
    })?;

    Ok(Response::new().add_attribute("action", "unpause"))
}

// ─── Execute: Role transfers ────────────────────────────────────────────────

pub fn execute_propose_owner(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    new_owner: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    if PENDING_OWNER.may_load(deps.storage)?.is_some() {
        return Err(ContractError::OwnerTransferAlreadyPending);
    }
    let proposed = deps.api.addr_validate(&new_owner)?;
    PENDING_OWNER.save(
        deps.storage,
        &PendingOwnerTransfer {
            proposed_owner: proposed.clone(),
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "propose_owner")
        .add_attribute("proposed_owner", proposed.as_str()))
}

pub fn execute_accept_owner(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    let pending = PENDING_OWNER
        .may_load(deps.storage)?
        .ok_or(ContractError::NoOwnerTransferPending)?;
    if info.sender != pending.proposed_owner {
        return Err(ContractError::NotPendingOwner);
    }
    CONFIG.update(deps.storage, |mut c| -> StdResult<_> {
        c.owner = pending.proposed_owner.clone();
        Ok(c)
    })?;
    PENDING_OWNER.remove(deps.storage);
    Ok(Response::new()
        .add_attribute("action", "accept_owner")
        .add_attribute("new_owner", pending.proposed_owner.as_str()))
}

pub fn execute_cancel_owner_transfer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    if PENDING_OWNER.may_load(deps.storage)?.is_none() {
        return Err(ContractError::NoOwnerTransferPending);
    }
    PENDING_OWNER.remove(deps.storage);
    Ok(Response::new().add_attribute("action", "cancel_owner_transfer"))
}

pub fn execute_propose_operator(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    new_operator: String,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    if PENDING_OPERATOR.may_load(deps.storage)?.is_some() {
        return Err(ContractError::OperatorTransferAlreadyPending);
    }
    let proposed = deps.api.addr_validate(&new_operator)?;
    PENDING_OPERATOR.save(
        deps.storage,
        &PendingOperatorTransfer {
            proposed_operator: proposed.clone(),
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "propose_operator")
        .add_attribute("proposed_operator", proposed.as_str()))
}

pub fn execute_accept_operator(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    let pending = PENDING_OPERATOR
        .may_load(deps.storage)?
        .ok_or(ContractError::NoOperatorTransferPending)?;
    if info.sender != pending.proposed_operator {
        return Err(ContractError::NotPendingOperator);
    }
    CONFIG.update(deps.storage, |mut c| -> StdResult<_> {
        c.operator = pending.proposed_operator.clone();
        Ok(c)
    })?;
    PENDING_OPERATOR.remove(deps.storage);
    Ok(Response::new()
        .add_attribute("action", "accept_operator")
        .add_attribute("new_operator", pending.proposed_operator.as_str()))
}

pub fn execute_cancel_operator_transfer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    assert_owner(deps.as_ref(), &info.sender)?;
    if PENDING_OPERATOR.may_load(deps.storage)?.is_none() {
        return Err(ContractError::NoOperatorTransferPending);
    }
    PENDING_OPERATOR.remove(deps.storage);
    Ok(Response::new().add_attribute("action", "cancel_operator_transfer"))
}

// ─── Queries ────────────────────────────────────────────────────────────────

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_user(deps: Deps, user_id: String) -> StdResult<Binary> {
    to_json_binary(&USERS.load(deps.storage, &user_id)?)
}

pub fn query_challenge(deps: Deps, challenge_id: String) -> StdResult<Binary> {
    to_json_binary(&CHALLENGES.load(deps.storage, &challenge_id)?)
}

pub fn query_created_challenge_count(deps: Deps, user_id: String) -> StdResult<Binary> {
    let count = created_challenge_count(deps, &user_id)?;
    to_json_binary(&CreatedCountResponse { count })
}

pub fn query_has_badge(deps: Deps, user_id: String, badge_id: String) -> StdResult<Binary> {
    let has_badge = USERS
        .may_load(deps.storage, &user_id)?
        .map(|u| u.badges.contains(&badge_id))
        .unwrap_or(false);
    to_json_binary(&BadgeCheckResponse { has_badge })
}

pub fn query_badges(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let badges: Vec<BadgeDefinition> = BADGES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, badge)| badge))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&BadgesResponse { badges })
}

/// Reads the score index from the top, so only `limit` entries are touched.
/// Ties rank equally.
pub fn query_leaderboard(deps: Deps, limit: Option<u32>) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT) as usize;

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(limit);
    let ranked = SCORE_INDEX
        .keys(deps.storage, None, None, Order::Descending)
        .take(limit)
        .enumerate();
    for (position, key) in ranked {
        let (score, user_id) = key?;
        let rank = match entries.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => position as u32 + 1,
        };
        entries.push(LeaderboardEntry {
            user_id,
            score,
            rank,
        });
    }

    to_json_binary(&LeaderboardResponse { entries })
}

pub fn query_preview_completion(
    deps: Deps,
    user_id: String,
    challenge_id: String,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let user = USERS.load(deps.storage, &user_id)?;
    let challenge = CHALLENGES.load(deps.storage, &challenge_id)?;
    to_json_binary(&evaluate_completion(&config.scoring, &user, &challenge))
}

pub fn query_pending_owner(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&PENDING_OWNER.may_load(deps.storage)?)
}

pub fn query_pending_operator(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&PENDING_OPERATOR.may_load(deps.storage)?)
}

// ─── Migrate ────────────────────────────────────────────────────────────────

pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // Backfill the leaderboard index for stores written before it existed
    let users: Vec<UserRecord> = USERS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, user)| user))
        .collect::<StdResult<Vec<_>>>()?;
    for user in &users {
        SCORE_INDEX.save(deps.storage, (user.score, &user.id), &true)?;
    }

    let mut response = Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION)
        .add_attribute("indexed_users", users.len().to_string());

    if msg.recalculate_scores {
        let result = rescore_users(deps, None, None)?;
        response = response.add_attribute("scores_recalculated", result.updated.to_string());
    }

    Ok(response)
}
