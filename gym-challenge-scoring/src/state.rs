use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

/// Contract-level configuration
#[cw_serde]
pub struct Config {
    pub owner: Addr,
    /// Backend service that relays user actions (registration, creation, completion)
    pub operator: Addr,
    pub paused: bool,
    pub scoring: ScoringTable,
}

/// Points awarded per difficulty, plus the flat bonus for invited users.
#[cw_serde]
pub struct ScoringTable {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
    /// Used when a challenge has no difficulty or one we don't recognise
    pub fallback: u64,
    pub invite_bonus: u64,
}

impl Default for ScoringTable {
    fn default() -> Self {
        ScoringTable {
            easy: 20,
            medium: 40,
            hard: 70,
            fallback: 20,
            invite_bonus: 10,
        }
    }
}

#[cw_serde]
pub struct PendingOwnerTransfer {
    pub proposed_owner: Addr,
}

#[cw_serde]
pub struct PendingOperatorTransfer {
    pub proposed_operator: Addr,
}

#[cw_serde]
pub struct UserRecord {
    pub id: String,
    pub score: u64,
    pub completed_challenges: BTreeSet<String>,
    /// Granted badge ids (stable slugs, never display names)
    pub badges: BTreeSet<String>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>) -> Self {
        UserRecord {
            id: id.into(),
            score: 0,
            completed_challenges: BTreeSet::new(),
            badges: BTreeSet::new(),
        }
    }
}

#[cw_serde]
pub struct ChallengeRecord {
    pub id: String,
    pub creator: String,
    /// Raw difficulty as submitted; unrecognised values score with the fallback
    pub difficulty: Option<String>,
    /// Users the challenge was shared with. Never contains the creator.
    pub invitees: BTreeSet<String>,
}

/// Badge catalog entry. `id` is the stable key rules refer to.
#[cw_serde]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const PENDING_OWNER: Item<PendingOwnerTransfer> = Item::new("pending_owner");
pub const PENDING_OPERATOR: Item<PendingOperatorTransfer> = Item::new("pending_operator");

/// user_id -> UserRecord
pub const USERS: Map<&str, UserRecord> = Map::new("users");

/// challenge_id -> ChallengeRecord
pub const CHALLENGES: Map<&str, ChallengeRecord> = Map::new("challenges");

/// (creator_id, challenge_id) -> true
/// Source of the derived "challenges created so far" count.
pub const CREATED_CHALLENGES: Map<(&str, &str), bool> = Map::new("created_idx");

/// (score, user_id) -> true
/// Leaderboard index, kept in step with every saved `UserRecord`.
pub const SCORE_INDEX: Map<(u64, &str), bool> = Map::new("score_idx");

/// badge_id -> BadgeDefinition
pub const BADGES: Map<&str, BadgeDefinition> = Map::new("badges");
