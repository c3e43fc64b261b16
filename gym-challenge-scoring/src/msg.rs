use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{BadgeDefinition, ScoringTable};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    pub operator: String,
    /// Defaults to easy 20 / medium 40 / hard 70 / fallback 20 / invite +10
    pub scoring: Option<ScoringTable>,
    /// Initial badge catalog
    pub badges: Vec<BadgeDefinition>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a user with an empty history (operator only)
    RegisterUser { user_id: String },
    /// Record a new challenge and award creation badges to its creator (operator only)
    CreateChallenge {
        challenge_id: String,
        creator: String,
        difficulty: Option<String>,
        invitees: Vec<String>,
    },
    /// Mark a challenge completed and award points (operator only).
    /// Repeating it is a successful no-op.
    CompleteChallenge {
        user_id: String,
        challenge_id: String,
    },
    /// Delete a challenge. Completion histories keep the id (owner only)
    RemoveChallenge { challenge_id: String },
    /// Delete a user and every challenge they created (owner only)
    RemoveUser { user_id: String },
    /// Add or replace a badge definition (owner only)
    UpsertBadge { badge: BadgeDefinition },
    /// Remove a badge definition; existing grants are kept (owner only)
    RemoveBadge { badge_id: String },
    /// Replace the scoring table (owner only)
    UpdateScoring { scoring: ScoringTable },
    /// Rebuild scores from completion history, in user id order.
    /// `limit: None` processes every remaining user (owner only)
    RecalculateScores {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Pause the contract (owner only)
    Pause {},
    /// Unpause the contract (owner only)
    Unpause {},
    ProposeOwner { new_owner: String },
    AcceptOwner {},
    CancelOwnerTransfer {},
    ProposeOperator { new_operator: String },
    AcceptOperator {},
    CancelOperatorTransfer {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(crate::state::Config)]
    Config {},
    #[returns(crate::state::UserRecord)]
    User { user_id: String },
    #[returns(crate::state::ChallengeRecord)]
    Challenge { challenge_id: String },
    /// Number of challenges a user has created and that still exist
    #[returns(CreatedCountResponse)]
    CreatedChallengeCount { user_id: String },
    #[returns(BadgeCheckResponse)]
    HasBadge { user_id: String, badge_id: String },
    /// Badge catalog, paged by id
    #[returns(BadgesResponse)]
    Badges {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Users by score, highest first
    #[returns(LeaderboardResponse)]
    Leaderboard { limit: Option<u32> },
    /// What completing the challenge now would award, without recording it
    #[returns(crate::engine::CompletionOutcome)]
    PreviewCompletion {
        user_id: String,
        challenge_id: String,
    },
    #[returns(Option<crate::state::PendingOwnerTransfer>)]
    PendingOwner {},
    #[returns(Option<crate::state::PendingOperatorTransfer>)]
    PendingOperator {},
}

#[cw_serde]
pub struct CreatedCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct BadgeCheckResponse {
    pub has_badge: bool,
}

#[cw_serde]
pub struct BadgesResponse {
    pub badges: Vec<BadgeDefinition>,
}

#[cw_serde]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: u64,
    pub rank: u32,
}

#[cw_serde]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

/// Response data of `CreateChallenge`
#[cw_serde]
pub struct CreateChallengeResponse {
    pub challenge_id: String,
    pub badges_granted: Vec<String>,
}

/// Response data of `RecalculateScores`
#[cw_serde]
pub struct RecalculateResponse {
    pub updated: u32,
    /// Last user processed; pass as `start_after` to continue
    pub last_user_id: Option<String>,
}

#[cw_serde]
pub struct MigrateMsg {
    /// Rebuild every score from completion history after migrating
    pub recalculate_scores: bool,
}
