use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: only {role} can perform this action")]
    Unauthorized { role: String },

    #[error("contract is paused")]
    Paused,

    #[error("contract is not paused")]
    NotPaused,

    #[error("invalid {kind} id: {reason}")]
    InvalidId { kind: String, reason: String },

    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("user {user_id} already registered")]
    UserAlreadyExists { user_id: String },

    #[error("challenge not found: {challenge_id}")]
    ChallengeNotFound { challenge_id: String },

    #[error("challenge {challenge_id} already exists")]
    ChallengeAlreadyExists { challenge_id: String },

    #[error("badge not found: {badge_id}")]
    BadgeNotFound { badge_id: String },

    #[error("no owner transfer pending")]
    NoOwnerTransferPending,

    #[error("caller is not the pending owner")]
    NotPendingOwner,

    #[error("owner transfer already pending")]
    OwnerTransferAlreadyPending,

    #[error("no operator transfer pending")]
    NoOperatorTransferPending,

    #[error("caller is not the pending operator")]
    NotPendingOperator,

    #[error("operator transfer already pending")]
    OperatorTransferAlreadyPending,

    #[error("unexpected funds sent with this message")]
    UnexpectedFunds,
}
