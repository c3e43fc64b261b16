pub mod contract;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod msg;
pub mod reconcile;
pub mod state;

// Compiled even with "library" so cw-multi-test can wrap the entry points.
pub mod entry {
    use super::*;
    #[cfg(not(feature = "library"))]
    use cosmwasm_std::entry_point;
    use cosmwasm_std::{Binary, Deps, DepsMut, Env, MessageInfo, Response};
    use msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};

    #[cfg_attr(not(feature = "library"), entry_point)]
    pub fn instantiate(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msg: InstantiateMsg,
    ) -> Result<Response, error::ContractError> {
        contract::instantiate(deps, env, info, msg)
    }

    #[cfg_attr(not(feature = "library"), entry_point)]
    pub fn execute(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> Result<Response, error::ContractError> {
        match msg {
            ExecuteMsg::RegisterUser { user_id } => {
                contract::execute_register_user(deps, env, info, user_id)
            }
            ExecuteMsg::CreateChallenge {
                challenge_id,
                creator,
                difficulty,
                invitees,
            } => contract::execute_create_challenge(
                deps,
                env,
                info,
                challenge_id,
                creator,
                difficulty,
                invitees,
            ),
            ExecuteMsg::CompleteChallenge {
                user_id,
                challenge_id,
            } => contract::execute_complete_challenge(deps, env, info, user_id, challenge_id),
            ExecuteMsg::RemoveChallenge { challenge_id } => {
                contract::execute_remove_challenge(deps, env, info, challenge_id)
            }
            ExecuteMsg::RemoveUser { user_id } => {
                contract::execute_remove_user(deps, env, info, user_id)
            }
            ExecuteMsg::UpsertBadge { badge } => {
                contract::execute_upsert_badge(deps, env, info, badge)
            }
            ExecuteMsg::RemoveBadge { badge_id } => {
                contract::execute_remove_badge(deps, env, info, badge_id)
            }
            ExecuteMsg::UpdateScoring { scoring } => {
                contract::execute_update_scoring(deps, env, info, scoring)
            }
            ExecuteMsg::RecalculateScores { start_after, limit } => {
                contract::execute_recalculate_scores(deps, env, info, start_after, limit)
            }
            ExecuteMsg::Pause {} => contract::execute_pause(deps, env, info),
            ExecuteMsg::Unpause {} => contract::execute_unpause(deps, env, info),
            ExecuteMsg::ProposeOwner { new_owner } => {
                contract::execute_propose_owner(deps, env, info, new_owner)
            }
            ExecuteMsg::AcceptOwner {} => contract::execute_accept_owner(deps, env, info),
            ExecuteMsg::CancelOwnerTransfer {} => {
                contract::execute_cancel_owner_transfer(deps, env, info)
            }
            ExecuteMsg::ProposeOperator { new_operator } => {
                contract::execute_propose_operator(deps, env, info, new_operator)
            }
            ExecuteMsg::AcceptOperator {} => contract::execute_accept_operator(deps, env, info),
            ExecuteMsg::CancelOperatorTransfer {} => {
                contract::execute_cancel_operator_transfer(deps, env, info)
            }
        }
    }

    #[cfg_attr(not(feature = "library"), entry_point)]
    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> cosmwasm_std::StdResult<Binary> {
        match msg {
            QueryMsg::Config {} => contract::query_config(deps),
            QueryMsg::User { user_id } => contract::query_user(deps, user_id),
            QueryMsg::Challenge { challenge_id } => contract::query_challenge(deps, challenge_id),
            QueryMsg::CreatedChallengeCount { user_id } => {
                contract::query_created_challenge_count(deps, user_id)
            }
            QueryMsg::HasBadge { user_id, badge_id } => {
                contract::query_has_badge(deps, user_id, badge_id)
            }
            QueryMsg::Badges { start_after, limit } => {
                contract::query_badges(deps, start_after, limit)
            }
            QueryMsg::Leaderboard { limit } => contract::query_leaderboard(deps, limit),
            QueryMsg::PreviewCompletion {
                user_id,
                challenge_id,
            } => contract::query_preview_completion(deps, user_id, challenge_id),
            QueryMsg::PendingOwner {} => contract::query_pending_owner(deps),
            QueryMsg::PendingOperator {} => contract::query_pending_operator(deps),
        }
    }

    #[cfg_attr(not(feature = "library"), entry_point)]
    pub fn migrate(
        deps: DepsMut,
        env: Env,
        msg: MigrateMsg,
    ) -> Result<Response, error::ContractError> {
        contract::migrate(deps, env, msg)
    }
}
