use cosmwasm_std::Addr;
use cw_multi_test::{App, ContractWrapper, Executor};

use gym_challenge_scoring::engine::{CompletionOutcome, FIRST_CHALLENGE_CREATOR};
use gym_challenge_scoring::entry::{execute, instantiate, migrate, query};
use gym_challenge_scoring::msg::*;
use gym_challenge_scoring::state::{BadgeDefinition, UserRecord};

struct Suite {
    app: App,
    contract: Addr,
    owner: Addr,
    operator: Addr,
}

impl Suite {
    fn new() -> Self {
        let mut app = App::default();
        let owner = app.api().addr_make("owner");
        let operator = app.api().addr_make("operator");

        let code = ContractWrapper::new(execute, instantiate, query).with_migrate(migrate);
        let code_id = app.store_code(Box::new(code));

        let contract = app
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg {
                    owner: owner.to_string(),
                    operator: operator.to_string(),
                    scoring: None,
                    badges: vec![BadgeDefinition {
                        id: FIRST_CHALLENGE_CREATOR.to_string(),
                        name: "First challenge".to_string(),
                        description: "Created a first challenge".to_string(),
                        image: String::new(),
                    }],
                },
                &[],
                "gym-challenge-scoring",
                Some(owner.to_string()),
            )
            .unwrap();

        Suite {
            app,
            contract,
            owner,
            operator,
        }
    }

    fn operator_exec(&mut self, msg: ExecuteMsg) -> anyhow::Result<()> {
        self.app
            .execute_contract(self.operator.clone(), self.contract.clone(), &msg, &[])
            .map(|_| ())
    }

    fn user(&self, user_id: &str) -> UserRecord {
        self.app
            .wrap()
            .query_wasm_smart(
                self.contract.clone(),
                &QueryMsg::User {
                    user_id: user_id.to_string(),
                },
            )
            .unwrap()
    }
}

#[test]
fn completion_flow_through_entry_points() {
    let mut suite = Suite::new();
    for user_id in ["alice", "carol"] {
        suite
            .operator_exec(ExecuteMsg::RegisterUser {
                user_id: user_id.to_string(),
            })
            .unwrap();
    }
    suite
        .operator_exec(ExecuteMsg::CreateChallenge {
            challenge_id: "squat-30".to_string(),
            creator: "carol".to_string(),
            difficulty: Some("hard".to_string()),
            invitees: vec!["alice".to_string()],
        })
        .unwrap();
    assert!(suite.user("carol").badges.contains(FIRST_CHALLENGE_CREATOR));

    let complete = ExecuteMsg::CompleteChallenge {
        user_id: "alice".to_string(),
        challenge_id: "squat-30".to_string(),
    };
    // A retried request must succeed without awarding again
    suite.operator_exec(complete.clone()).unwrap();
    suite.operator_exec(complete).unwrap();
    assert_eq!(suite.user("alice").score, 80);

    let preview: CompletionOutcome = suite
        .app
        .wrap()
        .query_wasm_smart(
            suite.contract.clone(),
            &QueryMsg::PreviewCompletion {
                user_id: "alice".to_string(),
                challenge_id: "squat-30".to_string(),
            },
        )
        .unwrap();
    assert!(preview.already_completed);
    assert_eq!(preview.new_score, 80);
}

#[test]
fn admin_messages_require_owner() {
    let mut suite = Suite::new();
    let recalc = ExecuteMsg::RecalculateScores {
        start_after: None,
        limit: None,
    };

    assert!(suite.operator_exec(recalc.clone()).is_err());
    suite
        .app
        .execute_contract(suite.owner.clone(), suite.contract.clone(), &recalc, &[])
        .unwrap();
}
