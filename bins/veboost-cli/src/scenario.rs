//! JSON scenario format and replay.
//!
//! A scenario seeds locks and operator approvals, then runs a list of
//! steps against a fresh [`BoostService`]. Each step may move the manual
//! clock forward with `at`. Accounts are referred to by label and mapped
//! to ids with [`AccountId::from_label`].

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use veboost_core::error::BoostError;
use veboost_core::types::{AccountId, TokenId};
use veboost_ledger::{BoostConfig, BoostService, ManualClock, MemoryEscrow, MemoryRegistry};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Clock reading before the first step.
    pub start_time: u64,
    /// Service limits; `VEBOOST_*` environment variables when absent.
    #[serde(default)]
    pub config: Option<BoostConfig>,
    #[serde(default)]
    pub locks: Vec<Lock>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lock {
    pub account: String,
    pub balance: u64,
    pub expiry: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Approval {
    pub owner: String,
    pub operator: String,
    #[serde(default = "approved_default")]
    pub approved: bool,
}

fn approved_default() -> bool {
    true
}

/// A token named by its delegator's label and slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRef {
    pub delegator: String,
    pub slot: u64,
}

/// One scenario step: an optional clock move plus an action, written as a
/// single flat object.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Step {
    /// Absolute time to move the clock to before the action.
    pub at: Option<u64>,
    pub action: Action,
}

impl TryFrom<Map<String, Value>> for Step {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let at = match fields.remove("at") {
            None | Some(Value::Null) => None,
            Some(at) => Some(serde_json::from_value(at)?),
        };
        // the remaining keys belong to the action alone, so unknown ones fail
        let action = serde_json::from_value(Value::Object(fields))?;
        Ok(Self { at, action })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Action {
    Create {
        delegator: String,
        receiver: String,
        percentage_bps: u64,
        expire_time: u64,
        cancel_time: u64,
        /// Defaults to the delegator.
        #[serde(default)]
        caller: Option<String>,
    },
    Extend {
        token: TokenRef,
        percentage_bps: u64,
        expire_time: u64,
        cancel_time: u64,
        /// Defaults to the token's delegator.
        #[serde(default)]
        caller: Option<String>,
    },
    SetLock(Lock),
    Approve(Approval),
    TokenBoost { token: TokenRef },
    TokenExpiry { token: TokenRef },
    TokenCancelTime { token: TokenRef },
    DelegatedBoost { account: String },
    ReceivedBoost { account: String },
    AdjustedBalance { account: String },
    OutstandingDebt { account: String },
    TokensOf { account: String },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Extend { .. } => "extend",
            Self::SetLock(_) => "set_lock",
            Self::Approve(_) => "approve",
            Self::TokenBoost { .. } => "token_boost",
            Self::TokenExpiry { .. } => "token_expiry",
            Self::TokenCancelTime { .. } => "token_cancel_time",
            Self::DelegatedBoost { .. } => "delegated_boost",
            Self::ReceivedBoost { .. } => "received_boost",
            Self::AdjustedBalance { .. } => "adjusted_balance",
            Self::OutstandingDebt { .. } => "outstanding_debt",
            Self::TokensOf { .. } => "tokens_of",
        }
    }
}

/// Successful result of a step.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Token(String),
    Done,
    Value(i128),
    Time(u64),
    Amount(u64),
    Debt(u128),
    Tokens(Vec<String>),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Rejection {
    pub kind: &'static str,
    pub message: String,
}

/// One output line.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Outcome {
    pub step: usize,
    pub at: u64,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Rejection>,
}

/// Live collaborators plus the label book used to render ids.
struct World {
    escrow: Arc<MemoryEscrow>,
    registry: Arc<MemoryRegistry>,
    clock: Arc<ManualClock>,
    service: BoostService,
    labels: HashMap<AccountId, String>,
}

impl World {
    fn account(&mut self, label: &str) -> AccountId {
        let id = AccountId::from_label(label);
        self.labels.entry(id).or_insert_with(|| label.to_string());
        id
    }

    fn token(&mut self, token: &TokenRef) -> TokenId {
        TokenId::new(self.account(&token.delegator), token.slot)
    }

    fn render(&self, token: &TokenId) -> String {
        match self.labels.get(&token.delegator) {
            Some(label) => format!("{label}:{}", token.slot),
            None => token.to_string(),
        }
    }

    fn apply_lock(&mut self, lock: &Lock) {
        let account = self.account(&lock.account);
        self.escrow.set_lock(&account, lock.balance, lock.expiry);
    }

    fn apply_approval(&mut self, approval: &Approval) {
        let owner = self.account(&approval.owner);
        let operator = self.account(&approval.operator);
        self.registry
            .set_approval_for_all(&owner, &operator, approval.approved);
    }

    fn perform(&mut self, action: &Action) -> Result<Reply, BoostError> {
        match action {
            Action::Create {
                delegator,
                receiver,
                percentage_bps,
                expire_time,
                cancel_time,
                caller,
            } => {
                let delegator_id = self.account(delegator);
                let receiver_id = self.account(receiver);
                let caller_id = self.account(caller.as_deref().unwrap_or(delegator));
                let token = self.service.create_boost(
                    &delegator_id,
                    &receiver_id,
                    *percentage_bps,
                    *cancel_time,
                    *expire_time,
                    &caller_id,
                )?;
                Ok(Reply::Token(self.render(&token)))
            }
            Action::Extend {
                token,
                percentage_bps,
                expire_time,
                cancel_time,
                caller,
            } => {
                let id = self.token(token);
                let caller_id = self.account(caller.as_deref().unwrap_or(&token.delegator));
                self.service
                    .extend_boost(&id, *percentage_bps, *expire_time, *cancel_time, &caller_id)?;
                Ok(Reply::Done)
            }
            Action::SetLock(lock) => {
                self.apply_lock(lock);
                Ok(Reply::Done)
            }
            Action::Approve(approval) => {
                self.apply_approval(approval);
                Ok(Reply::Done)
            }
            Action::TokenBoost { token } => {
                let id = self.token(token);
                self.service.token_boost(&id).map(Reply::Value)
            }
            Action::TokenExpiry { token } => {
                let id = self.token(token);
                self.service.token_expiry(&id).map(Reply::Time)
            }
            Action::TokenCancelTime { token } => {
                let id = self.token(token);
                self.service.token_cancel_time(&id).map(Reply::Time)
            }
            Action::DelegatedBoost { account } => {
                let id = self.account(account);
                self.service.delegated_boost(&id).map(Reply::Amount)
            }
            Action::ReceivedBoost { account } => {
                let id = self.account(account);
                self.service.received_boost(&id).map(Reply::Amount)
            }
            Action::AdjustedBalance { account } => {
                let id = self.account(account);
                self.service.adjusted_balance_of(&id).map(Reply::Amount)
            }
            Action::OutstandingDebt { account } => {
                let id = self.account(account);
                self.service.outstanding_debt(&id).map(Reply::Debt)
            }
            Action::TokensOf { account } => {
                let id = self.account(account);
                let tokens = self.service.tokens_of(&id);
                Ok(Reply::Tokens(tokens.iter().map(|t| self.render(t)).collect()))
            }
        }
    }
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Run every step, writing each [`Outcome`] to `out` as a JSON line.
    ///
    /// Rejected operations are reported in the output and do not stop the
    /// run. Malformed scenarios (a step moving the clock backwards, an
    /// invalid config) abort with an error.
    pub fn execute(&self, out: &mut impl Write) -> Result<Vec<Outcome>> {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => BoostConfig::from_env().context("loading config from environment")?,
        };

        let escrow = Arc::new(MemoryEscrow::new());
        let registry = Arc::new(MemoryRegistry::new());
        let clock = Arc::new(ManualClock::new(self.start_time));
        let service = BoostService::new(escrow.clone(), registry.clone(), clock.clone(), config)
            .context("invalid boost config")?;

        let mut world = World {
            escrow,
            registry,
            clock,
            service,
            labels: HashMap::new(),
        };
        for lock in &self.locks {
            world.apply_lock(lock);
        }
        for approval in &self.approvals {
            world.apply_approval(approval);
        }

        info!(
            steps = self.steps.len(),
            locks = self.locks.len(),
            start_time = self.start_time,
            "running scenario"
        );

        let mut now = self.start_time;
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(at) = step.at {
                if at < now {
                    bail!("step {index} moves the clock back from {now} to {at}");
                }
                now = at;
                world.clock.set(now);
            }

            let op = step.action.name();
            let outcome = match world.perform(&step.action) {
                Ok(reply) => Outcome {
                    step: index,
                    at: now,
                    op,
                    result: Some(reply),
                    error: None,
                },
                Err(e) => {
                    debug!(step = index, op, kind = e.kind(), "step rejected");
                    Outcome {
                        step: index,
                        at: now,
                        op,
                        result: None,
                        error: Some(Rejection {
                            kind: e.kind(),
                            message: e.to_string(),
                        }),
                    }
                }
            };

            let line = serde_json::to_string(&outcome)
                .with_context(|| format!("encoding outcome of step {index}"))?;
            writeln!(out, "{line}").context("writing outcome")?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000;
    const DAY: u64 = 86_400;
    const WEEK: u64 = 7 * DAY;

    fn write_scenario(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn basic() -> String {
        format!(
            r#"{{
                "start_time": {T0},
                "config": {{ "min_duration_secs": {DAY} }},
                "locks": [{{ "account": "alice", "balance": 100000, "expiry": {lock} }}],
                "steps": [
                    {{ "op": "create", "delegator": "alice", "receiver": "bob",
                       "percentage_bps": 5000, "expire_time": {expire}, "cancel_time": {cancel} }},
                    {{ "op": "token_boost", "token": {{ "delegator": "alice", "slot": 0 }} }},
                    {{ "at": {half}, "op": "adjusted_balance", "account": "bob" }},
                    {{ "at": {debt}, "op": "create", "delegator": "alice", "receiver": "charlie",
                       "percentage_bps": 1000, "expire_time": {later}, "cancel_time": {later_cancel} }},
                    {{ "op": "extend", "token": {{ "delegator": "alice", "slot": 0 }},
                       "percentage_bps": 5000, "expire_time": {later}, "cancel_time": {later_cancel},
                       "caller": "bob" }},
                    {{ "op": "tokens_of", "account": "alice" }}
                ]
            }}"#,
            lock = T0 + 52 * WEEK,
            expire = T0 + 2 * WEEK,
            cancel = T0 + 4 * WEEK,
            half = T0 + WEEK,
            debt = T0 + 3 * WEEK,
            later = T0 + 6 * WEEK,
            later_cancel = T0 + 8 * WEEK,
        )
    }

    #[test]
    fn replays_basic_scenario() {
        let file = write_scenario(&basic());
        let scenario = Scenario::load(file.path()).unwrap();
        let mut out = Vec::new();
        let outcomes = scenario.execute(&mut out).unwrap();

        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes[0].result, Some(Reply::Token("alice:0".into())));
        assert_eq!(outcomes[1].result, Some(Reply::Value(50_000)));
        assert_eq!(outcomes[2].at, T0 + WEEK);
        assert_eq!(outcomes[2].result, Some(Reply::Amount(25_000)));

        // alice is in debt at T0 + 3W: new boosts are refused
        let rejected = outcomes[3].error.as_ref().unwrap();
        assert_eq!(rejected.kind, "outstanding_negative_boost");
        // bob is the receiver, not an operator
        assert_eq!(outcomes[4].error.as_ref().unwrap().kind, "not_authorized");
        assert_eq!(outcomes[5].result, Some(Reply::Tokens(vec!["alice:0".into()])));

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["op"], "create");
        assert_eq!(first["result"]["token"], "alice:0");
        assert!(first.get("error").is_none());
    }

    #[test]
    fn approvals_enable_operator_extends() {
        let body = basic().replace(
            r#""steps": ["#,
            r#""approvals": [{ "owner": "alice", "operator": "bob" }], "steps": ["#,
        );
        let file = write_scenario(&body);
        let outcomes = Scenario::load(file.path())
            .unwrap()
            .execute(&mut std::io::sink())
            .unwrap();
        // debt on slot 0 itself does not block its own extension
        assert_eq!(outcomes[4].result, Some(Reply::Done));
    }

    #[test]
    fn clock_cannot_move_backwards() {
        let body = format!(
            r#"{{ "start_time": {T0}, "config": {{}}, "steps": [
                {{ "at": {back}, "op": "delegated_boost", "account": "alice" }}
            ] }}"#,
            back = T0 - 1
        );
        let file = write_scenario(&body);
        let err = Scenario::load(file.path())
            .unwrap()
            .execute(&mut std::io::sink())
            .unwrap_err();
        assert!(err.to_string().contains("moves the clock back"));
    }

    #[test]
    fn invalid_config_is_fatal() {
        let body = format!(
            r#"{{ "start_time": {T0}, "config": {{ "min_duration_secs": 0 }}, "steps": [] }}"#
        );
        let file = write_scenario(&body);
        let result = Scenario::load(file.path()).unwrap().execute(&mut std::io::sink());
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let file = write_scenario(r#"{ "start_time": 0, "steps": [], "bogus": 1 }"#);
        assert!(Scenario::load(file.path()).is_err());
    }

    #[test]
    fn misspelled_step_field_is_rejected() {
        let body = format!(
            r#"{{ "start_time": {T0}, "config": {{}}, "steps": [
                {{ "op": "create", "delegator": "alice", "receiver": "bob",
                   "percentage_bps": 5000, "expire_time": {expire}, "cancel_time": {cancel},
                   "caler": "charlie" }}
            ] }}"#,
            expire = T0 + WEEK,
            cancel = T0 + 2 * WEEK,
        );
        let file = write_scenario(&body);
        let err = Scenario::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("caler"));

        // the same step with the key spelled right parses, `at` included
        let fixed = body.replace("\"caler\"", "\"at\": 0, \"caller\"");
        let file = write_scenario(&fixed);
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.steps[0].at, Some(0));
        assert!(matches!(
            &scenario.steps[0].action,
            Action::Create { caller: Some(c), .. } if c == "charlie"
        ));
    }

    #[test]
    fn unknown_token_is_reported_not_fatal() {
        let body = format!(
            r#"{{ "start_time": {T0}, "config": {{}}, "steps": [
                {{ "op": "token_expiry", "token": {{ "delegator": "nobody", "slot": 3 }} }}
            ] }}"#
        );
        let file = write_scenario(&body);
        let outcomes = Scenario::load(file.path())
            .unwrap()
            .execute(&mut std::io::sink())
            .unwrap();
        assert_eq!(outcomes[0].error.as_ref().unwrap().kind, "unknown_token");
    }
}
