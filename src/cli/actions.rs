//! Leaf actions
//!
//! Every menu entry that does work instead of opening a submenu is an
//! [`Action`]. Actions run against a [`Session`] and return to the menu that
//! invoked them; bridge failures are turned into notices by [`catch_at_leaf`].

use serde_json::Value;
use thiserror::Error;

use crate::bridge::{commands, CallError, CommandArgs, Data, TransportError};
use crate::report::VoteTally;

use super::onboarding::{onboarding_wizard, ONBOARDING_TITLE};
use super::prompts::{
    fraction, identifier, non_empty, positive_number, FormField, FormValues, PromptError,
    ValidationError,
};
use super::session::Session;
use super::surface::View;
use super::wizard::describe_outcome;

/// Failure of a leaf action
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

pub type ActionResult = Result<(), ActionError>;

/// Wrap a leaf action so a bridge failure is shown to the operator instead
/// of leaving the menu loop. Only a [`PromptError`] passes through.
pub fn catch_at_leaf<F>(action: F) -> impl FnOnce(&mut Session<'_>) -> Result<(), PromptError>
where
    F: FnOnce(&mut Session<'_>) -> ActionResult,
{
    move |session: &mut Session<'_>| match action(session) {
        Ok(()) => Ok(()),
        Err(ActionError::Call(err)) => {
            tracing::warn!(error = %err, transport = err.is_transport(), "leaf action failed");
            session.show(View::failure(err.to_string()));
            Ok(())
        }
        Err(ActionError::Prompt(err)) => Err(err),
    }
}

/// Every leaf action the console offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAgents,
    InspectAgent,
    TrainSkill,
    OnboardAgent,
    ListSwarms,
    CreateSwarm,
    ViewConsensus,
    CastVote,
    ListWallets,
    WalletBalance,
    CreateWallet,
    ExecuteTrade,
    SystemMetrics,
    AgentMetrics,
    BackendHealth,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::ListAgents => "List agents",
            Action::InspectAgent => "Inspect agent",
            Action::TrainSkill => "Train agent skill",
            Action::OnboardAgent => "Onboard new agent",
            Action::ListSwarms => "List swarms",
            Action::CreateSwarm => "Create swarm",
            Action::ViewConsensus => "View consensus",
            Action::CastVote => "Cast vote",
            Action::ListWallets => "List wallets",
            Action::WalletBalance => "Check balance",
            Action::CreateWallet => "Create wallet",
            Action::ExecuteTrade => "Execute trade",
            Action::SystemMetrics => "System metrics",
            Action::AgentMetrics => "Agent metrics",
            Action::BackendHealth => "Backend health",
        }
    }

    pub fn run(self, session: &mut Session<'_>) -> ActionResult {
        match self {
            Action::ListAgents => list(session, commands::AGENTS_LIST, "agents", "Agents"),
            Action::InspectAgent => inspect_agent(session),
            Action::TrainSkill => train_skill(session),
            Action::OnboardAgent => onboard_agent(session),
            Action::ListSwarms => list(session, commands::SWARM_LIST, "swarms", "Swarms"),
            Action::CreateSwarm => create_swarm(session),
            Action::ViewConsensus => view_consensus(session),
            Action::CastVote => cast_vote(session),
            Action::ListWallets => list(session, commands::WALLET_LIST, "wallets", "Wallets"),
            Action::WalletBalance => wallet_balance(session),
            Action::CreateWallet => create_wallet(session),
            Action::ExecuteTrade => execute_trade(session),
            Action::SystemMetrics => detail(session, commands::METRICS_SYSTEM, "System metrics"),
            Action::AgentMetrics => {
                list(session, commands::METRICS_AGENTS, "agents", "Agent metrics")
            }
            Action::BackendHealth => backend_health(session),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// The array of records under `key`
pub fn records(data: &Data, key: &str, command: &str) -> Result<Vec<Data>, CallError> {
    let items = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| CallError::missing_field(command, key))?;
    Ok(items
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect())
}

/// A nested record under `key`, or the whole payload when there is none
fn record(data: Data, key: &str) -> Data {
    if let Some(Value::Object(inner)) = data.get(key) {
        return inner.clone();
    }
    data
}

fn id_of(data: &Data) -> Option<&str> {
    data.get("id").and_then(Value::as_str)
}

fn list(session: &mut Session<'_>, command: &str, key: &str, title: &str) -> ActionResult {
    let data = session.call(command, CommandArgs::none())?;
    let rows = records(&data, key, command)?;
    if rows.is_empty() {
        session.show(View::info(format!("No {} found", title.to_lowercase())));
    } else {
        session.show(View::Table {
            title: title.to_string(),
            rows,
        });
    }
    Ok(())
}

fn detail(session: &mut Session<'_>, command: &str, title: &str) -> ActionResult {
    let data = session.call(command, CommandArgs::none())?;
    session.show(View::Detail {
        title: title.to_string(),
        data,
    });
    Ok(())
}

// ============================================================================
// Agents
// ============================================================================

fn inspect_agent(session: &mut Session<'_>) -> ActionResult {
    let id = session.prompts.text("Agent id", None, &identifier)?;
    let data = session.call(commands::AGENTS_GET, CommandArgs::positional([id.clone()]))?;
    session.show(View::Detail {
        title: format!("Agent {}", id),
        data: record(data, "agent"),
    });
    Ok(())
}

fn train_skill(session: &mut Session<'_>) -> ActionResult {
    let values = session.prompts.form(&[
        FormField::text("agent_id", "Agent id", identifier),
        FormField::text("skill", "Skill", non_empty),
    ])?;
    let data = session.call(
        commands::AGENTS_TRAIN_SKILL,
        CommandArgs::Keyed(values.into_map()),
    )?;
    session.show(View::success("Skill training started"));
    if !data.is_empty() {
        session.show(View::Detail {
            title: "Training".to_string(),
            data,
        });
    }
    Ok(())
}

fn onboard_agent(session: &mut Session<'_>) -> ActionResult {
    let wizard = onboarding_wizard();
    let outcome = wizard.run(session)?;
    for view in describe_outcome(ONBOARDING_TITLE, &outcome) {
        session.show(view);
    }
    Ok(())
}

// ============================================================================
// Swarms
// ============================================================================

fn create_swarm(session: &mut Session<'_>) -> ActionResult {
    let values = session.prompts.form(&[
        FormField::text("name", "Swarm name", identifier),
        FormField::text("strategy", "Strategy", non_empty).with_default("momentum"),
        FormField::number("threshold", "Consensus threshold (0-1)", fraction)
            .with_default("0.66"),
    ])?;
    let data = session.call(commands::SWARM_CREATE, CommandArgs::Keyed(values.into_map()))?;
    let swarm = record(data, "swarm");
    match id_of(&swarm) {
        Some(id) => session.show(View::success(format!("Swarm created: {}", id))),
        None => session.show(View::success("Swarm created")),
    }
    Ok(())
}

fn view_consensus(session: &mut Session<'_>) -> ActionResult {
    let id = session.prompts.text("Swarm id", None, &identifier)?;
    let data = session.call(
        commands::SWARM_CONSENSUS,
        CommandArgs::positional([id.clone()]),
    )?;
    let tally = VoteTally::from_data(&data, session.bar_width).map_err(|reason| {
        CallError::Transport(TransportError::Malformed(format!(
            "`{}` response: {}",
            commands::SWARM_CONSENSUS,
            reason
        )))
    })?;
    session.show(View::Consensus {
        title: format!("Consensus for {}", id),
        tally,
    });
    Ok(())
}

fn cast_vote(session: &mut Session<'_>) -> ActionResult {
    let values = session.prompts.form(&[
        FormField::text("swarm_id", "Swarm id", identifier),
        FormField::text("agent_id", "Voting agent id", identifier),
    ])?;
    let choices = ["Yes".to_string(), "No".to_string()];
    let Some(choice) = session.prompts.select("Vote", &choices, 0)? else {
        session.show(View::info("Vote cancelled"));
        return Ok(());
    };

    let mut args = values.into_map();
    args.insert("vote".to_string(), Value::Bool(choice == 0));
    session.call(commands::SWARM_VOTE, CommandArgs::Keyed(args))?;
    session.show(View::success("Vote recorded"));
    Ok(())
}

// ============================================================================
// Wallets and Trades
// ============================================================================

fn wallet_balance(session: &mut Session<'_>) -> ActionResult {
    let id = session.prompts.text("Wallet id", None, &identifier)?;
    let data = session.call(commands::WALLET_BALANCE, CommandArgs::positional([id.clone()]))?;
    session.show(View::Detail {
        title: format!("Balance of {}", id),
        data,
    });
    Ok(())
}

fn create_wallet(session: &mut Session<'_>) -> ActionResult {
    let values = session.prompts.form(&[
        FormField::text("owner", "Owner id", identifier),
        FormField::text("network", "Network", identifier).with_default("solana"),
    ])?;
    let data = session.call(commands::WALLET_CREATE, CommandArgs::Keyed(values.into_map()))?;
    let wallet = record(data, "wallet");
    match id_of(&wallet) {
        Some(id) => session.show(View::success(format!("Wallet created: {}", id))),
        None => session.show(View::success("Wallet created")),
    }
    Ok(())
}

fn trade_fields() -> [FormField; 3] {
    [
        FormField::text("pair", "Pair", non_empty).with_default("SOL/USDC"),
        FormField::text("side", "Side (buy/sell)", trade_side).with_default("buy"),
        FormField::number("amount", "Amount", positive_number),
    ]
}

/// Prompt for a trade order; shared with the onboarding wizard's tail action.
///
/// The side is sent in lowercase whatever the operator typed.
pub fn trade_order(session: &mut Session<'_>) -> Result<FormValues, PromptError> {
    let mut values = session.prompts.form(&trade_fields())?;
    let side = values.get_str("side").map(str::to_ascii_lowercase);
    if let Some(side) = side {
        values.insert("side", Value::String(side));
    }
    Ok(values)
}

fn trade_side(value: &str) -> Result<(), ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "buy" | "sell" => Ok(()),
        _ => Err(ValidationError::new(
            "Side must be 'buy' or 'sell'",
        )),
    }
}

fn execute_trade(session: &mut Session<'_>) -> ActionResult {
    let wallet = session.prompts.text("Wallet id", None, &identifier)?;
    let mut values = trade_order(session)?;
    values.insert("wallet_id", Value::String(wallet));

    let summary = format!(
        "Execute {} {} {}?",
        values.get_str("side").unwrap_or("buy"),
        values.get("amount").map(Value::to_string).unwrap_or_default(),
        values.get_str("pair").unwrap_or_default(),
    );
    if !session.prompts.confirm(&summary, false)? {
        session.show(View::info("Trade cancelled"));
        return Ok(());
    }

    let data = session.call(commands::TRADE_EXECUTE, CommandArgs::Keyed(values.into_map()))?;
    session.show(View::success("Trade submitted"));
    session.show(View::Detail {
        title: "Trade".to_string(),
        data: record(data, "trade"),
    });
    Ok(())
}

fn backend_health(session: &mut Session<'_>) -> ActionResult {
    let data = session.call(commands::SYSTEM_HEALTH, CommandArgs::none())?;
    let status = data
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("ok")
        .to_string();
    session.show(View::success(format!("Backend is reachable ({})", status)));
    session.show(View::Detail {
        title: "Backend health".to_string(),
        data,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Data {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_records_extracts_objects() {
        let payload = data(json!({"agents": [{"id": "a1"}, {"id": "a2"}, 7]}));
        let rows = records(&payload, "agents", "agents.list").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_records_missing_key_is_transport_error() {
        let payload = data(json!({"items": []}));
        let err = records(&payload, "agents", "agents.list").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("`agents`"));
    }

    #[test]
    fn test_record_prefers_nested_object() {
        let nested = data(json!({"wallet": {"id": "w1"}, "note": "x"}));
        assert_eq!(id_of(&record(nested, "wallet")), Some("w1"));

        let flat = data(json!({"id": "w2"}));
        assert_eq!(id_of(&record(flat, "wallet")), Some("w2"));
    }

    #[test]
    fn test_trade_side_validator() {
        assert!(trade_side("buy").is_ok());
        assert!(trade_side(" SELL ").is_ok());
        assert!(trade_side("hold").is_err());
    }

    #[test]
    fn test_labels_are_unique() {
        let all = [
            Action::ListAgents,
            Action::InspectAgent,
            Action::TrainSkill,
            Action::OnboardAgent,
            Action::ListSwarms,
            Action::CreateSwarm,
            Action::ViewConsensus,
            Action::CastVote,
            Action::ListWallets,
            Action::WalletBalance,
            Action::CreateWallet,
            Action::ExecuteTrade,
            Action::SystemMetrics,
            Action::AgentMetrics,
            Action::BackendHealth,
        ];
        let mut labels: Vec<_> = all.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), all.len());
    }
}
