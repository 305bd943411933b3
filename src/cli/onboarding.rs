//! Agent onboarding wizard
//!
//! Create agent, attach a wallet to it, configure its trading preferences,
//! and optionally place a first trade. Later steps read the `id` of earlier
//! artifacts by position: 0 is the agent, 1 is the wallet.

use serde_json::Value;

use crate::bridge::{commands, CommandArgs, Data};

use super::actions::trade_order;
use super::prompts::{fraction, identifier, non_empty, positive_number, FormField};
use super::session::Session;
use super::wizard::{prior_id, Artifact, Step, StepFailure, Wizard};

pub const ONBOARDING_TITLE: &str = "Agent onboarding";

const AGENT: usize = 0;
const WALLET: usize = 1;

pub fn onboarding_wizard() -> Wizard {
    Wizard::new(ONBOARDING_TITLE)
        .step(Step::new("Create agent", create_agent))
        .step(Step::new("Attach wallet", attach_wallet))
        .step(Step::new("Configure preferences", configure_preferences))
        .tail(
            "Place an initial trade?",
            Step::new("Initial trade", initial_trade),
        )
}

/// The record under `key`, or the payload itself
fn artifact(data: Data, key: &str) -> Value {
    if let Some(inner @ Value::Object(_)) = data.get(key) {
        return inner.clone();
    }
    Value::Object(data)
}

fn create_agent(session: &mut Session<'_>, _prior: &[Artifact]) -> Result<Value, StepFailure> {
    let values = session.prompts.form(&[
        FormField::text("name", "Agent name", identifier),
        FormField::text("role", "Role", non_empty).with_default("trader"),
    ])?;
    let data = session.call(commands::AGENTS_CREATE, CommandArgs::Keyed(values.into_map()))?;
    Ok(artifact(data, "agent"))
}

fn attach_wallet(session: &mut Session<'_>, prior: &[Artifact]) -> Result<Value, StepFailure> {
    let agent_id = prior_id(prior, AGENT, "agent")?.to_string();
    let choices = [
        "Create a new wallet".to_string(),
        "Connect an existing wallet".to_string(),
    ];
    let choice = session
        .prompts
        .select("Wallet", &choices, 0)?
        .ok_or(StepFailure::Cancelled)?;

    let data = if choice == 0 {
        let network = session.prompts.text("Network", Some("solana"), &identifier)?;
        session.call(
            commands::WALLET_CREATE,
            CommandArgs::keyed([("owner", agent_id), ("network", network)]),
        )?
    } else {
        let address = session.prompts.text("Wallet address", None, &non_empty)?;
        session.call(
            commands::WALLET_CONNECT,
            CommandArgs::keyed([("agent_id", agent_id), ("address", address)]),
        )?
    };
    Ok(artifact(data, "wallet"))
}

fn configure_preferences(
    session: &mut Session<'_>,
    prior: &[Artifact],
) -> Result<Value, StepFailure> {
    let agent_id = prior_id(prior, AGENT, "agent")?.to_string();
    let wallet_id = prior_id(prior, WALLET, "wallet")?.to_string();
    let mut values = session.prompts.form(&[
        FormField::number("risk_level", "Risk level (0-1)", fraction).with_default("0.5"),
        FormField::number("max_trade_size", "Max trade size", positive_number)
            .with_default("100"),
    ])?;
    values.insert("agent_id", Value::String(agent_id));
    values.insert("wallet_id", Value::String(wallet_id));

    let data = session.call(
        commands::AGENTS_CONFIGURE,
        CommandArgs::Keyed(values.into_map()),
    )?;
    Ok(artifact(data, "preferences"))
}

fn initial_trade(session: &mut Session<'_>, prior: &[Artifact]) -> Result<Value, StepFailure> {
    let agent_id = prior_id(prior, AGENT, "agent")?.to_string();
    let wallet_id = prior_id(prior, WALLET, "wallet")?.to_string();
    let mut values = trade_order(session)?;
    values.insert("agent_id", Value::String(agent_id));
    values.insert("wallet_id", Value::String(wallet_id));

    let data = session.call(commands::TRADE_EXECUTE, CommandArgs::Keyed(values.into_map()))?;
    Ok(artifact(data, "trade"))
}
