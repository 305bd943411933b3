//! Tests for the menu state machine
//!
//! Menu indices used below:
//! - Root: 0 Agents, 1 Swarms, 2 Wallets, 3 Metrics, 4 Backend health, 5 Exit
//! - Agents: 0 List, 1 Inspect, 2 Train skill, 3 Onboard, 4 Back
//! - Swarms: 0 List, 1 Create, 2 Consensus, 3 Vote, 4 Back
//! - Wallets: 0 List, 1 Balance, 2 Create, 3 Trade, 4 Back
//! - Metrics: 0 System, 1 Agents, 2 Back

mod common;

use common::{escape, line, no, pick, yes, FakeBridge, RecordingSurface, ScriptedPrompts};
use hivectl::cli::actions::Action;
use hivectl::cli::menu::{Frame, MenuController, MenuEntry, MenuId, MenuState};
use hivectl::cli::prompts::PromptError;
use hivectl::cli::session::Session;
use hivectl::cli::surface::{Level, View};
use serde_json::json;

const EXIT: usize = 5;
const BACK: usize = 4;

/// Run the console with scripted answers; returns the recorded views
fn run_console(
    bridge: &FakeBridge,
    answers: Vec<common::Answer>,
) -> (RecordingSurface, MenuController) {
    let mut prompts = ScriptedPrompts::new(answers);
    let mut surface = RecordingSurface::new();
    let mut controller = MenuController::new();
    {
        let mut session = Session::new(bridge, &mut prompts, &mut surface).with_bar_width(20);
        controller
            .run(&mut session)
            .expect("script should end at Exit");
    }
    assert_eq!(prompts.remaining(), 0, "unused scripted answers");
    (surface, controller)
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_exit_at_root() {
    let bridge = FakeBridge::new();
    let (surface, controller) = run_console(&bridge, vec![pick(EXIT)]);

    assert_eq!(surface.menu_paths(), vec!["Hive"]);
    assert_eq!(
        controller.history(),
        &[
            MenuState::Render(Frame::root()),
            MenuState::Prompt(Frame::root()),
            MenuState::Dispatch(Frame::root(), MenuEntry::Back),
            MenuState::Exit,
        ]
    );
    assert_eq!(bridge.call_count(), 0);
}

#[test]
fn test_submenu_pushes_and_back_pops() {
    let bridge = FakeBridge::new();
    let (surface, _) = run_console(&bridge, vec![pick(3), pick(2), pick(EXIT)]);

    assert_eq!(
        surface.menu_paths(),
        vec!["Hive", "Hive › Metrics", "Hive"],
        "back returns to the parent menu"
    );
}

#[test]
fn test_escape_at_root_does_not_exit() {
    let bridge = FakeBridge::new();
    let (surface, _) = run_console(&bridge, vec![escape(), pick(EXIT)]);
    assert_eq!(surface.menu_paths(), vec!["Hive", "Hive"]);
}

#[test]
fn test_escape_in_submenu_goes_back() {
    let bridge = FakeBridge::new();
    let (surface, _) = run_console(&bridge, vec![pick(2), escape(), pick(EXIT)]);
    assert_eq!(surface.menu_paths(), vec!["Hive", "Hive › Wallets", "Hive"]);
}

#[test]
fn test_out_of_range_choice_rerenders() {
    let bridge = FakeBridge::new();
    let (surface, _) = run_console(&bridge, vec![pick(42), pick(EXIT)]);
    assert_eq!(surface.menu_paths(), vec!["Hive", "Hive"]);
}

#[test]
fn test_closed_input_ends_run() {
    let bridge = FakeBridge::new();
    let mut prompts = ScriptedPrompts::new([pick(0)]);
    let mut surface = RecordingSurface::new();
    let mut session = Session::new(&bridge, &mut prompts, &mut surface);

    let err = MenuController::new().run(&mut session).unwrap_err();
    assert!(matches!(err, PromptError::Closed));
}

#[test]
fn test_single_transitions() {
    let bridge = FakeBridge::new();
    let mut prompts = ScriptedPrompts::new([pick(1)]);
    let mut surface = RecordingSurface::new();
    let mut session = Session::new(&bridge, &mut prompts, &mut surface);
    let mut controller = MenuController::new();

    let state = controller
        .transition(MenuState::initial(), &mut session)
        .unwrap();
    assert_eq!(state, MenuState::Prompt(Frame::root()));

    let state = controller.transition(state, &mut session).unwrap();
    assert_eq!(
        state,
        MenuState::Dispatch(Frame::root(), MenuEntry::Submenu(MenuId::Swarms))
    );

    let state = controller.transition(state, &mut session).unwrap();
    let frame = state.frame().unwrap().clone();
    assert_eq!(frame.menu(), MenuId::Swarms);
    assert_eq!(frame.trail().path(), "Hive › Swarms");
    assert_eq!(state, MenuState::Render(frame));
}

// ============================================================================
// Leaf actions and error containment
// ============================================================================

#[test]
fn test_transport_error_rerenders_same_menu() {
    let bridge = FakeBridge::new().unreachable("agents.list");
    let (surface, _) = run_console(&bridge, vec![pick(0), pick(0), pick(BACK), pick(EXIT)]);

    assert_eq!(
        surface.menu_paths(),
        vec!["Hive", "Hive › Agents", "Hive › Agents", "Hive"],
        "the failing menu is shown again, not its parent"
    );
    let failures = surface.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("cannot reach backend"), "{}", failures[0]);
}

#[test]
fn test_domain_error_shown_verbatim() {
    let bridge = FakeBridge::new().reject("system.health", "venue feed degraded");
    let (surface, _) = run_console(&bridge, vec![pick(4), pick(EXIT)]);

    assert_eq!(surface.failures(), vec!["operation rejected: venue feed degraded"]);
    assert_eq!(surface.menu_paths(), vec!["Hive", "Hive"]);
}

#[test]
fn test_repeated_leaf_action_is_independent() {
    let bridge =
        FakeBridge::new().succeed("swarm.list", json!({"swarms": [{"id": "s1", "name": "alpha"}]}));
    let (surface, _) =
        run_console(&bridge, vec![pick(1), pick(0), pick(0), pick(BACK), pick(EXIT)]);

    let tables: Vec<&View> = surface
        .views
        .iter()
        .filter(|view| matches!(view, View::Table { .. }))
        .collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0], tables[1], "second run sees no residue of the first");
    assert_eq!(bridge.commands(), vec!["swarm.list", "swarm.list"]);
    assert_eq!(
        surface.menu_paths(),
        vec!["Hive", "Hive › Swarms", "Hive › Swarms", "Hive › Swarms", "Hive"]
    );
}

#[test]
fn test_empty_list_is_info_notice() {
    let bridge = FakeBridge::new().succeed("wallet.list", json!({"wallets": []}));
    let (surface, _) = run_console(&bridge, vec![pick(2), pick(0), pick(BACK), pick(EXIT)]);
    assert_eq!(surface.notices(Level::Info), vec!["No wallets found"]);
}

#[test]
fn test_list_without_expected_field_is_reported() {
    let bridge = FakeBridge::new().succeed("agents.list", json!({"items": []}));
    let (surface, _) = run_console(&bridge, vec![pick(0), pick(0), pick(BACK), pick(EXIT)]);
    assert_eq!(surface.failures().len(), 1);
    assert!(surface.failures()[0].contains("`agents`"));
}

#[test]
fn test_consensus_view() {
    let bridge = FakeBridge::new().succeed(
        "swarm.consensus",
        json!({"votes": {"p1": true, "p2": true, "p3": false}, "threshold": 0.66}),
    );
    let (surface, _) = run_console(
        &bridge,
        vec![pick(1), pick(2), line("s1"), pick(BACK), pick(EXIT)],
    );

    let tally = surface
        .views
        .iter()
        .find_map(|view| match view {
            View::Consensus { title, tally } => {
                assert_eq!(title, "Consensus for s1");
                Some(tally.clone())
            }
            _ => None,
        })
        .expect("consensus view rendered");
    assert_eq!(tally.bar_width(), 20);
    assert_eq!(tally.yes_percent(), 67);
    assert_eq!(tally.marker_index(), 13);
    assert_eq!(bridge.args_of(0), json!(["s1"]));
}

#[test]
fn test_malformed_consensus_is_contained() {
    let bridge =
        FakeBridge::new().succeed("swarm.consensus", json!({"votes": {"p1": 1}, "threshold": 0.5}));
    let (surface, _) = run_console(
        &bridge,
        vec![pick(1), pick(2), line("s1"), pick(BACK), pick(EXIT)],
    );
    let failures = surface.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("malformed backend response"), "{}", failures[0]);
}

#[test]
fn test_cast_vote() {
    let bridge = FakeBridge::new().succeed("swarm.vote", json!({}));
    let (surface, _) = run_console(
        &bridge,
        vec![
            pick(1),
            pick(3),
            line("s1"),
            line("agent-2"),
            pick(1), // No
            pick(BACK),
            pick(EXIT),
        ],
    );
    assert_eq!(
        bridge.args_of(0),
        json!({"swarm_id": "s1", "agent_id": "agent-2", "vote": false})
    );
    assert_eq!(surface.notices(Level::Success), vec!["Vote recorded"]);
}

#[test]
fn test_declined_trade_makes_no_call() {
    let bridge = FakeBridge::new().succeed("trade.execute", json!({"trade": {"id": "t1"}}));
    let (surface, _) = run_console(
        &bridge,
        vec![
            pick(2),
            pick(3),
            line("wallet-1"),
            line(""),
            line(""),
            line("10"),
            no(),
            pick(BACK),
            pick(EXIT),
        ],
    );
    assert_eq!(bridge.call_count(), 0);
    assert_eq!(surface.notices(Level::Info), vec!["Trade cancelled"]);
}

#[test]
fn test_confirmed_trade_executes() {
    let bridge = FakeBridge::new().succeed("trade.execute", json!({"trade": {"id": "t1"}}));
    let (surface, _) = run_console(
        &bridge,
        vec![
            pick(2),
            pick(3),
            line("wallet-1"),
            line("ETH/USDC"),
            line("buy"),
            line("0.75"),
            yes(),
            pick(BACK),
            pick(EXIT),
        ],
    );
    assert_eq!(
        bridge.args_of(0),
        json!({"wallet_id": "wallet-1", "pair": "ETH/USDC", "side": "buy", "amount": 0.75})
    );
    assert_eq!(surface.notices(Level::Success), vec!["Trade submitted"]);
}

#[test]
fn test_trade_side_is_sent_lowercase() {
    let bridge = FakeBridge::new().succeed("trade.execute", json!({"trade": {"id": "t2"}}));
    let mut prompts = ScriptedPrompts::new([
        line("wallet-1"),
        line(""),
        line(" SELL "),
        line("2"),
        yes(),
    ]);
    let mut surface = RecordingSurface::new();
    {
        let mut session = Session::new(&bridge, &mut prompts, &mut surface);
        Action::ExecuteTrade.run(&mut session).unwrap();
    }

    assert_eq!(bridge.args_of(0)["side"], json!("sell"));
    assert_eq!(
        prompts.asked.last().map(String::as_str),
        Some("Execute sell 2 SOL/USDC?"),
        "confirmation shows the normalised side"
    );
}

#[test]
fn test_declined_onboarding_from_menu() {
    let bridge = FakeBridge::new();
    let (surface, _) = run_console(&bridge, vec![pick(0), pick(3), no(), pick(BACK), pick(EXIT)]);

    assert_eq!(bridge.call_count(), 0);
    assert_eq!(
        surface.notices(Level::Info),
        vec!["Agent onboarding not started; nothing was created."]
    );
    assert_eq!(
        surface.menu_paths(),
        vec!["Hive", "Hive › Agents", "Hive › Agents", "Hive"]
    );
}

#[test]
fn test_aborted_onboarding_returns_to_menu() {
    let bridge = FakeBridge::new().reject("agents.create", "name taken");
    let (surface, _) = run_console(
        &bridge,
        vec![pick(0), pick(3), yes(), line("alpha"), line(""), pick(BACK), pick(EXIT)],
    );
    assert_eq!(
        surface.failures(),
        vec!["Agent onboarding stopped at 'Create agent': operation rejected: name taken"]
    );
    assert_eq!(
        surface.menu_paths(),
        vec!["Hive", "Hive › Agents", "Hive › Agents", "Hive"]
    );
}
