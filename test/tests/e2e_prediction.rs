use slotsync_client::{DesyncEvent, PropertyUpdateEvent, ResyncEvent as ClientResyncEvent, SlotUpdateEvent};
use slotsync_server::{
    ActionEvent, ResyncEvent, ResyncMode, ResyncPolicy, ServerConfig, SignalEvent, ThrowEvent,
};
use slotsync_shared::{ClickButton, ItemStack, SessionId, SlotAction, SlotTarget, ThrowAmount};
use slotsync_test::{init_logging, test_protocol::*, TestHarness};

fn harness_with_session(config: ServerConfig, type_tag: &str) -> (TestHarness, SessionId) {
    init_logging();
    let mut harness = TestHarness::new(config);
    let client = harness.add_client();
    let user_key = harness.user_key(client);
    let session_id = harness.server.open_session(&user_key, type_tag).unwrap();
    (harness, session_id)
}

fn seed(harness: &mut TestHarness, session_id: &SessionId, index: usize, stack: ItemStack) {
    harness
        .server
        .mutate_session(session_id, |context| context.set_slot(index, stack))
        .unwrap()
        .unwrap();
}

fn assert_converged(harness: &TestHarness, session_id: &SessionId) {
    let mirror = harness.clients[0].1.session(session_id).unwrap();
    let host = harness.server.session(session_id).unwrap();
    assert_eq!(mirror.container(), host.container());
    assert_eq!(mirror.revision(), host.revision());
}

#[test]
fn correct_prediction_needs_no_corrections() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, 0, ItemStack::new(ORE, 10));
    harness.exchange();
    harness.client(0).take_events();
    let revision = harness.server.session(&session_id).unwrap().revision();

    let outcome = harness
        .client(0)
        .click(&session_id, SlotAction::pickup(0, ClickButton::Primary))
        .unwrap();
    assert_eq!(outcome.moved(), &ItemStack::new(ORE, 10));
    assert_eq!(
        harness.client(0).session(&session_id).unwrap().cursor(),
        &ItemStack::new(ORE, 10)
    );
    harness.exchange();

    assert_eq!(harness.client(0).desync_count(), 0);
    let mut events = harness.client(0).take_events();
    assert!(!events.has::<SlotUpdateEvent>());
    assert!(!events.has::<DesyncEvent>());
    assert_eq!(harness.client(0).session(&session_id).unwrap().pending_predictions(), 0);
    assert_eq!(harness.server.session(&session_id).unwrap().revision(), revision);
    assert_converged(&harness, &session_id);

    let mut server_events = harness.server.take_events();
    let actions: Vec<_> = server_events.read::<ActionEvent>().collect();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].2, SlotAction::pickup(0, ClickButton::Primary));
    assert_eq!(actions[0].3, outcome);
}

#[test]
fn misprediction_is_overwritten_by_host_state() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    harness.exchange();

    // the client has not heard about this stack yet
    seed(&mut harness, &session_id, 0, ItemStack::new(ORE, 10));
    let outcome = harness
        .client(0)
        .click(&session_id, SlotAction::pickup(0, ClickButton::Primary))
        .unwrap();
    assert!(outcome.is_noop());
    harness.exchange();

    assert_eq!(harness.client(0).desync_count(), 1);
    let mut events = harness.client(0).take_events();
    let desyncs: Vec<_> = events.read::<DesyncEvent>().collect();
    assert_eq!(desyncs.len(), 1);
    assert_eq!(desyncs[0].0, session_id);
    assert_eq!(
        harness.client(0).session(&session_id).unwrap().cursor(),
        &ItemStack::new(ORE, 10)
    );
    assert_converged(&harness, &session_id);
}

#[test]
fn action_against_stale_revision_triggers_full_resync() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    harness.exchange();

    seed(&mut harness, &session_id, 0, ItemStack::new(ORE, 10));
    // the update is in flight when the client acts
    harness.server.send_all_packets();
    harness
        .client(0)
        .click(&session_id, SlotAction::pickup(0, ClickButton::Primary))
        .unwrap();
    harness.exchange();

    let mut server_events = harness.server.take_events();
    let user_key = harness.user_key(0);
    let resyncs: Vec<_> = server_events.read::<ResyncEvent>().collect();
    assert_eq!(resyncs, vec![(user_key, session_id)]);

    let mut events = harness.client(0).take_events();
    let resyncs: Vec<SessionId> = events.read::<ClientResyncEvent>().collect();
    assert_eq!(resyncs, vec![session_id]);
    assert_converged(&harness, &session_id);
}

#[test]
fn full_resync_mode_repairs_mispredictions_wholesale() {
    let config = ServerConfig {
        resync: ResyncPolicy {
            on_prediction_mismatch: ResyncMode::Full,
            ..Default::default()
        },
        ..Default::default()
    };
    let (mut harness, session_id) = harness_with_session(config, CHEST);
    harness.exchange();

    seed(&mut harness, &session_id, 3, ItemStack::new(INGOT, 7));
    harness
        .client(0)
        .click(&session_id, SlotAction::pickup(3, ClickButton::Secondary))
        .unwrap();
    harness.exchange();

    let mut events = harness.client(0).take_events();
    assert!(events.has::<ClientResyncEvent>());
    assert!(events.has::<DesyncEvent>());
    assert_eq!(
        harness.client(0).session(&session_id).unwrap().cursor(),
        &ItemStack::new(INGOT, 4)
    );
    assert_converged(&harness, &session_id);
}

#[test]
fn background_processing_reaches_the_mirror() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, INPUT_SLOT, ItemStack::new(ORE, 2));
    harness.exchange();
    harness.client(0).take_events();

    for _ in 0..COOK_TIME {
        harness.tick_and_exchange();
    }

    let mut events = harness.client(0).take_events();
    let progress: Vec<i32> = events
        .read::<PropertyUpdateEvent>()
        .filter(|(_, index, _)| *index == PROGRESS)
        .map(|(_, _, value)| value)
        .collect();
    assert_eq!(progress, vec![1, 2, 0]);
    let slots: Vec<usize> = events.read::<SlotUpdateEvent>().map(|(_, index)| index).collect();
    assert_eq!(slots, vec![INPUT_SLOT, OUTPUT_SLOT]);

    let mirror = harness.client(0).session(&session_id).unwrap();
    assert_eq!(mirror.stack_at(INPUT_SLOT).unwrap(), &ItemStack::new(ORE, 1));
    assert_eq!(mirror.stack_at(OUTPUT_SLOT).unwrap(), &ItemStack::new(INGOT, 1));
    assert_converged(&harness, &session_id);
}

#[test]
fn signals_reach_the_session_handler() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, INPUT_SLOT, ItemStack::new(ORE, 2));
    harness.exchange();

    harness.client(0).signal(&session_id, SIGNAL_DISABLE).unwrap();
    harness.exchange();
    assert_eq!(
        harness.client(0).session(&session_id).unwrap().property(ENABLED),
        Ok(0)
    );
    let mut server_events = harness.server.take_events();
    let signals: Vec<_> = server_events.read::<SignalEvent>().collect();
    assert_eq!(signals, vec![(harness.user_key(0), session_id, SIGNAL_DISABLE)]);

    for _ in 0..COOK_TIME {
        harness.tick_and_exchange();
    }
    let mirror = harness.client(0).session(&session_id).unwrap();
    assert!(mirror.stack_at(OUTPUT_SLOT).unwrap().is_empty());
    assert_eq!(mirror.property(PROGRESS), Ok(0));
}

#[test]
fn taking_output_runs_the_take_hook() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, OUTPUT_SLOT, ItemStack::new(INGOT, 3));
    harness.exchange();

    harness
        .client(0)
        .click(&session_id, SlotAction::pickup(OUTPUT_SLOT, ClickButton::Primary))
        .unwrap();
    harness.exchange();

    let mirror = harness.client(0).session(&session_id).unwrap();
    assert_eq!(mirror.property(COLLECTED), Ok(3));
    assert_eq!(mirror.cursor(), &ItemStack::new(INGOT, 3));
    assert_eq!(harness.client(0).desync_count(), 0);
}

#[test]
fn thrown_stacks_are_reported_to_the_host() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), CHEST);
    seed(&mut harness, &session_id, 5, ItemStack::new(PEARL, 9));
    harness.exchange();

    harness
        .client(0)
        .click(
            &session_id,
            SlotAction::throw(5, ThrowAmount::One),
        )
        .unwrap();
    harness
        .client(0)
        .click(&session_id, SlotAction::pickup(5, ClickButton::Primary))
        .unwrap();
    harness
        .client(0)
        .click(
            &session_id,
            SlotAction::Throw {
                target: SlotTarget::Outside,
                amount: ThrowAmount::Stack,
            },
        )
        .unwrap();
    harness.exchange();

    let mut server_events = harness.server.take_events();
    let thrown: Vec<ItemStack> = server_events.read::<ThrowEvent>().map(|(_, _, stack)| stack).collect();
    assert_eq!(thrown, vec![ItemStack::new(PEARL, 1), ItemStack::new(PEARL, 8)]);
    assert_eq!(harness.client(0).desync_count(), 0);
    assert_converged(&harness, &session_id);
    assert!(harness.server.session(&session_id).unwrap().container().stack_at(5).unwrap().is_empty());
}

#[test]
fn quick_move_without_room_is_a_quiet_noop() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, INPUT_SLOT, ItemStack::new(ORE, 64));
    seed(&mut harness, &session_id, 0, ItemStack::new(ORE, 10));
    harness.exchange();
    harness.client(0).take_events();

    let outcome = harness
        .client(0)
        .click(&session_id, SlotAction::quick_move(0))
        .unwrap();
    assert!(outcome.is_noop());
    harness.exchange();

    assert_eq!(harness.client(0).desync_count(), 0);
    assert!(!harness.client(0).take_events().has::<SlotUpdateEvent>());
    assert_eq!(
        harness.client(0).session(&session_id).unwrap().stack_at(0),
        Ok(&ItemStack::new(ORE, 10))
    );
}

#[test]
fn handler_can_quick_move_into_its_own_ranges() {
    let (mut harness, session_id) = harness_with_session(ServerConfig::default(), SMELTER);
    seed(&mut harness, &session_id, INPUT_SLOT, ItemStack::new(ORE, 30));
    seed(&mut harness, &session_id, 2, ItemStack::new(ORE, 50));
    harness.exchange();

    harness.client(0).signal(&session_id, SIGNAL_EJECT).unwrap();
    harness.exchange();

    // the hotbar range comes first, so slot 2 is never merged into
    let mirror = harness.client(0).session(&session_id).unwrap();
    assert!(mirror.stack_at(INPUT_SLOT).unwrap().is_empty());
    assert_eq!(mirror.stack_at(27), Ok(&ItemStack::new(ORE, 30)));
    assert_eq!(mirror.stack_at(2), Ok(&ItemStack::new(ORE, 50)));
    assert_converged(&harness, &session_id);
}
