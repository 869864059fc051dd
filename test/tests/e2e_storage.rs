use slotsync_server::{ServerConfig, SlotsyncServerError, StorageKey};
use slotsync_shared::{ItemStack, SessionId, SlotAction};
use slotsync_test::{init_logging, test_protocol::*, TestHarness};

/// Client 0 views the shared inventory through a smelter, client 1 through
/// a chest. Both link it at slot 0.
fn shared_inventory() -> (TestHarness, SessionId, SessionId, StorageKey) {
    init_logging();
    let mut harness = TestHarness::new(ServerConfig::default());
    let first = harness.add_client();
    let second = harness.add_client();
    let (first_key, second_key) = (harness.user_key(first), harness.user_key(second));
    let smelter = harness.server.open_session(&first_key, SMELTER).unwrap();
    let chest = harness.server.open_session(&second_key, CHEST).unwrap();
    let storage_key = harness.server.create_storage(PLAYER_SLOTS.len());
    harness.server.link_storage(&smelter, &storage_key, 0).unwrap();
    harness.server.link_storage(&chest, &storage_key, 0).unwrap();
    (harness, smelter, chest, storage_key)
}

#[test]
fn storage_writes_fan_out_to_every_linked_session() {
    let (mut harness, smelter, chest, storage_key) = shared_inventory();
    harness
        .server
        .set_storage_stack(&storage_key, 4, ItemStack::new(ORE, 20))
        .unwrap();
    harness.exchange();

    let expected = ItemStack::new(ORE, 20);
    assert_eq!(harness.client(0).session(&smelter).unwrap().stack_at(4), Ok(&expected));
    assert_eq!(harness.client(1).session(&chest).unwrap().stack_at(4), Ok(&expected));
}

#[test]
fn client_action_in_one_session_updates_the_other() {
    let (mut harness, smelter, chest, storage_key) = shared_inventory();
    harness
        .server
        .set_storage_stack(&storage_key, 4, ItemStack::new(ORE, 20))
        .unwrap();
    harness.exchange();

    harness
        .client(0)
        .click(&smelter, SlotAction::quick_move(4))
        .unwrap();
    harness.exchange();

    assert_eq!(harness.server.storage(&storage_key).unwrap()[4], ItemStack::empty());
    let chest_mirror = harness.client(1).session(&chest).unwrap();
    assert!(chest_mirror.stack_at(4).unwrap().is_empty());
    let smelter_mirror = harness.client(0).session(&smelter).unwrap();
    assert_eq!(smelter_mirror.stack_at(INPUT_SLOT), Ok(&ItemStack::new(ORE, 20)));
    assert_eq!(harness.client(0).desync_count(), 0);
    assert_eq!(harness.client(1).desync_count(), 0);
}

#[test]
fn host_mutation_is_fanned_out() {
    let (mut harness, smelter, chest, storage_key) = shared_inventory();
    harness
        .server
        .mutate_session(&chest, |context| {
            context.set_slot(35, ItemStack::new(PEARL, 16))
        })
        .unwrap()
        .unwrap();
    harness.exchange();

    assert_eq!(
        harness.server.storage(&storage_key).unwrap()[35],
        ItemStack::new(PEARL, 16)
    );
    assert_eq!(
        harness.client(0).session(&smelter).unwrap().stack_at(35),
        Ok(&ItemStack::new(PEARL, 16))
    );
}

#[test]
fn chest_slots_outside_the_link_stay_private() {
    let (mut harness, smelter, chest, storage_key) = shared_inventory();
    harness
        .server
        .mutate_session(&chest, |context| {
            context.set_slot(40, ItemStack::new(INGOT, 1))
        })
        .unwrap()
        .unwrap();
    harness.exchange();

    assert!(harness.server.storage(&storage_key).unwrap().iter().all(ItemStack::is_empty));
    assert!(harness
        .server
        .session(&smelter)
        .unwrap()
        .container()
        .snapshot()
        .iter()
        .all(ItemStack::is_empty));
}

#[test]
fn links_must_fit_inside_the_session() {
    let (mut harness, smelter, _, _) = shared_inventory();
    let storage_key = harness.server.create_storage(PLAYER_SLOTS.len());

    assert_eq!(
        harness.server.link_storage(&smelter, &storage_key, 10),
        Err(SlotsyncServerError::StorageOutOfRange {
            session_id: smelter,
            first_slot: 10,
            len: 36,
            slot_count: 38,
        })
    );
}

#[test]
fn closed_and_deleted_links_stop_fanning_out() {
    let (mut harness, smelter, chest, storage_key) = shared_inventory();
    harness.exchange();

    assert!(harness.server.close_session(&smelter));
    harness
        .server
        .set_storage_stack(&storage_key, 0, ItemStack::new(PEARL, 2))
        .unwrap();
    harness.exchange();
    assert_eq!(
        harness.client(1).session(&chest).unwrap().stack_at(0),
        Ok(&ItemStack::new(PEARL, 2))
    );

    assert!(harness.server.delete_storage(&storage_key));
    assert!(harness.server.storage(&storage_key).is_none());
    assert_eq!(
        harness
            .server
            .set_storage_stack(&storage_key, 0, ItemStack::empty()),
        Err(SlotsyncServerError::UnknownStorage { storage_key })
    );
}

#[test]
fn one_session_can_link_a_storage_twice() {
    init_logging();
    let mut harness = TestHarness::new(ServerConfig::default());
    let client = harness.add_client();
    let user_key = harness.user_key(client);
    let chest = harness.server.open_session(&user_key, CHEST).unwrap();
    let storage_key = harness.server.create_storage(9);
    harness.server.link_storage(&chest, &storage_key, 0).unwrap();
    harness.server.link_storage(&chest, &storage_key, 36).unwrap();

    harness
        .server
        .mutate_session(&chest, |context| {
            context.set_slot(2, ItemStack::new(ORE, 7))
        })
        .unwrap()
        .unwrap();
    harness.exchange();

    assert_eq!(
        harness.server.storage(&storage_key).unwrap()[2],
        ItemStack::new(ORE, 7)
    );
    let mirror = harness.clients[0].1.session(&chest).unwrap();
    assert_eq!(mirror.stack_at(2), Ok(&ItemStack::new(ORE, 7)));
    assert_eq!(mirror.stack_at(38), Ok(&ItemStack::new(ORE, 7)));
}
