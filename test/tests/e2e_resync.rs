use slotsync_client::{
    Client, ClientConfig, ErrorEvent as ClientErrorEvent, ResyncEvent as ClientResyncEvent,
    SlotsyncClientError,
};
use slotsync_server::{ResyncEvent, ResyncPolicy, ServerConfig};
use slotsync_shared::{
    ContainerError, ItemStack, Protocol, ProtocolError, SessionId, SessionLayout, SlotRules,
};
use slotsync_test::{
    client_address, exchange_packets, init_logging, test_protocol::*, TestHarness,
};

fn resync_count(harness: &mut TestHarness) -> usize {
    harness
        .client(0)
        .take_events()
        .read::<ClientResyncEvent>()
        .count()
}

fn open_chest(config: ServerConfig) -> (TestHarness, SessionId) {
    init_logging();
    let mut harness = TestHarness::new(config);
    let client = harness.add_client();
    let user_key = harness.user_key(client);
    let session_id = harness.server.open_session(&user_key, CHEST).unwrap();
    harness.exchange();
    (harness, session_id)
}

#[test]
fn periodic_resync_follows_the_tick_count() {
    let (mut harness, _) = open_chest(ServerConfig {
        resync: ResyncPolicy {
            periodic_ticks: Some(2),
            ..Default::default()
        },
        ..Default::default()
    });
    resync_count(&mut harness);

    harness.tick_and_exchange();
    assert_eq!(resync_count(&mut harness), 0);
    harness.tick_and_exchange();
    assert_eq!(resync_count(&mut harness), 1);
    harness.tick_and_exchange();
    assert_eq!(resync_count(&mut harness), 0);
    harness.tick_and_exchange();
    assert_eq!(resync_count(&mut harness), 1);
}

#[test]
fn no_periodic_resync_by_default() {
    let (mut harness, _) = open_chest(ServerConfig::default());
    for _ in 0..5 {
        harness.tick_and_exchange();
    }
    assert_eq!(resync_count(&mut harness), 0);
}

#[test]
fn client_can_ask_for_a_resync_at_any_time() {
    let (mut harness, session_id) = open_chest(ServerConfig::default());

    harness.client(0).request_resync(&session_id).unwrap();
    harness.client(0).request_resync(&session_id).unwrap();
    harness.exchange();

    // both requests collapse into one snapshot
    assert_eq!(resync_count(&mut harness), 1);
    let mut server_events = harness.server.take_events();
    assert_eq!(server_events.read::<ResyncEvent>().count(), 1);
    assert_eq!(
        harness.client(0).request_resync(&SessionId::new(77)),
        Err(SlotsyncClientError::Session(
            slotsync_shared::SessionError::UnknownSessionId {
                session_id: SessionId::new(77)
            }
        ))
    );
}

#[test]
fn server_resync_overwrites_the_mirror() {
    let (mut harness, session_id) = open_chest(ServerConfig::default());
    harness
        .server
        .mutate_session(&session_id, |context| {
            context.set_slot(50, ItemStack::new(INGOT, 12))
        })
        .unwrap()
        .unwrap();

    harness.server.resync_session(&session_id).unwrap();
    harness.exchange();
    assert_eq!(resync_count(&mut harness), 1);

    // a second resync of identical state changes nothing
    let before = harness.client(0).session(&session_id).unwrap().container().snapshot();
    harness.server.resync_session(&session_id).unwrap();
    harness.exchange();
    let mirror = harness.clients[0].1.session(&session_id).unwrap();
    assert_eq!(mirror.container().snapshot(), before);
    assert_eq!(mirror.stack_at(50), Ok(&ItemStack::new(INGOT, 12)));
    assert_eq!(
        mirror.container(),
        harness.server.session(&session_id).unwrap().container()
    );
}

fn mismatched_protocol() -> Protocol {
    Protocol::builder()
        .add_session_kind(CHEST, SessionLayout::new().add_slots(10, SlotRules::open()))
        .build()
}

#[test]
fn wrong_length_snapshot_is_rejected_and_rerequested() {
    init_logging();
    let mut harness = TestHarness::new(ServerConfig::default());
    let address = client_address(0);
    let user_key = harness.server.add_user(address);
    let mut client = Client::new(ClientConfig::default(), mismatched_protocol());
    let (sender, receiver) = harness.network.client_transport(address);
    client.connect(sender, receiver);
    let session_id = harness.server.open_session(&user_key, CHEST).unwrap();

    exchange_packets(&mut harness.server, &mut [&mut client]);
    let expected = SlotsyncClientError::Rejected {
        session_id,
        error: ContainerError::LengthMismatch {
            expected: 10,
            actual: 63,
        },
    };
    let errors: Vec<_> = client.take_events().read::<ClientErrorEvent>().collect();
    assert_eq!(errors, vec![expected.clone()]);
    let mirror = client.session(&session_id).unwrap();
    assert!(mirror.container().snapshot().iter().all(ItemStack::is_empty));

    // the re-request reaches the host, which answers with another snapshot
    exchange_packets(&mut harness.server, &mut [&mut client]);
    assert_eq!(harness.server.take_events().read::<ResyncEvent>().count(), 1);
    let errors: Vec<_> = client.take_events().read::<ClientErrorEvent>().collect();
    assert_eq!(errors, vec![expected]);
}

#[test]
fn unknown_session_kind_is_closed_by_the_client() {
    init_logging();
    let mut harness = TestHarness::new(ServerConfig::default());
    let address = client_address(0);
    let user_key = harness.server.add_user(address);
    let mut client = Client::new(ClientConfig::default(), mismatched_protocol());
    let (sender, receiver) = harness.network.client_transport(address);
    client.connect(sender, receiver);
    let session_id = harness.server.open_session(&user_key, SMELTER).unwrap();

    exchange_packets(&mut harness.server, &mut [&mut client]);
    let errors: Vec<_> = client.take_events().read::<ClientErrorEvent>().collect();
    assert_eq!(
        errors,
        vec![SlotsyncClientError::Protocol(ProtocolError::UnknownTypeTag {
            type_tag: SMELTER.to_string()
        })]
    );
    assert!(client.session(&session_id).is_none());

    exchange_packets(&mut harness.server, &mut [&mut client]);
    assert!(harness.server.session(&session_id).is_none());
}
