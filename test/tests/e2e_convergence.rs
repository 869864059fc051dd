use proptest::collection::vec;
use proptest::prelude::*;

use slotsync_server::ServerConfig;
use slotsync_shared::{ClickButton, ItemKind, ItemStack, SlotAction, SlotTarget, ThrowAmount};
use slotsync_test::{test_protocol::CHEST, TestHarness};

const SLOTS: usize = 63;

fn stack() -> impl Strategy<Value = ItemStack> {
    prop_oneof![
        3 => Just(ItemStack::empty()),
        1 => (1u16..4, 1u32..70).prop_map(|(kind, count)| ItemStack::new(ItemKind(kind), count)),
    ]
}

fn target() -> impl Strategy<Value = SlotTarget> {
    prop_oneof![
        8 => (0..SLOTS).prop_map(SlotTarget::Slot),
        1 => Just(SlotTarget::Outside),
    ]
}

fn action() -> impl Strategy<Value = SlotAction> {
    let button = prop_oneof![Just(ClickButton::Primary), Just(ClickButton::Secondary)];
    let amount = prop_oneof![Just(ThrowAmount::One), Just(ThrowAmount::Stack)];
    prop_oneof![
        4 => (target(), button).prop_map(|(target, button)| SlotAction::Pickup { target, button }),
        2 => (0..SLOTS).prop_map(|slot| SlotAction::QuickMove { slot }),
        1 => (target(), amount).prop_map(|(target, amount)| SlotAction::Throw { target, amount }),
        1 => (0..SLOTS, 0..SLOTS).prop_map(|(slot, other)| SlotAction::Swap { slot, other }),
        1 => (0..SLOTS).prop_map(|slot| SlotAction::PickupAll { slot }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn mirror_converges_without_desync(
        seed in vec(stack(), SLOTS),
        actions in vec(action(), 1..40),
    ) {
        let mut harness = TestHarness::new(ServerConfig::default());
        harness.add_client();
        let user_key = harness.user_key(0);
        let session_id = harness.server.open_session(&user_key, CHEST).unwrap();
        harness
            .server
            .mutate_session(&session_id, move |context| {
                context.container_mut().apply_snapshot(seed)
            })
            .unwrap()
            .unwrap();
        harness.exchange();

        for batch in actions.chunks(3) {
            for action in batch {
                harness.client(0).click(&session_id, *action).unwrap();
            }
            harness.exchange();
        }

        prop_assert_eq!(harness.client(0).desync_count(), 0);
        let mirror = harness.clients[0].1.session(&session_id).unwrap();
        let host = harness.server.session(&session_id).unwrap();
        prop_assert_eq!(mirror.container(), host.container());
        prop_assert_eq!(mirror.pending_predictions(), 0);
    }
}
