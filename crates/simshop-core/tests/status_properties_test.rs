//! Property tests for the order lifecycle state machine.

use proptest::prelude::*;
use simshop_core::status::{resolve_status_update, StatusUpdate};
use simshop_core::{OrderStatus, PaymentStatus};

fn order_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn payment_status() -> impl Strategy<Value = PaymentStatus> {
    prop::sample::select(PaymentStatus::ALL.to_vec())
}

proptest! {
    #[test]
    fn permissive_mode_accepts_every_pair(
        from_order in order_status(),
        from_payment in payment_status(),
        to_order in order_status(),
        to_payment in payment_status(),
    ) {
        let update = StatusUpdate {
            order_status: Some(to_order),
            payment_status: Some(to_payment),
        };
        let resolved = resolve_status_update((from_order, from_payment), update, false).unwrap();
        prop_assert_eq!(resolved, (to_order, to_payment));
    }

    #[test]
    fn terminal_states_only_stay_put(from in order_status(), to in order_status()) {
        if from.is_terminal() && from != to {
            prop_assert!(!from.can_transition_to(to));
        }
    }

    #[test]
    fn enforced_mode_agrees_with_can_transition(
        from in order_status(),
        to in order_status(),
    ) {
        let update = StatusUpdate { order_status: Some(to), payment_status: None };
        let result = resolve_status_update((from, PaymentStatus::Pendiente), update, true);
        prop_assert_eq!(result.is_ok(), from.can_transition_to(to));
    }

    #[test]
    fn empty_update_is_a_no_op(from_order in order_status(), from_payment in payment_status()) {
        let resolved = resolve_status_update(
            (from_order, from_payment),
            StatusUpdate::default(),
            true,
        ).unwrap();
        prop_assert_eq!(resolved, (from_order, from_payment));
    }
}

#[test]
fn every_open_state_can_be_cancelled() {
    for status in OrderStatus::ALL {
        assert_eq!(
            status.can_transition_to(OrderStatus::Cancelado),
            !status.is_terminal() || status == OrderStatus::Cancelado
        );
    }
}
