//! Integration tests for the order state machine.
//!
//! These walk whole lifecycles across the public domain API, including
//! every rejected edge.

use common::{Address, BookingId, ProductId, ProductQuantities, ShoppingCartId};
use domain::{BookedProducts, Order, OrderError, OrderOperation, OrderState};

const ALL_STATES: [OrderState; 9] = [
    OrderState::New,
    OrderState::Assembled,
    OrderState::AssemblyFailed,
    OrderState::OnPayment,
    OrderState::PaymentFailed,
    OrderState::OnDelivery,
    OrderState::DeliveryFailed,
    OrderState::Completed,
    OrderState::ProductReturned,
];

fn new_order() -> Order {
    let products: ProductQuantities = [(ProductId::new(), 1), (ProductId::new(), 4)]
        .into_iter()
        .collect();
    Order::new(
        "alice",
        ShoppingCartId::new(),
        products,
        Some(Address::new("RU", "Moscow", "Tverskaya", "1", "10")),
    )
    .unwrap()
}

/// Drives a fresh order into `target` along valid edges.
fn order_in(target: OrderState) -> Order {
    let path: &[OrderOperation] = match target {
        OrderState::New => &[],
        OrderState::Assembled => &[OrderOperation::SendToAssembly],
        OrderState::AssemblyFailed => &[OrderOperation::AssemblyFailed],
        OrderState::OnPayment => &[OrderOperation::SendToAssembly, OrderOperation::Pay],
        OrderState::PaymentFailed => &[
            OrderOperation::SendToAssembly,
            OrderOperation::Pay,
            OrderOperation::PaymentFailed,
        ],
        OrderState::OnDelivery => &[
            OrderOperation::SendToAssembly,
            OrderOperation::Pay,
            OrderOperation::SendToDelivery,
        ],
        OrderState::DeliveryFailed => &[
            OrderOperation::SendToAssembly,
            OrderOperation::Pay,
            OrderOperation::SendToDelivery,
            OrderOperation::DeliveryFailed,
        ],
        OrderState::Completed => &[
            OrderOperation::SendToAssembly,
            OrderOperation::Pay,
            OrderOperation::SendToDelivery,
            OrderOperation::Delivered,
        ],
        OrderState::ProductReturned => &[
            OrderOperation::SendToAssembly,
            OrderOperation::Pay,
            OrderOperation::SendToDelivery,
            OrderOperation::Complete,
            OrderOperation::ReturnProducts,
        ],
    };

    let mut order = new_order();
    for op in path {
        order.apply(*op).unwrap();
    }
    assert_eq!(order.state(), target);
    order
}

mod order_lifecycle {
    use super::*;

    #[test]
    fn happy_path_reaches_product_returned() {
        let mut order = new_order();

        order.apply(OrderOperation::SendToAssembly).unwrap();
        order.attach_booking(
            BookingId::new(),
            BookedProducts {
                delivery_weight: 10.0,
                delivery_volume: 5.0,
                fragile: true,
            },
        );
        order.set_delivery_price(19.2);
        order.set_prices(100.0, 129.2);
        order.apply(OrderOperation::Pay).unwrap();
        order.apply(OrderOperation::SendToDelivery).unwrap();
        order.apply(OrderOperation::Delivered).unwrap();
        order.apply(OrderOperation::ReturnProducts).unwrap();

        assert_eq!(order.state(), OrderState::ProductReturned);
        assert!(order.is_terminal());
        assert_eq!(order.total_price(), Some(129.2));
        assert_eq!(order.total_weight(), 10.0);
    }

    #[test]
    fn immutable_fields_survive_transitions() {
        let mut order = new_order();
        let username = order.username().to_string();
        let cart = order.shopping_cart_id();
        let products = order.products().clone();

        order.apply(OrderOperation::SendToAssembly).unwrap();
        order.apply(OrderOperation::AssemblyFailed).unwrap();

        assert_eq!(order.username(), username);
        assert_eq!(order.shopping_cart_id(), cart);
        assert_eq!(order.products(), &products);
    }
}

mod guarded_transitions {
    use super::*;

    #[test]
    fn every_missing_edge_is_rejected_without_mutation() {
        for state in ALL_STATES {
            for op in OrderOperation::ALL {
                let mut order = order_in(state);
                let snapshot = order.clone();
                let result = order.apply(op);

                match state.next(op) {
                    Some(next) => assert_eq!(result, Ok(next)),
                    None => {
                        assert_eq!(
                            result,
                            Err(OrderError::InvalidTransition { state, operation: op })
                        );
                        assert_eq!(order, snapshot);
                    }
                }
            }
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for state in ALL_STATES.into_iter().filter(|s| s.is_terminal()) {
            let order = order_in(state);
            assert!(OrderOperation::ALL.iter().all(|op| order.check(*op).is_err()));
        }
    }
}
