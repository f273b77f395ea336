//! Order entity.

use chrono::{DateTime, Utc};
use common::{Address, BookingId, DeliveryId, OrderId, PaymentId, ProductQuantities, ShoppingCartId};
use document_store::Document;
use serde::{Deserialize, Serialize};

use super::{OrderError, OrderOperation, OrderState};
use crate::warehouse::BookedProducts;

/// A customer order.
///
/// Owned by the order service. `username`, `shopping_cart_id` and `products`
/// never change after creation; everything else moves only through
/// [`Order::apply`] and the `attach_*`/`set_*` recorders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    username: String,
    shopping_cart_id: ShoppingCartId,
    delivery_id: Option<DeliveryId>,
    payment_id: Option<PaymentId>,
    booking_id: Option<BookingId>,
    delivery_address: Option<Address>,
    state: OrderState,
    products: ProductQuantities,
    total_volume: f64,
    total_weight: f64,
    fragile: bool,
    total_price: Option<f64>,
    products_price: Option<f64>,
    delivery_price: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document for Order {
    type Id = OrderId;

    fn kind() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Order {
    /// Places a new order in the `New` state.
    pub fn new(
        username: impl Into<String>,
        shopping_cart_id: ShoppingCartId,
        products: ProductQuantities,
        delivery_address: Option<Address>,
    ) -> Result<Self, OrderError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(OrderError::UsernameRequired);
        }

        if products.is_empty() {
            return Err(OrderError::NoProducts);
        }

        if let Some((product_id, _)) = products.iter().find(|(_, count)| **count == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: *product_id,
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            username,
            shopping_cart_id,
            delivery_id: None,
            payment_id: None,
            booking_id: None,
            delivery_address,
            state: OrderState::New,
            products,
            total_volume: 0.0,
            total_weight: 0.0,
            fragile: false,
            total_price: None,
            products_price: None,
            delivery_price: None,
            created_at: now,
            updated_at: now,
        })
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn shopping_cart_id(&self) -> ShoppingCartId {
        self.shopping_cart_id
    }

    pub fn delivery_id(&self) -> Option<DeliveryId> {
        self.delivery_id
    }

    pub fn payment_id(&self) -> Option<PaymentId> {
        self.payment_id
    }

    pub fn booking_id(&self) -> Option<BookingId> {
        self.booking_id
    }

    pub fn delivery_address(&self) -> Option<&Address> {
        self.delivery_address.as_ref()
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn products(&self) -> &ProductQuantities {
        &self.products
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn is_fragile(&self) -> bool {
        self.fragile
    }

    pub fn total_price(&self) -> Option<f64> {
        self.total_price
    }

    pub fn products_price(&self) -> Option<f64> {
        self.products_price
    }

    pub fn delivery_price(&self) -> Option<f64> {
        self.delivery_price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if no operation leads out of the current state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

// Transitions
impl Order {
    /// Checks that `operation` is allowed without changing anything.
    ///
    /// Returns the state the order would move to.
    pub fn check(&self, operation: OrderOperation) -> Result<OrderState, OrderError> {
        self.state
            .next(operation)
            .ok_or(OrderError::InvalidTransition {
                state: self.state,
                operation,
            })
    }

    /// Applies `operation`, moving the order along its transition table.
    ///
    /// On rejection the order is left untouched.
    pub fn apply(&mut self, operation: OrderOperation) -> Result<OrderState, OrderError> {
        let next = self.check(operation)?;
        self.state = next;
        self.touch();
        Ok(next)
    }

    /// Records the warehouse booking and the dimensions it reported.
    pub fn attach_booking(&mut self, booking_id: BookingId, booked: BookedProducts) {
        self.booking_id = Some(booking_id);
        self.total_weight = booked.delivery_weight;
        self.total_volume = booked.delivery_volume;
        self.fragile = booked.fragile;
        self.touch();
    }

    pub fn attach_payment(&mut self, payment_id: PaymentId) {
        self.payment_id = Some(payment_id);
        self.touch();
    }

    pub fn attach_delivery(&mut self, delivery_id: DeliveryId) {
        self.delivery_id = Some(delivery_id);
        self.touch();
    }

    pub fn set_delivery_price(&mut self, price: f64) {
        self.delivery_price = Some(price);
        self.touch();
    }

    /// Records the product subtotal and the grand total.
    pub fn set_prices(&mut self, products_price: f64, total_price: f64) {
        self.products_price = Some(products_price);
        self.total_price = Some(total_price);
        self.touch();
    }

    /// Returns the delivery address, or an error if the order has none.
    pub fn require_delivery_address(&self) -> Result<&Address, OrderError> {
        self.delivery_address
            .as_ref()
            .ok_or(OrderError::DeliveryAddressMissing)
    }

    /// Returns the delivery price, or an error if it was never calculated.
    pub fn require_delivery_price(&self) -> Result<f64, OrderError> {
        self.delivery_price.ok_or(OrderError::DeliveryPriceMissing)
    }

    /// Resolves the products to send back to the warehouse.
    ///
    /// `None` returns everything; otherwise each requested count must fit
    /// within what was ordered.
    pub fn products_to_return(
        &self,
        requested: Option<ProductQuantities>,
    ) -> Result<ProductQuantities, OrderError> {
        let Some(requested) = requested else {
            return Ok(self.products.clone());
        };

        if requested.is_empty() {
            return Err(OrderError::NoProducts);
        }

        for (product_id, count) in &requested {
            let ordered = self.products.get(product_id).copied().unwrap_or(0);
            if *count == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: *product_id,
                });
            }
            if *count > ordered {
                return Err(OrderError::ReturnExceedsOrder {
                    product_id: *product_id,
                    requested: *count,
                    ordered,
                });
            }
        }

        Ok(requested)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use common::ProductId;

    use super::*;

    fn products(entries: &[(ProductId, u64)]) -> ProductQuantities {
        entries.iter().copied().collect()
    }

    fn new_order() -> Order {
        Order::new(
            "alice",
            ShoppingCartId::new(),
            products(&[(ProductId::new(), 2)]),
            Some(Address::new("RU", "Moscow", "Tverskaya", "1", "10")),
        )
        .unwrap()
    }

    #[test]
    fn test_new_order() {
        let cart = ShoppingCartId::new();
        let product = ProductId::new();
        let order = Order::new("alice", cart, products(&[(product, 3)]), None).unwrap();

        assert_eq!(order.state(), OrderState::New);
        assert_eq!(order.username(), "alice");
        assert_eq!(order.shopping_cart_id(), cart);
        assert_eq!(order.products().get(&product), Some(&3));
        assert!(order.total_price().is_none());
        assert!(order.delivery_price().is_none());
        assert!(order.products_price().is_none());
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn test_new_order_requires_username() {
        let result = Order::new(" ", ShoppingCartId::new(), products(&[(ProductId::new(), 1)]), None);
        assert_eq!(result.unwrap_err(), OrderError::UsernameRequired);
    }

    #[test]
    fn test_new_order_requires_products() {
        let result = Order::new("alice", ShoppingCartId::new(), ProductQuantities::new(), None);
        assert_eq!(result.unwrap_err(), OrderError::NoProducts);
    }

    #[test]
    fn test_new_order_rejects_zero_quantity() {
        let product = ProductId::new();
        let result = Order::new("alice", ShoppingCartId::new(), products(&[(product, 0)]), None);
        assert_eq!(
            result.unwrap_err(),
            OrderError::InvalidQuantity { product_id: product }
        );
    }

    #[test]
    fn test_apply_moves_state_and_touches() {
        let mut order = new_order();
        let before = order.updated_at();

        let next = order.apply(OrderOperation::SendToAssembly).unwrap();

        assert_eq!(next, OrderState::Assembled);
        assert_eq!(order.state(), OrderState::Assembled);
        assert!(order.updated_at() >= before);
    }

    #[test]
    fn test_rejected_apply_leaves_order_untouched() {
        let mut order = new_order();
        let snapshot = order.clone();

        let err = order.apply(OrderOperation::Pay).unwrap_err();

        assert_eq!(
            err,
            OrderError::InvalidTransition {
                state: OrderState::New,
                operation: OrderOperation::Pay,
            }
        );
        assert_eq!(order, snapshot);
    }

    #[test]
    fn test_check_does_not_mutate() {
        let order = new_order();
        assert_eq!(
            order.check(OrderOperation::SendToAssembly),
            Ok(OrderState::Assembled)
        );
        assert_eq!(order.state(), OrderState::New);
    }

    #[test]
    fn test_attach_booking_records_dimensions() {
        let mut order = new_order();
        let booking = BookingId::new();
        order.attach_booking(
            booking,
            BookedProducts {
                delivery_weight: 12.5,
                delivery_volume: 3.0,
                fragile: true,
            },
        );

        assert_eq!(order.booking_id(), Some(booking));
        assert_eq!(order.total_weight(), 12.5);
        assert_eq!(order.total_volume(), 3.0);
        assert!(order.is_fragile());
    }

    #[test]
    fn test_require_delivery_fields() {
        let order = Order::new("bob", ShoppingCartId::new(), products(&[(ProductId::new(), 1)]), None)
            .unwrap();
        assert_eq!(
            order.require_delivery_address().unwrap_err(),
            OrderError::DeliveryAddressMissing
        );
        assert_eq!(
            order.require_delivery_price().unwrap_err(),
            OrderError::DeliveryPriceMissing
        );
    }

    #[test]
    fn test_products_to_return_defaults_to_everything() {
        let order = new_order();
        assert_eq!(&order.products_to_return(None).unwrap(), order.products());
    }

    #[test]
    fn test_products_to_return_rejects_more_than_ordered() {
        let order = new_order();
        let (product, _) = order.products().iter().next().map(|(p, c)| (*p, *c)).unwrap();

        let err = order
            .products_to_return(Some(products(&[(product, 5)])))
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::ReturnExceedsOrder {
                product_id: product,
                requested: 5,
                ordered: 2,
            }
        );

        let foreign = ProductId::new();
        assert!(matches!(
            order.products_to_return(Some(products(&[(foreign, 1)]))),
            Err(OrderError::ReturnExceedsOrder { ordered: 0, .. })
        ));
    }

    #[test]
    fn test_serialized_username_is_filterable() {
        let order = new_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["state"], "NEW");
    }

    #[test]
    fn test_document_roundtrip_keeps_immutable_fields() {
        let order = new_order();
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
