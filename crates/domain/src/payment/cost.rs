//! Payment cost rules.

/// Flat tax charged on the product subtotal.
pub const TAX_RATE: f64 = 0.10;

/// Total amount charged for an order.
pub fn total_cost(product_cost: f64, delivery_cost: f64) -> f64 {
    product_cost + product_cost * TAX_RATE + delivery_cost
}

/// Sums `unit_price * quantity` over the order lines.
pub fn product_cost<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, u64)>,
{
    lines
        .into_iter()
        .map(|(unit_price, quantity)| unit_price * quantity as f64)
        .sum()
}
