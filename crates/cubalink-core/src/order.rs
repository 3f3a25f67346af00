//! Orders paid from the in-app wallet, and order numbering.
//!
//! A wallet order becomes one `orders` row, one `order_items` row per cart item,
//! and an `order_created` activity row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Human-facing order number, `ORD-YYYYMMDD-HHMMSS[-suffix]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Order number for a payment-link order.
    #[must_use]
    pub fn payment(now: DateTime<Utc>) -> Self {
        Self(format!("ORD-{}", now.format("%Y%m%d-%H%M%S")))
    }

    /// Order number for a wallet order; `suffix` disambiguates orders placed in
    /// the same second.
    #[must_use]
    pub fn wallet(now: DateTime<Utc>, suffix: &str) -> Self {
        Self(format!("ORD-{}-{suffix}", now.format("%Y%m%d-%H%M%S")))
    }

    /// The order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet order as posted by the app after a successful wallet payment.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletOrderRequest {
    /// Paying user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Free-form item summary stored on the order.
    #[serde(default = "empty_array")]
    pub items: Value,
    /// Shipping address object.
    #[serde(default = "empty_object")]
    pub shipping_address: Value,
    /// Shipping method (default `express`).
    #[serde(default)]
    pub shipping_method: Option<String>,
    /// Subtotal in major units.
    #[serde(default)]
    pub subtotal: f64,
    /// Shipping cost in major units.
    #[serde(default)]
    pub shipping_cost: f64,
    /// Total in major units.
    #[serde(default)]
    pub total: f64,
    /// Estimated delivery date, passed through.
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    /// Arbitrary metadata object.
    #[serde(default = "empty_object")]
    pub metadata: Value,
    /// Cart lines to expand into order items.
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
}

/// One cart line. Apps have sent several field spellings over time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartItem {
    /// Cart item id.
    #[serde(default)]
    pub id: Option<Value>,
    /// Product id.
    #[serde(default)]
    pub product_id: Option<Value>,
    /// Product type (default `store`).
    #[serde(default)]
    pub product_type: Option<String>,
    /// Preferred name field.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Fallback name field.
    #[serde(default)]
    pub name: Option<String>,
    /// Preferred unit price field.
    #[serde(default)]
    pub product_price: Option<f64>,
    /// Fallback unit price field.
    #[serde(default)]
    pub price: Option<f64>,
    /// Quantity (default 1).
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Unit weight in pounds (default 0.5).
    #[serde(default)]
    pub weight_lb: Option<f64>,
    /// Selected size.
    #[serde(default)]
    pub selected_size: Option<String>,
    /// Selected color.
    #[serde(default)]
    pub selected_color: Option<String>,
    /// Amazon ASIN for marketplace items.
    #[serde(default)]
    pub amazon_asin: Option<String>,
    /// Raw Amazon product payload.
    #[serde(default)]
    pub amazon_data: Option<Value>,
}

/// Row written to the `orders` table. Field names are column names.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub user_id: Option<String>,
    pub order_number: OrderNumber,
    pub items: Value,
    pub shipping_address: Value,
    pub shipping_method: String,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub total: f64,
    pub payment_method: &'static str,
    pub payment_status: &'static str,
    pub order_status: &'static str,
    pub estimated_delivery: Option<String>,
    pub metadata: Value,
}

/// Row written to the `order_items` table. Field names are column names.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemRow {
    pub order_id: String,
    pub product_type: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
    pub unit_weight_lb: f64,
    pub total_weight_lb: f64,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub asin: Option<String>,
    pub amazon_data: Option<Value>,
    pub metadata: Value,
}

/// Row written to the `activities` table. Field names are column names.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: &'static str,
    pub description: String,
    pub amount: f64,
    pub metadata: Value,
}

const DEFAULT_SHIPPING_METHOD: &str = "express";
const DEFAULT_PRODUCT_TYPE: &str = "store";
const DEFAULT_PRODUCT_NAME: &str = "Producto";
const DEFAULT_UNIT_WEIGHT_LB: f64 = 0.5;

impl WalletOrderRequest {
    /// Build the `orders` row. Wallet orders are already paid.
    #[must_use]
    pub fn to_order_row(&self, order_number: OrderNumber) -> OrderRow {
        OrderRow {
            user_id: self.user_id.clone(),
            order_number,
            items: self.items.clone(),
            shipping_address: self.shipping_address.clone(),
            shipping_method: self
                .shipping_method
                .clone()
                .unwrap_or_else(|| DEFAULT_SHIPPING_METHOD.to_string()),
            subtotal: self.subtotal,
            shipping_cost: self.shipping_cost,
            total: self.total,
            payment_method: "wallet",
            payment_status: "completed",
            order_status: "payment_confirmed",
            estimated_delivery: self.estimated_delivery.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Build the `order_items` rows for the stored order.
    #[must_use]
    pub fn to_item_rows(&self, order_id: &str) -> Vec<OrderItemRow> {
        self.cart_items
            .iter()
            .map(|item| item.to_row(order_id))
            .collect()
    }

    /// Build the `order_created` activity row.
    #[must_use]
    pub fn to_activity_row(&self, order_id: &str, order_number: &OrderNumber) -> ActivityRow {
        ActivityRow {
            user_id: self.user_id.clone(),
            activity_type: "order_created",
            description: format!("Order #{order_number} created and paid with wallet"),
            amount: self.total,
            metadata: json!({
                "order_id": order_id,
                "order_number": order_number,
            }),
        }
    }
}

impl CartItem {
    /// Map this cart line onto an `order_items` row.
    #[must_use]
    pub fn to_row(&self, order_id: &str) -> OrderItemRow {
        let unit_price = self.product_price.or(self.price).unwrap_or(0.0);
        let quantity = self.quantity.unwrap_or(1);
        let unit_weight_lb = self.weight_lb.unwrap_or(DEFAULT_UNIT_WEIGHT_LB);

        OrderItemRow {
            order_id: order_id.to_string(),
            product_type: self
                .product_type
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT_TYPE.to_string()),
            name: self
                .product_name
                .clone()
                .or_else(|| self.name.clone())
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
            unit_price,
            quantity,
            total_price: unit_price * f64::from(quantity),
            unit_weight_lb,
            total_weight_lb: unit_weight_lb * f64::from(quantity),
            selected_size: self.selected_size.clone(),
            selected_color: self.selected_color.clone(),
            asin: self.amazon_asin.clone(),
            amazon_data: self.amazon_data.clone(),
            metadata: json!({
                "product_id": self.product_id,
                "cart_item_id": self.id,
            }),
        }
    }
}

fn empty_array() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 8, 18, 12, 5).unwrap()
    }

    #[test]
    fn order_numbers() {
        assert_eq!(OrderNumber::payment(now()).as_str(), "ORD-20250908-181205");
        assert_eq!(
            OrderNumber::wallet(now(), "a1b2c3d4").as_str(),
            "ORD-20250908-181205-a1b2c3d4"
        );
    }

    #[test]
    fn minimal_request_gets_defaults() {
        let request: WalletOrderRequest =
            serde_json::from_value(json!({ "user_id": "u1", "total": 12.5 })).unwrap();
        let row = request.to_order_row(OrderNumber::payment(now()));

        assert_eq!(row.shipping_method, "express");
        assert_eq!(row.items, json!([]));
        assert_eq!(row.shipping_address, json!({}));
        assert_eq!(row.payment_status, "completed");
        assert_eq!(row.order_status, "payment_confirmed");
        assert!(request.to_item_rows("o1").is_empty());
    }

    #[test]
    fn cart_item_prefers_product_fields() {
        let item: CartItem = serde_json::from_value(json!({
            "id": "cart-1",
            "product_id": "prod-9",
            "product_name": "Rice 10lb",
            "name": "ignored",
            "product_price": 7.25,
            "price": 1.0,
            "quantity": 4,
            "weight_lb": 10.0
        }))
        .unwrap();

        let row = item.to_row("order-1");
        assert_eq!(row.name, "Rice 10lb");
        assert!((row.total_price - 29.0).abs() < f64::EPSILON);
        assert!((row.total_weight_lb - 40.0).abs() < f64::EPSILON);
        assert_eq!(row.product_type, "store");
        assert_eq!(row.metadata["cart_item_id"], "cart-1");
        assert_eq!(row.metadata["product_id"], "prod-9");
    }

    #[test]
    fn cart_item_fallbacks() {
        let row = CartItem {
            name: Some("Soap".into()),
            price: Some(2.0),
            ..CartItem::default()
        }
        .to_row("o");

        assert_eq!(row.name, "Soap");
        assert_eq!(row.quantity, 1);
        assert!((row.unit_weight_lb - 0.5).abs() < f64::EPSILON);
        assert_eq!(CartItem::default().to_row("o").name, "Producto");
    }

    #[test]
    fn activity_references_order() {
        let request: WalletOrderRequest =
            serde_json::from_value(json!({ "user_id": "u1", "total": 30.0 })).unwrap();
        let number = OrderNumber::wallet(now(), "deadbeef");
        let activity = request.to_activity_row("order-7", &number);

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "order_created");
        assert_eq!(json["metadata"]["order_id"], "order-7");
        assert_eq!(json["metadata"]["order_number"], "ORD-20250908-181205-deadbeef");
    }
}
