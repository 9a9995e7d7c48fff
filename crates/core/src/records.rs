//! Built-in named record types.
//!
//! These give the synthesizer a strongly-typed target: output is decoded
//! into these structs, so a record missing a required field fails the batch
//! rather than being stored as-is.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const USER_TYPE_NAME: &str = "User";
pub const ORDER_TYPE_NAME: &str = "Order";

/// Rules applied to `User` generation when the schema carries none.
pub const USER_DEFAULT_RULES: &str = "Age should be between 18 and 65. Use realistic US addresses. \
Email should match the format firstname.lastname@domain.com";

/// Rules applied to `Order` generation when the schema carries none.
pub const ORDER_DEFAULT_RULES: &str = "Generate orders from the past 30 days. \
Each order should have 1-5 items. Total amount should be the sum of all items. \
Use realistic product names and prices.";

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A person with contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// An e-commerce order with line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    /// ISO-8601 date-time.
    pub order_date: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}
