//! Entity types for the restaurant API and the `Resource` trait that binds
//! each of them to an endpoint, a backend key and a required-field check.
//!
//! # Design
//! Entities carry the canonical string `id` plus their business fields. Any
//! field the struct does not name (the backend key such as `idClient`,
//! server-side timestamps, ...) is kept in `extra` so a record survives a
//! fetch-edit-update cycle without losing data. Missing business fields
//! deserialize to empty strings or zero; the required-field check catches
//! them before a create.

use std::fmt;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::ResourceKind;
use crate::error::ApiError;

/// Binds an entity type to its endpoint and validation rules.
pub trait Resource: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Checks the fields the backend requires on create.
    fn validate(&self) -> Result<(), ApiError>;
}

fn missing_fields(resource: &str, missing: Vec<&str>) -> Result<(), ApiError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::Validation(format!(
        "{resource} is missing required fields: {}",
        missing.join(", ")
    )))
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Accepts a string, a number or null; numbers are stringified, null is "".
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Accepts a number or a numeric string. Null or absent is 0; anything else
/// is a shape error.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("number out of range: {n}"))),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(D::Error::custom(format!("expected a number, got {s:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Accepts a non-negative integer or an integer string that fits in `u32`.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(0),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| D::Error::custom("expected a non-negative integer that fits in u32"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Client {
    const KIND: ResourceKind = ResourceKind::Clients;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if blank(&self.first_name) {
            missing.push("firstName");
        }
        if blank(&self.last_name) {
            missing.push("lastName");
        }
        if blank(&self.email) {
            missing.push("email");
        }
        if blank(&self.phone) {
            missing.push("phone");
        }
        missing_fields("client", missing)
    }
}

/// A menu item. `price` is in COP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Dish {
    const KIND: ResourceKind = ResourceKind::Dishes;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.description) {
            missing.push("description");
        }
        if self.price <= 0.0 || self.price.is_nan() {
            missing.push("price");
        }
        missing_fields("dish", missing)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub salary: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Employee {
    const KIND: ResourceKind = ResourceKind::Employees;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if blank(&self.first_name) {
            missing.push("firstName");
        }
        if blank(&self.last_name) {
            missing.push("lastName");
        }
        if blank(&self.position) {
            missing.push("position");
        }
        if self.salary <= 0.0 || self.salary.is_nan() {
            missing.push("salary");
        }
        missing_fields("employee", missing)
    }
}

/// The four statuses the UI offers. The wire value is free text, so
/// `Order::status` stays a `String` and this is only a reading aid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ApiError::Validation(format!("unknown order status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// `Client::id` of the customer.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_customer: String,
    /// ISO-8601 date as sent by the backend.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// The status as one of the canonical values, if it is one.
    pub fn canonical_status(&self) -> Option<OrderStatus> {
        self.status.parse().ok()
    }
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Orders;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if blank(&self.id_customer) {
            missing.push("idCustomer");
        }
        if blank(&self.date) {
            missing.push("date");
        }
        if blank(&self.status) {
            missing.push("status");
        }
        missing_fields("order", missing)
    }
}

/// One dish line within an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_order: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_dish: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for OrderDetail {
    const KIND: ResourceKind = ResourceKind::OrderDetails;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if blank(&self.id_order) {
            missing.push("idOrder");
        }
        if blank(&self.id_dish) {
            missing.push("idDish");
        }
        missing_fields("order detail", missing)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_keeps_backend_key_in_extra() {
        let client: Client = serde_json::from_value(json!({
            "id": "7",
            "idClient": 7,
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "a@x.com",
            "phone": "555"
        }))
        .unwrap();
        assert_eq!(client.id, "7");
        assert_eq!(client.extra["idClient"], 7);

        let back = serde_json::to_value(&client).unwrap();
        assert_eq!(back["idClient"], 7);
        assert_eq!(back["firstName"], "Ana");
    }

    #[test]
    fn missing_business_fields_default() {
        let dish: Dish = serde_json::from_value(json!({"id": "3"})).unwrap();
        assert_eq!(dish.name, "");
        assert_eq!(dish.price, 0.0);
    }

    #[test]
    fn numeric_foreign_keys_become_strings() {
        let order: Order =
            serde_json::from_value(json!({"idCustomer": 4, "date": "2024-05-01", "status": "PENDING"}))
                .unwrap();
        assert_eq!(order.id_customer, "4");
        assert_eq!(order.canonical_status(), Some(OrderStatus::Pending));
    }

    #[test]
    fn free_text_status_is_kept() {
        let order = Order {
            status: "on hold".to_string(),
            ..Default::default()
        };
        assert_eq!(order.canonical_status(), None);
        assert_eq!(order.status, "on hold");
    }

    #[test]
    fn empty_id_is_not_serialized() {
        let dish = Dish {
            name: "Soup".to_string(),
            description: "Hot".to_string(),
            price: 12000.0,
            ..Default::default()
        };
        let body = serde_json::to_value(&dish).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["price"], 12000.0);
    }

    #[test]
    fn string_price_is_parsed() {
        let dish: Dish = serde_json::from_value(json!({"price": "15000"})).unwrap();
        assert_eq!(dish.price, 15000.0);
    }

    #[test]
    fn null_business_fields_default_to_empty() {
        let client: Client = serde_json::from_value(json!({
            "id": "7",
            "firstName": "Ana",
            "lastName": null,
            "email": null,
            "phone": "555"
        }))
        .unwrap();
        assert_eq!(client.last_name, "");
        assert_eq!(client.email, "");

        let dish: Dish = serde_json::from_value(json!({"name": null, "description": null, "price": null})).unwrap();
        assert_eq!(dish.name, "");
        assert_eq!(dish.price, 0.0);

        let employee: Employee =
            serde_json::from_value(json!({"firstName": null, "position": null, "salary": null})).unwrap();
        assert_eq!(employee.position, "");

        let order: Order = serde_json::from_value(json!({"date": null, "status": null})).unwrap();
        assert_eq!(order.status, "");
        assert_eq!(order.canonical_status(), None);
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        assert!(serde_json::from_value::<Dish>(json!({"price": "n/a"})).is_err());
        assert!(serde_json::from_value::<Dish>(json!({"price": true})).is_err());
        assert!(serde_json::from_value::<Employee>(json!({"salary": "NaN"})).is_err());
        assert!(serde_json::from_value::<OrderDetail>(json!({"quantity": 2.5})).is_err());
        assert!(serde_json::from_value::<OrderDetail>(json!({"quantity": -1})).is_err());
        assert!(serde_json::from_value::<OrderDetail>(json!({"quantity": 5_000_000_000u64})).is_err());
        assert!(serde_json::from_value::<OrderDetail>(json!({"quantity": "two"})).is_err());
    }

    #[test]
    fn numeric_strings_and_missing_amounts_are_accepted() {
        let detail: OrderDetail = serde_json::from_value(json!({"quantity": " 3 "})).unwrap();
        assert_eq!(detail.quantity, 3);
        let detail: OrderDetail = serde_json::from_value(json!({})).unwrap();
        assert_eq!(detail.quantity, 0);
        let employee: Employee = serde_json::from_value(json!({"salary": "2500000.5"})).unwrap();
        assert_eq!(employee.salary, 2_500_000.5);
    }

    #[test]
    fn client_validation_lists_every_missing_field() {
        let client = Client {
            first_name: "Ana".to_string(),
            phone: "  ".to_string(),
            ..Default::default()
        };
        let err = client.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: client is missing required fields: lastName, email, phone"
        );
    }

    #[test]
    fn dish_and_employee_require_positive_amounts() {
        let dish = Dish {
            name: "Soup".to_string(),
            description: "Hot".to_string(),
            price: 0.0,
            ..Default::default()
        };
        assert!(dish.validate().unwrap_err().is_validation());

        let employee = Employee {
            first_name: "Luis".to_string(),
            last_name: "Mora".to_string(),
            position: "chef".to_string(),
            salary: 2_500_000.0,
            ..Default::default()
        };
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn order_requires_customer_date_and_status() {
        let order = Order {
            id_customer: "1".to_string(),
            date: "2024-05-01".to_string(),
            ..Default::default()
        };
        let err = order.validate().unwrap_err();
        assert!(err.to_string().ends_with("status"));
    }
}
