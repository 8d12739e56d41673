//! Data-access layer for the restaurant-management REST API.
//!
//! # Overview
//! Lists, fetches, creates, updates and deletes clients, dishes, employees,
//! orders and order details. Responses are status-checked, shape-checked and
//! normalized so every entity carries a canonical string `id` regardless of
//! the backend's per-resource key name (`idClient`, `idDish`, ...).
//!
//! # Design
//! - One generic `ResourceClient<R, T>` replaces a client per resource; `R`
//!   supplies the endpoint, key name and required-field check.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response). The combined methods run both around a `Transport`.
//! - The client is synchronous and holds no mutable state; concurrent callers
//!   are not coordinated and the server stays the only source of truth.
//! - Entity types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod transport;
pub mod types;

pub use api::{ClientApi, DishApi, EmployeeApi, OrderApi, OrderDetailApi, RestaurantApi};
pub use client::{Created, ResourceClient};
pub use config::{ApiConfig, ResourceKind};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Client, Dish, Employee, Order, OrderDetail, OrderStatus, Resource};
