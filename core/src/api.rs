//! One configured client per resource kind, sharing a transport.

use crate::client::ResourceClient;
use crate::config::ApiConfig;
use crate::transport::UreqTransport;
use crate::types::{Client, Dish, Employee, Order, OrderDetail};

pub type ClientApi<T = UreqTransport> = ResourceClient<Client, T>;
pub type DishApi<T = UreqTransport> = ResourceClient<Dish, T>;
pub type EmployeeApi<T = UreqTransport> = ResourceClient<Employee, T>;
pub type OrderApi<T = UreqTransport> = ResourceClient<Order, T>;
pub type OrderDetailApi<T = UreqTransport> = ResourceClient<OrderDetail, T>;

#[derive(Debug, Clone)]
pub struct RestaurantApi<T = UreqTransport> {
    pub clients: ClientApi<T>,
    pub dishes: DishApi<T>,
    pub employees: EmployeeApi<T>,
    pub orders: OrderApi<T>,
    pub order_details: OrderDetailApi<T>,
}

impl RestaurantApi<UreqTransport> {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Configured from `RESTAURANT_API_BASE_URL` (or `.env`).
    pub fn from_env() -> Self {
        Self::new(&ApiConfig::from_env())
    }
}

impl<T: Clone> RestaurantApi<T> {
    pub fn with_transport(config: &ApiConfig, transport: T) -> Self {
        Self {
            clients: ResourceClient::with_transport(config, transport.clone()),
            dishes: ResourceClient::with_transport(config, transport.clone()),
            employees: ResourceClient::with_transport(config, transport.clone()),
            orders: ResourceClient::with_transport(config, transport.clone()),
            order_details: ResourceClient::with_transport(config, transport),
        }
    }
}
