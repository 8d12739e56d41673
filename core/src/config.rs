//! Endpoint registry and client configuration.

use std::env;

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_VAR: &str = "RESTAURANT_API_BASE_URL";

/// Backend-managed resource kinds, each with its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Clients,
    Dishes,
    Employees,
    Orders,
    OrderDetails,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Clients,
        ResourceKind::Dishes,
        ResourceKind::Employees,
        ResourceKind::Orders,
        ResourceKind::OrderDetails,
    ];

    /// Path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Clients => "clients",
            ResourceKind::Dishes => "menu",
            ResourceKind::Employees => "employees",
            ResourceKind::Orders => "orders",
            ResourceKind::OrderDetails => "order-details",
        }
    }

    /// Primary-key field name the backend uses on the wire.
    pub fn primary_key(&self) -> &'static str {
        match self {
            ResourceKind::Clients => "idClient",
            ResourceKind::Dishes => "idDish",
            ResourceKind::Employees => "idEmployee",
            ResourceKind::Orders => "idOrder",
            ResourceKind::OrderDetails => "idDetail",
        }
    }
}

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `RESTAURANT_API_BASE_URL`, loading a `.env` file first if one
    /// exists. Falls back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full base endpoint for a resource kind.
    pub fn endpoint(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.base_url, kind.path())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
