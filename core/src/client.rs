//! Generic CRUD client for one resource kind.
//!
//! # Design
//! `ResourceClient<R, T>` holds only the resource's base endpoint and a
//! transport. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! plain `list`/`get`/`create`/`update`/`delete` methods run the precondition
//! check, the transport round trip and the parse in sequence. Hosts that do
//! their own I/O can call the `build_*`/`parse_*` halves directly.
//!
//! Preconditions (non-empty id, required fields) are checked in the `build_*`
//! step, so a rejected call never reaches the transport.

use std::marker::PhantomData;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{normalize_collection, normalize_record};
use crate::transport::{Transport, UreqTransport};
use crate::types::{OrderDetail, Resource};

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub enum Created<R> {
    /// The server echoed the stored entity; its id is authoritative.
    Confirmed(R),
    /// The server answered 2xx without a JSON body. The entity is the input
    /// with a temporary id that must be replaced by the next list refresh.
    Provisional(R),
}

impl<R> Created<R> {
    pub fn is_provisional(&self) -> bool {
        matches!(self, Created::Provisional(_))
    }

    pub fn entity(&self) -> &R {
        match self {
            Created::Confirmed(entity) | Created::Provisional(entity) => entity,
        }
    }

    pub fn into_inner(self) -> R {
        match self {
            Created::Confirmed(entity) | Created::Provisional(entity) => entity,
        }
    }
}

/// Stateless CRUD client for resource type `R`.
#[derive(Debug)]
pub struct ResourceClient<R, T = UreqTransport> {
    endpoint: String,
    transport: T,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T: Clone> Clone for ResourceClient<R, T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

/// Trims `id` and checks it can be used as a single URL path segment. Only
/// unreserved characters (RFC 3986) are accepted.
fn require_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation("id is required".to_string()));
    }
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if !id.chars().all(unreserved) || id == "." || id == ".." {
        return Err(ApiError::Validation(format!("id {id:?} is not a valid path segment")));
    }
    Ok(id)
}

/// Map non-2xx responses to `ApiError::Network`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Network {
        status: response.status,
        status_text: response.status_text(),
        body: response.body.clone(),
    })
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DataShape(format!("invalid JSON body: {e}")))
}

fn from_value<R: Resource>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::DataShape(e.to_string()))
}

fn json_body<R: Resource>(entity: &R) -> Result<String, ApiError> {
    serde_json::to_string(entity).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn log_failure<V>(operation: &str, result: Result<V, ApiError>) -> Result<V, ApiError> {
    match &result {
        Err(err @ ApiError::Validation(_)) => {
            debug!(operation, error = %err, "rejected before sending");
        }
        Err(err) => warn!(operation, error = %err, "request failed"),
        Ok(_) => {}
    }
    result
}

impl<R: Resource> ResourceClient<R, UreqTransport> {
    /// Client backed by a fresh `UreqTransport`.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<R: Resource, T> ResourceClient<R, T> {
    pub fn with_transport(config: &ApiConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint(R::KIND),
            transport,
            _resource: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.endpoint.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id(id)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{id}", self.endpoint),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_create(&self, entity: &R) -> Result<HttpRequest, ApiError> {
        entity.validate()?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.endpoint.clone(),
            headers: json_headers(),
            body: Some(json_body(entity)?),
        })
    }

    pub fn build_update(&self, id: &str, entity: &R) -> Result<HttpRequest, ApiError> {
        let id = require_id(id)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/{id}", self.endpoint),
            headers: json_headers(),
            body: Some(json_body(entity)?),
        })
    }

    pub fn build_delete(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = require_id(id)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.endpoint),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_status(&response)?;
        let records = normalize_collection(R::KIND.primary_key(), parse_json(&response.body)?)?;
        debug!(resource = R::KIND.path(), count = records.len(), "normalized list");
        records.into_iter().map(from_value::<R>).collect()
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        from_value(normalize_record(R::KIND.primary_key(), parse_json(&response.body)?)?)
    }

    /// `input` is the entity that was sent; it becomes the provisional result
    /// when the server does not answer with JSON.
    pub fn parse_create(&self, input: &R, response: HttpResponse) -> Result<Created<R>, ApiError> {
        check_status(&response)?;
        if response.is_json() {
            let record = normalize_record(R::KIND.primary_key(), parse_json(&response.body)?)?;
            return Ok(Created::Confirmed(from_value(record)?));
        }
        let mut entity = input.clone();
        entity.set_id(temporary_id());
        warn!(
            resource = R::KIND.path(),
            id = entity.id(),
            "create returned no JSON body, using a temporary id"
        );
        Ok(Created::Provisional(entity))
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        from_value(normalize_record(R::KIND.primary_key(), parse_json(&response.body)?)?)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

impl<R: Resource, T: Transport> ResourceClient<R, T> {
    /// Every entity of this kind, in server order.
    pub fn list(&self) -> Result<Vec<R>, ApiError> {
        log_failure("list", self.transport.execute(self.build_list()).and_then(|r| self.parse_list(r)))
    }

    pub fn get(&self, id: &str) -> Result<R, ApiError> {
        log_failure(
            "get",
            self.build_get(id)
                .and_then(|req| self.transport.execute(req))
                .and_then(|r| self.parse_get(r)),
        )
    }

    pub fn create(&self, entity: &R) -> Result<Created<R>, ApiError> {
        let created = log_failure(
            "create",
            self.build_create(entity)
                .and_then(|req| self.transport.execute(req))
                .and_then(|r| self.parse_create(entity, r)),
        )?;
        info!(resource = R::KIND.path(), id = created.entity().id(), "created");
        Ok(created)
    }

    pub fn update(&self, id: &str, entity: &R) -> Result<R, ApiError> {
        let updated = log_failure(
            "update",
            self.build_update(id, entity)
                .and_then(|req| self.transport.execute(req))
                .and_then(|r| self.parse_update(r)),
        )?;
        info!(resource = R::KIND.path(), id = id.trim(), "updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        log_failure(
            "delete",
            self.build_delete(id)
                .and_then(|req| self.transport.execute(req))
                .and_then(|r| self.parse_delete(r)),
        )?;
        info!(resource = R::KIND.path(), id = id.trim(), "deleted");
        Ok(())
    }
}

impl<T> ResourceClient<OrderDetail, T> {
    pub fn build_list_for_order(&self, order_id: &str) -> Result<HttpRequest, ApiError> {
        let order_id = require_id(order_id)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/order/{order_id}", self.endpoint),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Unlike `parse_list`, a non-array body means "no lines" and yields an
    /// empty vec.
    pub fn parse_list_for_order(&self, response: HttpResponse) -> Result<Vec<OrderDetail>, ApiError> {
        check_status(&response)?;
        let value = parse_json(&response.body)?;
        if !value.is_array() {
            debug!("order detail lookup returned a non-array body");
            return Ok(Vec::new());
        }
        normalize_collection(OrderDetail::KIND.primary_key(), value)?
            .into_iter()
            .map(from_value::<OrderDetail>)
            .collect()
    }
}

impl<T: Transport> ResourceClient<OrderDetail, T> {
    /// Detail lines belonging to one order.
    pub fn list_for_order(&self, order_id: &str) -> Result<Vec<OrderDetail>, ApiError> {
        log_failure(
            "list_for_order",
            self.build_list_for_order(order_id)
                .and_then(|req| self.transport.execute(req))
                .and_then(|r| self.parse_list_for_order(r)),
        )
    }
}

/// Client-local placeholder id derived from the current time.
fn temporary_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
