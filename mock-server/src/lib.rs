use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const API_PREFIX: &str = "/api";

/// Path segment and backend primary-key name of every collection.
pub const RESOURCES: [(&str, &str); 5] = [
    ("clients", "idClient"),
    ("menu", "idDish"),
    ("employees", "idEmployee"),
    ("orders", "idOrder"),
    ("order-details", "idDetail"),
];

#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// When false, POST answers `201` with an empty `text/plain` body instead
    /// of the stored record.
    pub echo_created: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { echo_created: true }
    }
}

#[derive(Debug)]
pub struct Table {
    key: &'static str,
    next_id: u64,
    rows: BTreeMap<u64, Map<String, Value>>,
}

pub type Db = Arc<RwLock<Table>>;

#[derive(Clone)]
struct Collection {
    table: Db,
    echo_created: bool,
}

pub fn app() -> Router {
    app_with(Options::default())
}

pub fn app_with(options: Options) -> Router {
    let mut router = Router::new();
    for (path, key) in RESOURCES {
        let collection = Collection {
            table: Arc::new(RwLock::new(Table {
                key,
                next_id: 0,
                rows: BTreeMap::new(),
            })),
            echo_created: options.echo_created,
        };
        let mut routes = Router::new()
            .route(&format!("{API_PREFIX}/{path}"), get(list).post(create))
            .route(
                &format!("{API_PREFIX}/{path}/{{id}}"),
                get(fetch).put(update).delete(remove),
            );
        if path == "order-details" {
            routes = routes.route(
                &format!("{API_PREFIX}/{path}/order/{{order_id}}"),
                get(list_for_order),
            );
        }
        router = router.merge(routes.with_state(collection));
    }
    router
}

pub async fn run(listener: TcpListener, options: Options) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list(State(c): State<Collection>) -> Json<Vec<Value>> {
    let table = c.table.read().await;
    Json(table.rows.values().cloned().map(Value::Object).collect())
}

async fn create(
    State(c): State<Collection>,
    Json(input): Json<Value>,
) -> Result<Response, StatusCode> {
    let Value::Object(mut record) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut table = c.table.write().await;
    table.next_id += 1;
    let id = table.next_id;
    record.remove("id");
    record.insert(table.key.to_string(), Value::from(id));
    table.rows.insert(id, record.clone());
    info!(key = table.key, id, "created");

    if c.echo_created {
        Ok((StatusCode::CREATED, Json(Value::Object(record))).into_response())
    } else {
        Ok((StatusCode::CREATED, "").into_response())
    }
}

async fn fetch(
    State(c): State<Collection>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let table = c.table.read().await;
    table
        .rows
        .get(&id)
        .cloned()
        .map(|row| Json(Value::Object(row)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update(
    State(c): State<Collection>,
    Path(id): Path<u64>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let Value::Object(fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut table = c.table.write().await;
    let key = table.key;
    let row = table.rows.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    for (name, value) in fields {
        if name != "id" && name != key {
            row.insert(name, value);
        }
    }
    info!(key, id, "updated");
    Ok(Json(Value::Object(row.clone())))
}

async fn remove(State(c): State<Collection>, Path(id): Path<u64>) -> StatusCode {
    let mut table = c.table.write().await;
    match table.rows.remove(&id) {
        Some(_) => {
            info!(key = table.key, id, "deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_for_order(
    State(c): State<Collection>,
    Path(order_id): Path<String>,
) -> Json<Vec<Value>> {
    let table = c.table.read().await;
    Json(
        table
            .rows
            .values()
            .filter(|row| row.get("idOrder").is_some_and(|v| id_text(v) == order_id))
            .cloned()
            .map(Value::Object)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_text_accepts_numbers_and_strings() {
        assert_eq!(id_text(&json!(5)), "5");
        assert_eq!(id_text(&json!("5")), "5");
    }

    #[test]
    fn resource_keys_are_unique() {
        let mut keys: Vec<_> = RESOURCES.iter().map(|(_, key)| *key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), RESOURCES.len());
    }

    #[test]
    fn echo_is_on_by_default() {
        assert!(Options::default().echo_created);
    }
}
