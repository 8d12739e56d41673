//! Full CRUD lifecycle tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then exercises the
//! resource clients over real HTTP through `UreqTransport`.

use mock_server::Options;
use restaurant_core::{
    ApiConfig, ApiError, Client, Dish, Employee, Order, OrderDetail, OrderStatus, RestaurantApi,
};

/// Start a mock backend on a random port and return its API base URL.
fn spawn_server(options: Options) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, options).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

fn api(options: Options) -> RestaurantApi {
    RestaurantApi::new(&ApiConfig::new(&spawn_server(options)))
}

fn ana() -> Client {
    Client {
        first_name: "Ana".to_string(),
        last_name: "Ruiz".to_string(),
        email: "a@x.com".to_string(),
        phone: "555".to_string(),
        ..Default::default()
    }
}

#[test]
fn client_crud_lifecycle() {
    let api = api(Options::default());
    let clients = &api.clients;

    // Step 1: list: should be empty.
    assert!(clients.list().unwrap().is_empty(), "expected empty list");

    // Step 2: create; the server echoes the record with its key.
    let created = clients.create(&ana()).unwrap();
    assert!(!created.is_provisional());
    let created = created.into_inner();
    assert_eq!(created.id, "1");
    assert_eq!(created.extra["idClient"], 1);
    assert_eq!(created.first_name, "Ana");

    // Step 3: get.
    let fetched = clients.get(&created.id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update, then read it back.
    let edited = Client {
        email: "ana.ruiz@x.com".to_string(),
        ..fetched
    };
    let updated = clients.update(&edited.id, &edited).unwrap();
    assert_eq!(updated.email, "ana.ruiz@x.com");
    assert_eq!(updated.id, "1");

    // Step 5: list: one item, normalized.
    let all = clients.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "1");

    // Step 6: delete.
    clients.delete("1").unwrap();

    // Step 7: get after delete: Network 404.
    let err = clients.get("1").unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Step 8: delete again: Network 404.
    let err = clients.delete("1").unwrap_err();
    assert!(matches!(err, ApiError::Network { status: 404, .. }));

    assert!(clients.list().unwrap().is_empty(), "expected empty list after delete");
}

#[test]
fn update_then_get_round_trips_business_fields() {
    let api = api(Options::default());
    let employee = Employee {
        first_name: "Luis".to_string(),
        last_name: "Mora".to_string(),
        position: "cook".to_string(),
        salary: 2_000_000.0,
        ..Default::default()
    };
    let id = api.employees.create(&employee).unwrap().into_inner().id;

    let promoted = Employee {
        position: "head chef".to_string(),
        salary: 3_500_000.0,
        ..employee
    };
    api.employees.update(&id, &promoted).unwrap();

    let fetched = api.employees.get(&id).unwrap();
    assert_eq!(fetched.first_name, promoted.first_name);
    assert_eq!(fetched.last_name, promoted.last_name);
    assert_eq!(fetched.position, promoted.position);
    assert_eq!(fetched.salary, promoted.salary);
}

#[test]
fn create_without_echo_is_provisional() {
    let api = api(Options { echo_created: false });
    let soup = Dish {
        name: "Soup".to_string(),
        description: "Hot".to_string(),
        price: 12000.0,
        ..Default::default()
    };

    let created = api.dishes.create(&soup).unwrap();
    assert!(created.is_provisional());
    let dish = created.into_inner();
    assert!(!dish.id.is_empty());
    assert_eq!(Dish { id: String::new(), ..dish }, soup);

    // The server assigned its own key; a refresh replaces the temporary id.
    let listed = api.dishes.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "1");
}

#[test]
fn get_unknown_id_is_network_404() {
    let api = api(Options::default());
    let err = api.orders.get("99").unwrap_err();
    match err {
        ApiError::Network {
            status,
            status_text,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("expected Network, got {other:?}"),
    }
}

#[test]
fn orders_and_details() {
    let api = api(Options::default());
    let customer = api.clients.create(&ana()).unwrap().into_inner();

    let order = Order {
        id_customer: customer.id.clone(),
        date: "2024-05-01T12:30:00Z".to_string(),
        status: "PENDING".to_string(),
        ..Default::default()
    };
    let order = api.orders.create(&order).unwrap().into_inner();
    assert_eq!(order.id, "1");
    assert_eq!(order.id_customer, customer.id);
    assert_eq!(order.canonical_status(), Some(OrderStatus::Pending));

    for dish in ["3", "4"] {
        let line = OrderDetail {
            id_order: order.id.clone(),
            id_dish: dish.to_string(),
            quantity: 2,
            ..Default::default()
        };
        api.order_details.create(&line).unwrap();
    }

    let lines = api.order_details.list_for_order(&order.id).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].id, "1");
    assert_eq!(lines[1].id_dish, "4");
    assert!(api.order_details.list_for_order("999").unwrap().is_empty());
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let api = RestaurantApi::new(&ApiConfig::new(&format!("http://{addr}/api")));
    let err = api.clients.list().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
