mod common;

use std::sync::Arc;

use route_registry::database::connection::routes_table_exists;
use route_registry::models::route::{RegisterOutcome, Route};
use route_registry::repositories::route_repository::{PgRouteRepository, RouteRepository};
use route_registry::utils::errors::AppError;

const EPS: f64 = 1e-6;

fn route(id: i32, name: &str, load: f64, cargo: &str) -> Route {
    Route::new(id, name.to_string(), load, cargo.to_string())
}

#[tokio::test]
async fn test_schema_is_ready() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    assert!(routes_table_exists(&db.pool).await.unwrap());
}

#[tokio::test]
async fn test_get_by_id() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    let repo = PgRouteRepository::new(db.pool.clone());

    let found = repo.get_by_id(6).await.unwrap();
    assert_eq!(found.route_id, 6);
    assert_eq!(found.route_name, "test6");
    assert!((found.load - 6.0).abs() < EPS);
    assert_eq!(found.cargo_type, "cargo6");
    assert!(found.is_actual);

    let err = repo.get_by_id(100).await.unwrap_err();
    assert_eq!(err, AppError::NotFound("Route with id '100' not found".to_string()));
}

#[tokio::test]
async fn test_delete_by_ids() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    let repo = PgRouteRepository::new(db.pool.clone());

    assert_eq!(repo.delete_by_ids(&[4, 5]).await.unwrap(), 2);
    assert!(matches!(repo.get_by_id(4).await, Err(AppError::NotFound(_))));
    assert!(matches!(repo.get_by_id(5).await, Err(AppError::NotFound(_))));

    // Ids ausentes y lista vacía no fallan
    assert_eq!(repo.delete_by_ids(&[4, 5, 99]).await.unwrap(), 0);
    assert_eq!(repo.delete_by_ids(&[]).await.unwrap(), 0);
    assert!(repo.get_by_id(6).await.is_ok());
}

#[tokio::test]
async fn test_register_previously_deleted_id() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    let repo = PgRouteRepository::new(db.pool.clone());

    repo.delete_by_ids(&[4]).await.unwrap();

    let data = route(4, "after_delete_route", 1000.0, "cargo_type");
    let outcome = repo.register(&data).await.unwrap();
    assert_eq!(outcome, RegisterOutcome::Inserted { route_id: 4 });

    let found = repo.get_by_id(4).await.unwrap();
    assert_eq!(found.route_name, data.route_name);
    assert!((found.load - data.load).abs() < EPS);
    assert_eq!(found.cargo_type, data.cargo_type);
    assert!(found.is_actual);
}

#[tokio::test]
async fn test_register_existing_id() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    let repo = PgRouteRepository::new(db.pool.clone());

    let data = route(2, "already_existing_id", 2000.0, "cargo_type_2");
    let outcome = repo.register(&data).await.unwrap();
    assert_eq!(
        outcome,
        RegisterOutcome::Reassigned {
            route_id: 7,
            superseded_route_id: 2
        }
    );

    let moved = repo.get_by_id(7).await.unwrap();
    assert_eq!(moved.route_name, "already_existing_id");
    assert!((moved.load - 2000.0).abs() < EPS);
    assert_eq!(moved.cargo_type, "cargo_type_2");
    assert!(moved.is_actual);

    let original = repo.get_by_id(2).await.unwrap();
    assert_eq!(original.route_name, "test2");
    assert!(!original.is_actual);

    // Un segundo conflicto sobre el mismo id no reactiva la fila
    let outcome = repo.register(&data).await.unwrap();
    assert_eq!(outcome.route_id(), 8);
    assert!(!repo.get_by_id(2).await.unwrap().is_actual);
}

#[tokio::test]
async fn test_concurrent_registrations_get_distinct_ids() {
    let Some(db) = common::setup_test_database().await else {
        return;
    };
    let repo: Arc<dyn RouteRepository> = Arc::new(PgRouteRepository::new(db.pool.clone()));

    let calls = (0..8).map(|i| {
        let repo = repo.clone();
        async move {
            // La mitad colisiona con id 1, la otra mitad pide ids libres distintos
            let id = if i % 2 == 0 { 1 } else { 100 + i };
            repo.register(&route(id, "concurrent", 1.0, "sand")).await
        }
    });

    let mut ids: Vec<i32> = futures::future::join_all(calls)
        .await
        .into_iter()
        .map(|r| r.unwrap().route_id())
        .collect();
    ids.sort_unstable();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
