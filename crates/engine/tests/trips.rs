use chrono::{NaiveDate, Utc};
use sea_orm::{Database, DatabaseConnection, EntityTrait};

use engine::{Engine, EngineError, NewUser, TripDraft, payout};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .reset_secret("test-secret")
        .build()
        .unwrap();
    (engine, db)
}

async fn register(engine: &Engine, username: &str) -> String {
    engine
        .register_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "password".to_string(),
        })
        .await
        .unwrap()
}

async fn login(engine: &Engine, username: &str) -> engine::users::Model {
    engine.authenticate(username, "password").await.unwrap()
}

fn march_draft() -> TripDraft {
    TripDraft {
        date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        vehicle: "AB-123-C".to_string(),
        stops: 10.0,
        km: 100.0,
        loaded_pallets: 5.0,
        empty_crates: 2.0,
        returned_pallets: 3.0,
        weekend: false,
    }
}

#[tokio::test]
async fn create_trip_derives_month_and_payout() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;
    let alice = login(&engine, "alice").await;

    let trip_id = engine.create_trip(&user_id, march_draft()).await.unwrap();

    let trip = engine.trip(&alice, trip_id).await.unwrap();
    assert_eq!(trip.month, "2024-03");
    assert!((trip.payout - 33.12).abs() < 1e-9);
}

#[tokio::test]
async fn weekend_surcharge_spares_empty_crates() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;
    let alice = login(&engine, "alice").await;

    let mut draft = march_draft();
    draft.date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    draft.weekend = true;
    let trip_id = engine.create_trip(&user_id, draft).await.unwrap();

    let trip = engine.trip(&alice, trip_id).await.unwrap();
    // base 33.12, crates part 1.00 stays flat: (33.12 - 1.00) * 1.2 + 1.00
    assert!((trip.payout - 39.544).abs() < 1e-9);
}

#[tokio::test]
async fn create_trip_rejects_unknown_owner() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_trip("no-such-user", march_draft())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn create_trip_rejects_negative_metrics() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;

    let mut draft = march_draft();
    draft.km = -1.0;
    let err = engine.create_trip(&user_id, draft).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn fleet_allow_list_rejects_unknown_vehicle() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .fleet(vec!["AB-123-C".to_string()])
        .reset_secret("test-secret")
        .build()
        .unwrap();
    let user_id = register(&engine, "alice").await;

    let mut draft = march_draft();
    draft.vehicle = "ZZ-999-X".to_string();
    let err = engine.create_trip(&user_id, draft).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // The listed vehicle still goes through.
    engine.create_trip(&user_id, march_draft()).await.unwrap();
}

#[tokio::test]
async fn update_trip_recomputes_month_and_payout() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;
    let alice = login(&engine, "alice").await;
    let trip_id = engine.create_trip(&user_id, march_draft()).await.unwrap();

    let mut draft = march_draft();
    draft.date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    draft.km = 50.0;
    engine.update_trip(&alice, trip_id, draft).await.unwrap();

    let trip = engine.trip(&alice, trip_id).await.unwrap();
    assert_eq!(trip.month, "2024-04");
    assert!((trip.payout - 28.12).abs() < 1e-9);
}

#[tokio::test]
async fn update_trip_is_owner_only() {
    let (engine, _db) = engine_with_db().await;
    let alice_id = register(&engine, "alice").await;
    register(&engine, "bob").await;
    let bob = login(&engine, "bob").await;

    let trip_id = engine.create_trip(&alice_id, march_draft()).await.unwrap();

    let err = engine
        .update_trip(&bob, trip_id, march_draft())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn delete_trip_rejects_stranger_and_keeps_record() {
    let (engine, _db) = engine_with_db().await;
    let alice_id = register(&engine, "alice").await;
    register(&engine, "bob").await;
    let alice = login(&engine, "alice").await;
    let bob = login(&engine, "bob").await;

    let trip_id = engine.create_trip(&alice_id, march_draft()).await.unwrap();

    let err = engine.delete_trip(&bob, trip_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    engine.trip(&alice, trip_id).await.unwrap();
}

#[tokio::test]
async fn admin_may_delete_another_users_trip() {
    let (engine, db) = engine_with_db().await;
    let alice_id = register(&engine, "alice").await;
    let root_id = register(&engine, "root").await;
    make_admin(&db, &root_id).await;
    let root = login(&engine, "root").await;

    let trip_id = engine.create_trip(&alice_id, march_draft()).await.unwrap();
    engine.delete_trip(&root, trip_id).await.unwrap();

    let err = engine.trip(&root, trip_id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn list_trips_filters_by_month_scope() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;

    engine.create_trip(&user_id, march_draft()).await.unwrap();
    let mut april = march_draft();
    april.date = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
    engine.create_trip(&user_id, april).await.unwrap();

    let (month, records) = engine.list_trips(&user_id, Some("2024-03")).await.unwrap();
    assert_eq!(month, "2024-03");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].month, "2024-03");
}

#[tokio::test]
async fn list_trips_defaults_to_current_month() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;

    let mut draft = march_draft();
    draft.date = Utc::now().date_naive();
    engine.create_trip(&user_id, draft).await.unwrap();

    let (month, records) = engine.list_trips(&user_id, None).await.unwrap();
    assert_eq!(month, payout::month_key(Utc::now().date_naive()));
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn list_trips_rejects_malformed_month() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;

    for month in ["2024-13", "march", "2024-3", "2024-03-01"] {
        let err = engine.list_trips(&user_id, Some(month)).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "month {month}");
    }
}

#[tokio::test]
async fn listed_month_aggregates_raw_fields_and_payout() {
    let (engine, _db) = engine_with_db().await;
    let user_id = register(&engine, "alice").await;

    engine.create_trip(&user_id, march_draft()).await.unwrap();
    engine.create_trip(&user_id, march_draft()).await.unwrap();

    let (month, records) = engine.list_trips(&user_id, Some("2024-03")).await.unwrap();
    let totals = payout::aggregate(records.iter());
    assert_eq!(month, "2024-03");
    assert!((totals.km - 200.0).abs() < 1e-9);
    assert!((totals.stops - 20.0).abs() < 1e-9);
    assert!((totals.payout - 66.24).abs() < 1e-9);
}

#[tokio::test]
async fn trips_are_scoped_per_user() {
    let (engine, _db) = engine_with_db().await;
    let alice_id = register(&engine, "alice").await;
    let bob_id = register(&engine, "bob").await;

    engine.create_trip(&alice_id, march_draft()).await.unwrap();

    let (_, records) = engine.list_trips(&bob_id, Some("2024-03")).await.unwrap();
    assert!(records.is_empty());
}

async fn make_admin(db: &DatabaseConnection, user_id: &str) {
    use sea_orm::{ActiveModelTrait, ActiveValue};

    let user = engine::users::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: engine::users::ActiveModel = user.into();
    active.is_admin = ActiveValue::Set(true);
    active.update(db).await.unwrap();
}
