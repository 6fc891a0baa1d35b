use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::{Engine, EngineError, NewUser, StoreDraft};
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

async fn admin(engine: &Engine, db: &DatabaseConnection) -> engine::users::Model {
    let id = engine
        .register_user(NewUser {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "password".to_string(),
        })
        .await
        .unwrap();
    let user = engine::users::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: engine::users::ActiveModel = user.into();
    active.is_admin = ActiveValue::Set(true);
    active.update(db).await.unwrap()
}

fn draft(name: &str, region: &str) -> StoreDraft {
    StoreDraft {
        name: name.to_string(),
        address: format!("1 {name} Street"),
        region: region.to_string(),
        weekday_hours: Some("08:00-18:00".to_string()),
        saturday_hours: Some("09:00-13:00".to_string()),
        sunday_hours: None,
        map_link: None,
    }
}

#[tokio::test]
async fn store_writes_require_admin() {
    let (engine, _db) = engine_with_db().await;
    engine
        .register_user(NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password".to_string(),
        })
        .await
        .unwrap();
    let alice = engine.authenticate("alice", "password").await.unwrap();

    let err = engine
        .create_store(&alice, draft("Depot", "North"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn create_and_fetch_store() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;

    let id = engine
        .create_store(&root, draft("Depot", "North"))
        .await
        .unwrap();

    let store = engine.store(id).await.unwrap();
    assert_eq!(store.name, "Depot");
    assert_eq!(store.region, "North");
    assert_eq!(store.sunday_hours, None);
}

#[tokio::test]
async fn create_store_rejects_blank_name() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;

    let mut bad = draft("Depot", "North");
    bad.name = "   ".to_string();
    let err = engine.create_store(&root, bad).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn list_is_ordered_by_name() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;

    engine
        .create_store(&root, draft("Zefier", "South"))
        .await
        .unwrap();
    engine
        .create_store(&root, draft("Anker", "North"))
        .await
        .unwrap();

    let names: Vec<String> = engine
        .list_stores()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Anker".to_string(), "Zefier".to_string()]);
}

#[tokio::test]
async fn search_matches_name_address_and_region() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;

    engine
        .create_store(&root, draft("Anker", "North"))
        .await
        .unwrap();
    engine
        .create_store(&root, draft("Zefier", "South"))
        .await
        .unwrap();

    let by_name = engine.search_stores("Anker").await.unwrap();
    assert_eq!(by_name.len(), 1);

    let by_address = engine.search_stores("Zefier Street").await.unwrap();
    assert_eq!(by_address.len(), 1);

    let by_region = engine.search_stores("South").await.unwrap();
    assert_eq!(by_region.len(), 1);

    // A blank query falls back to the full directory.
    let all = engine.search_stores("   ").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;
    let id = engine
        .create_store(&root, draft("Depot", "North"))
        .await
        .unwrap();

    let mut changed = draft("Depot", "East");
    changed.sunday_hours = Some("10:00-16:00".to_string());
    changed.weekday_hours = None;
    engine.update_store(&root, id, changed).await.unwrap();

    let store = engine.store(id).await.unwrap();
    assert_eq!(store.region, "East");
    assert_eq!(store.sunday_hours, Some("10:00-16:00".to_string()));
    assert_eq!(store.weekday_hours, None);
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let (engine, db) = engine_with_db().await;
    let root = admin(&engine, &db).await;
    let id = engine
        .create_store(&root, draft("Depot", "North"))
        .await
        .unwrap();

    engine.delete_store(&root, id).await.unwrap();

    let err = engine.store(id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn missing_store_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.store(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
