use plantcatalog_core::db::migrations::latest_version;
use plantcatalog_core::db::open_db_in_memory;
use plantcatalog_core::{
    Plant, PlantKey, PlantListQuery, PlantRepository, PlantValidationError, RepoError,
    SqlitePlantRepository,
};
use rusqlite::Connection;

fn plant(catalog_number: &str, name: &str, food_type: &str) -> Plant {
    Plant::new(catalog_number, name, "Shrub", food_type, 4, true)
}

#[test]
fn create_and_get_roundtrip_assigns_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let source = Plant::new("RUBU-0001", "Raspberry", "Shrub", "Berry", 12, true);
    let id = repo.create_plant(&source).unwrap();

    let loaded = repo.get_plant_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.catalog_number, "RUBU-0001");
    assert_eq!(loaded.name, "Raspberry");
    assert_eq!(loaded.plant_type, "Shrub");
    assert_eq!(loaded.food_type, "Berry");
    assert_eq!(loaded.quantity, 12);
    assert!(loaded.is_edible);

    let by_catalog = repo.get_plant_by_catalog_number("RUBU-0001").unwrap();
    assert_eq!(by_catalog, Some(loaded));
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    assert!(repo.get_plant_by_id(42).unwrap().is_none());
    assert!(repo.get_plant_by_catalog_number("NONE-0000").unwrap().is_none());
}

#[test]
fn create_rejects_invalid_plant_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let err = repo
        .create_plant(&plant("ABCD9876", "Bad", "Leaf"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PlantValidationError::MalformedCatalogNumber(_))
    ));
    assert_eq!(repo.count_plants().unwrap(), 0);
}

#[test]
fn create_duplicate_catalog_number_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    repo.create_plant(&plant("ROSA-0001", "Rose", "Hip")).unwrap();
    let err = repo
        .create_plant(&plant("ROSA-0001", "Other rose", "Hip"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCatalogNumber(ref value) if value == "ROSA-0001"));
}

#[test]
fn update_by_id_can_change_catalog_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let id = repo.create_plant(&plant("ROSA-0001", "Rose", "Hip")).unwrap();
    let mut stored = repo.get_plant_by_id(id).unwrap().unwrap();
    stored.catalog_number = "ROSA-0002".to_string();
    stored.quantity = 1;
    repo.update_plant(&stored).unwrap();

    assert!(repo.get_plant_by_catalog_number("ROSA-0001").unwrap().is_none());
    let reloaded = repo.get_plant_by_id(id).unwrap().unwrap();
    assert_eq!(reloaded.catalog_number, "ROSA-0002");
    assert_eq!(reloaded.quantity, 1);
}

#[test]
fn update_without_id_targets_catalog_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let id = repo.create_plant(&plant("ROSA-0001", "Rose", "Hip")).unwrap();
    let mut changes = plant("ROSA-0001", "Dog rose", "Hip");
    changes.is_edible = false;
    repo.update_plant(&changes).unwrap();

    let reloaded = repo.get_plant_by_id(id).unwrap().unwrap();
    assert_eq!(reloaded.name, "Dog rose");
    assert!(!reloaded.is_edible);
}

#[test]
fn update_not_found_reports_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let mut missing = plant("ROSA-0001", "Rose", "Hip");
    let err = repo.update_plant(&missing).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(PlantKey::CatalogNumber(ref value)) if value == "ROSA-0001"
    ));

    missing.id = Some(77);
    let err = repo.update_plant(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(PlantKey::Id(77))));
}

#[test]
fn update_into_taken_catalog_number_is_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    repo.create_plant(&plant("ROSA-0001", "Rose", "Hip")).unwrap();
    let id = repo.create_plant(&plant("ROSA-0002", "Rose 2", "Hip")).unwrap();

    let mut second = repo.get_plant_by_id(id).unwrap().unwrap();
    second.catalog_number = "ROSA-0001".to_string();
    let err = repo.update_plant(&second).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCatalogNumber(_)));
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    repo.create_plant(&plant("ROSA-0001", "Rose", "Hip")).unwrap();
    repo.create_plant(&plant("ROSA-0002", "Rose 2", "Hip")).unwrap();

    repo.delete_plant_by_catalog_number("ROSA-0001").unwrap();

    assert_eq!(repo.count_plants().unwrap(), 1);
    assert!(repo.get_plant_by_catalog_number("ROSA-0002").unwrap().is_some());

    let err = repo.delete_plant_by_catalog_number("ROSA-0001").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn list_filters_by_food_type_case_insensitively_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let a = repo.create_plant(&plant("APPL-0001", "Apple", "Fruit")).unwrap();
    repo.create_plant(&plant("OCIM-0001", "Basil", "Leaf")).unwrap();
    let c = repo.create_plant(&plant("PRUN-0001", "Plum", "fruit")).unwrap();

    let query = PlantListQuery {
        food_type: Some("FRUIT".to_string()),
        ..PlantListQuery::default()
    };
    let ids: Vec<_> = repo
        .list_plants(&query)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![Some(a), Some(c)]);
}

#[test]
fn list_pagination_with_limit_and_offset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    for (index, name) in ["a", "b", "c", "d"].iter().enumerate() {
        repo.create_plant(&plant(&format!("PAGE-000{index}"), name, "Leaf"))
            .unwrap();
    }

    let page = repo
        .list_plants(&PlantListQuery {
            limit: Some(2),
            offset: 1,
            ..PlantListQuery::default()
        })
        .unwrap();
    let names: Vec<_> = page.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);

    let tail = repo
        .list_plants(&PlantListQuery {
            offset: 3,
            ..PlantListQuery::default()
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].name, "d");
}

#[test]
fn read_rejects_invalid_persisted_row() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO plants (catalog_number, name, is_edible) VALUES ('ROSA-0001', 'Rose', 2);",
        [],
    )
    .unwrap_err();
    conn.execute(
        "INSERT INTO plants (catalog_number, name) VALUES ('rosa', 'Rose');",
        [],
    )
    .unwrap();
    let repo = SqlitePlantRepository::try_new(&conn).unwrap();

    let err = repo.get_plant_by_catalog_number("rosa").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePlantRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_plants_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqlitePlantRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("plants"))
    ));
}

#[test]
fn repository_rejects_plants_table_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE plants (
            id INTEGER PRIMARY KEY,
            catalog_number TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqlitePlantRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "plants",
            column: "plant_type"
        })
    ));
}
