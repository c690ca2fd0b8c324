use kitchen_core::db::open_db_in_memory;
use kitchen_core::repo::dish_repo::{DishRepository, SqliteDishRepository};
use kitchen_core::repo::dish_type_repo::{DishTypeRepository, SqliteDishTypeRepository};
use kitchen_core::{
    CatalogService, CookInput, DishInput, DishType, EntityKind, QueryService, RepoError,
    ServiceError, ValidationError,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use uuid::Uuid;

fn dish_input(name: &str, dish_type_id: Uuid) -> DishInput {
    DishInput {
        name: name.to_string(),
        description: format!("{name} description"),
        price: Decimal::new(1250, 2),
        dish_type_id,
        cook_ids: BTreeSet::new(),
    }
}

fn relation_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM dish_cooks;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_get_update_dish_type() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDishTypeRepository::try_new(&conn).unwrap();

    let dish_type = DishType::new("Soup");
    repo.create_dish_type(&dish_type).unwrap();
    assert_eq!(repo.get_dish_type(dish_type.id).unwrap(), Some(dish_type.clone()));

    let renamed = DishType::with_id(dish_type.id, "Soups & Stews");
    repo.update_dish_type(&renamed).unwrap();
    assert_eq!(
        repo.get_dish_type(dish_type.id).unwrap().unwrap().name,
        "Soups & Stews"
    );
    assert_eq!(repo.count_dish_types().unwrap(), 1);
}

#[test]
fn update_missing_dish_type_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDishTypeRepository::try_new(&conn).unwrap();

    let ghost = DishType::new("Ghost");
    let err = repo.update_dish_type(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::DishType,
            id
        } if id == ghost.id
    ));
}

#[test]
fn blank_or_overlong_names_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::sqlite(&conn).unwrap();

    let err = catalog.create_dish_type("   ").unwrap_err();
    assert_eq!(err.field(), Some("name"));

    let err = catalog.create_dish_type(&"x".repeat(256)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TooLong {
            field: "name",
            max_chars: 255
        })
    ));

    let repo = SqliteDishTypeRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_dish_types().unwrap(), 0);
}

#[test]
fn catalog_trims_dish_type_names() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::sqlite(&conn).unwrap();

    let created = catalog.create_dish_type("  Dessert ").unwrap();
    assert_eq!(created.name, "Dessert");
}

#[test]
fn deleting_dish_type_removes_exactly_its_dishes() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::sqlite(&conn).unwrap();

    let mains = catalog.create_dish_type("Main Course").unwrap();
    let desserts = catalog.create_dish_type("Dessert").unwrap();
    let cook = catalog
        .create_cook(CookInput {
            username: "chef".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            years_of_experience: Some(3),
        })
        .unwrap();

    let mut with_cook = dish_input("Steak", mains.id);
    with_cook.cook_ids.insert(cook.id);
    catalog.create_dish(with_cook).unwrap();
    catalog.create_dish(dish_input("Ribs", mains.id)).unwrap();
    catalog.create_dish(dish_input("Burger", mains.id)).unwrap();
    let tiramisu = catalog.create_dish(dish_input("Tiramisu", desserts.id)).unwrap();
    assert_eq!(relation_count(&conn), 1);

    let removed = catalog.delete_dish_type(mains.id).unwrap();
    assert_eq!(removed, 3);

    let query = QueryService::sqlite(&conn, 50).unwrap();
    let remaining = query.list_dishes(None, 1).unwrap();
    assert_eq!(remaining.total_count, 1);
    assert_eq!(remaining.items[0].dish.id, tiramisu.dish.id);
    for record in &remaining.items {
        assert!(query.get_dish_type_detail(record.dish.dish_type_id).is_ok());
    }

    assert_eq!(relation_count(&conn), 0);
    assert!(query.get_cook_detail(cook.id).is_ok());
    assert!(matches!(
        query.get_dish_type_detail(mains.id).unwrap_err(),
        ServiceError::NotFound {
            entity: EntityKind::DishType,
            ..
        }
    ));
}

#[test]
fn deleting_missing_dish_type_returns_not_found_and_keeps_data() {
    let conn = open_db_in_memory().unwrap();
    let types = SqliteDishTypeRepository::try_new(&conn).unwrap();
    let dishes = SqliteDishRepository::try_new(&conn).unwrap();
    types.create_dish_type(&DishType::new("Soup")).unwrap();

    let err = types.delete_dish_type(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
    assert_eq!(types.count_dish_types().unwrap(), 1);
    assert_eq!(dishes.count_dishes().unwrap(), 0);
}

#[test]
fn dish_type_detail_lists_its_dishes_by_name() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::sqlite(&conn).unwrap();
    let soup = catalog.create_dish_type("Soup").unwrap();
    let other = catalog.create_dish_type("Other").unwrap();
    catalog.create_dish(dish_input("Minestrone", soup.id)).unwrap();
    catalog.create_dish(dish_input("Borscht", soup.id)).unwrap();
    catalog.create_dish(dish_input("Bread", other.id)).unwrap();

    let query = QueryService::sqlite(&conn, 5).unwrap();
    let detail = query.get_dish_type_detail(soup.id).unwrap();
    assert_eq!(detail.dish_type, soup);
    let names = detail
        .dishes
        .iter()
        .map(|record| record.dish.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Borscht", "Minestrone"]);
    assert!(detail.dishes.iter().all(|record| record.dish_type == soup));
}
