use kitchen_core::db::open_db_in_memory;
use kitchen_core::repo::cook_repo::{CookRepository, SqliteCookRepository};
use kitchen_core::{
    CatalogService, CookInput, DishInput, QueryService, ServiceError, ValidationError,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};

const DISH_NAMES: &[&str] = &[
    "Beef Wellington",
    "beef stew",
    "Roast Beef",
    "Apple Pie",
    "Crème Brûlée",
    "Caesar Salad",
    "Wellington Bites",
    "Onion Soup",
    "BEEFY Burger",
    "Pancakes",
    "Waffles",
    "Beefsteak Tomato",
];

fn seed_dishes(conn: &Connection) {
    let catalog = CatalogService::sqlite(conn).unwrap();
    let dish_type = catalog.create_dish_type("Any").unwrap();
    for name in DISH_NAMES {
        catalog
            .create_dish(DishInput {
                name: (*name).to_string(),
                description: "seed".to_string(),
                price: Decimal::new(500, 2),
                dish_type_id: dish_type.id,
                cook_ids: BTreeSet::new(),
            })
            .unwrap();
    }
}

fn seed_cook(conn: &Connection, username: &str, first: &str, last: &str, years: Option<i32>) {
    let catalog = CatalogService::sqlite(conn).unwrap();
    catalog
        .create_cook(CookInput {
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            years_of_experience: years,
        })
        .unwrap();
}

#[test]
fn dish_filter_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    seed_dishes(&conn);
    let query = QueryService::sqlite(&conn, 50).unwrap();

    for filter in ["beef", "WELLINGTON", "brûlée", "e", "zzz"] {
        let page = query.list_dishes(Some(filter), 1).unwrap();
        let expected = DISH_NAMES
            .iter()
            .filter(|name| name.to_lowercase().contains(&filter.to_lowercase()))
            .count();
        assert_eq!(page.total_count as usize, expected, "filter `{filter}`");
        assert_eq!(page.items.len(), expected, "filter `{filter}`");
        for record in &page.items {
            assert!(record
                .dish
                .name
                .to_lowercase()
                .contains(&filter.to_lowercase()));
        }
    }
}

#[test]
fn blank_filter_returns_full_set() {
    let conn = open_db_in_memory().unwrap();
    seed_dishes(&conn);
    let query = QueryService::sqlite(&conn, 50).unwrap();

    for filter in [None, Some(""), Some("   ")] {
        let page = query.list_dishes(filter, 1).unwrap();
        assert_eq!(page.total_count as usize, DISH_NAMES.len());
    }

    let trimmed = query.list_dishes(Some("  apple  "), 1).unwrap();
    assert_eq!(trimmed.total_count, 1);
}

#[test]
fn pages_partition_the_sorted_list() {
    let conn = open_db_in_memory().unwrap();
    seed_dishes(&conn);
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let first = query.list_dishes(None, 1).unwrap();
    let num_pages = first.num_pages();
    assert_eq!(num_pages, 3);

    let mut seen = HashSet::new();
    let mut all_names = Vec::new();
    for page_number in 1..=num_pages as u32 {
        let page = query.list_dishes(None, page_number).unwrap();
        assert!(page.items.len() <= 5);
        assert_eq!(page.total_count as usize, DISH_NAMES.len());
        for record in page.items {
            assert!(seen.insert(record.dish.id), "dish on two pages");
            all_names.push(record.dish.name);
        }
    }
    assert_eq!(all_names.len(), DISH_NAMES.len());

    let mut sorted = all_names.clone();
    sorted.sort();
    assert_eq!(all_names, sorted);
}

#[test]
fn page_past_the_end_is_empty_and_page_zero_is_invalid() {
    let conn = open_db_in_memory().unwrap();
    seed_dishes(&conn);
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let past_end = query.list_dishes(None, 9).unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total_count as usize, DISH_NAMES.len());
    assert!(!past_end.has_next());

    let err = query.list_dish_types(None, 0).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidPage)
    ));
    assert_eq!(err.field(), Some("page"));
}

#[test]
fn seven_cooks_split_five_and_two() {
    let conn = open_db_in_memory().unwrap();
    for index in 0..7 {
        seed_cook(&conn, &format!("cook{index}"), "", "", Some(index));
    }
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let first = query.list_cooks(Some(""), 1).unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.total_count, 7);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let second = query.list_cooks(Some(""), 2).unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(second.has_previous());
    assert!(!second.has_next());
    assert_eq!(second.items[0].username, "cook5");
    assert_eq!(second.items[1].username, "cook6");
}

#[test]
fn cooks_sort_by_experience_with_unknown_first() {
    let conn = open_db_in_memory().unwrap();
    seed_cook(&conn, "veteran", "", "", Some(30));
    seed_cook(&conn, "unknown", "", "", None);
    seed_cook(&conn, "b_mid", "", "", Some(5));
    seed_cook(&conn, "a_mid", "", "", Some(5));
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let usernames = query
        .list_cooks(None, 1)
        .unwrap()
        .items
        .into_iter()
        .map(|cook| cook.username)
        .collect::<Vec<_>>();
    assert_eq!(usernames, vec!["unknown", "a_mid", "b_mid", "veteran"]);
}

#[test]
fn cook_filter_matches_first_or_last_name() {
    let conn = open_db_in_memory().unwrap();
    seed_cook(&conn, "gr", "Gordon", "Ramsay", Some(25));
    seed_cook(&conn, "jo", "Jamie", "Oliver", Some(20));
    seed_cook(&conn, "ramsay_fan", "Ann", "Smith", Some(1));
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let by_last = query.list_cooks(Some("RAMS"), 1).unwrap();
    assert_eq!(by_last.total_count, 1);
    assert_eq!(by_last.items[0].username, "gr");

    let by_first = query.list_cooks(Some("jam"), 1).unwrap();
    assert_eq!(by_first.items[0].username, "jo");

    let either = query.list_cooks(Some("o"), 1).unwrap();
    assert_eq!(either.total_count, 2);
}

#[test]
fn page_size_is_normalized() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(QueryService::sqlite(&conn, 0).unwrap().page_size(), 5);
    assert_eq!(QueryService::sqlite(&conn, 80).unwrap().page_size(), 50);
    assert_eq!(QueryService::sqlite(&conn, 12).unwrap().page_size(), 12);
}

#[test]
fn overview_counts_every_entity() {
    let conn = open_db_in_memory().unwrap();
    seed_dishes(&conn);
    seed_cook(&conn, "one", "", "", None);
    seed_cook(&conn, "two", "", "", None);
    let query = QueryService::sqlite(&conn, 5).unwrap();

    let overview = query.overview().unwrap();
    assert_eq!(overview.num_dish_types, 1);
    assert_eq!(overview.num_dishes as usize, DISH_NAMES.len());
    assert_eq!(overview.num_cooks, 2);

    let repo = SqliteCookRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_cooks().unwrap(), overview.num_cooks);
}
