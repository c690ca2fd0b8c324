use axum::body::{to_bytes, Body};
use axum::Router;
use axum::http::{Method, Request, StatusCode};
use kitchen_core::{open_db, CatalogService, CookInput};
use kitchen_http::extract::COOK_ID_HEADER;
use kitchen_http::middleware::REQUEST_ID_HEADER;
use kitchen_http::{router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    _dir: TempDir,
    app: Router,
    cook_id: Uuid,
}

fn setup(page_size: u32) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("kitchen.sqlite3");
    let conn = open_db(&db_path).unwrap();
    let cook = CatalogService::sqlite(&conn)
        .unwrap()
        .create_cook(CookInput {
            username: "chef".to_string(),
            first_name: "Gordon".to_string(),
            last_name: "Ramsay".to_string(),
            years_of_experience: Some(25),
        })
        .unwrap();
    drop(conn);

    TestApp {
        app: router(AppState::new(db_path, page_size)),
        _dir: dir,
        cook_id: cook.id,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_as(Some(self.cook_id), method, uri, body).await
    }

    async fn send_as(
        &self,
        cook_id: Option<Uuid>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cook_id) = cook_id {
            builder = builder.header(COOK_ID_HEADER, cook_id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = setup(5);
    let response = app
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn missing_or_unknown_identity_is_unauthorized() {
    let app = setup(5);

    let (status, body) = app.send_as(None, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, _) = app
        .send_as(Some(Uuid::new_v4()), Method::GET, "/dishes", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn beef_wellington_over_http() {
    let app = setup(5);

    let (status, dish_type) = app
        .send(Method::POST, "/dish-types", Some(json!({ "name": "Main Course" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, dish) = app
        .send(
            Method::POST,
            "/dishes",
            Some(json!({
                "name": "Beef Wellington",
                "description": "Fillet in puff pastry",
                "price": "250.00",
                "dish_type_id": dish_type["id"],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dish["price"], "250.00");
    assert_eq!(dish["dish_type"]["name"], "Main Course");

    let dish_id = dish["id"].as_str().unwrap();
    let (status, outcome) = app
        .send(
            Method::POST,
            &format!("/dishes/{dish_id}/toggle-assignment"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "now_assigned": true }));

    let (status, listing) = app
        .send(Method::GET, "/dishes?name=wellington&page=1", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total_count"], 1);
    assert_eq!(listing["search_form"]["name"], "wellington");
    assert_eq!(listing["items"][0]["cooks"][0]["username"], "chef");

    let (_, outcome) = app
        .send(
            Method::POST,
            &format!("/dishes/{dish_id}/toggle-assignment"),
            None,
        )
        .await;
    assert_eq!(outcome, json!({ "now_assigned": false }));
}

#[tokio::test]
async fn cook_listing_pages_and_accepts_cook_alias() {
    let app = setup(5);
    for index in 0..6 {
        let (status, _) = app
            .send(
                Method::POST,
                "/cooks",
                Some(json!({
                    "username": format!("line{index}"),
                    "first_name": "Line",
                    "last_name": format!("Cook{index}"),
                    "years_of_experience": index,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, first) = app.send(Method::GET, "/cooks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["items"].as_array().unwrap().len(), 5);
    assert_eq!(first["total_count"], 7);
    assert_eq!(first["num_pages"], 2);
    assert_eq!(first["has_next"], true);

    let (_, second) = app.send(Method::GET, "/cooks?page=2", None).await;
    assert_eq!(second["items"].as_array().unwrap().len(), 2);

    let (_, filtered) = app.send(Method::GET, "/cooks?cook=ramsay", None).await;
    assert_eq!(filtered["total_count"], 1);
    assert_eq!(filtered["search_form"]["name"], "ramsay");
}

#[tokio::test]
async fn undecodable_query_string_is_json_bad_request() {
    let app = setup(5);
    for uri in [
        "/cooks?name=a&cook=b",
        "/dishes?name=a&name=b",
        "/dish-types?page=1&page=2",
    ] {
        let (status, body) = app.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "validation", "{uri}");
        assert_eq!(body["field"], "query", "{uri}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn errors_carry_status_and_field() {
    let app = setup(5);

    let (status, body) = app.send(Method::GET, "/dishes?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "page");

    let (status, body) = app.send(Method::GET, "/dishes?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "page");

    let (status, body) = app
        .send(Method::GET, &format!("/dishes/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = app
        .send(
            Method::POST,
            "/cooks",
            Some(json!({ "username": "chef" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "username");

    let (status, body) = app
        .send(
            Method::POST,
            "/dishes",
            Some(json!({
                "name": "Orphan",
                "description": "No type",
                "price": "1.00",
                "dish_type_id": Uuid::new_v4(),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "dish_type");

    let (status, body) = app
        .send(Method::POST, "/dish-types", Some(json!({ "title": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "body");
}

#[tokio::test]
async fn deleting_dish_type_cascades_over_http() {
    let app = setup(5);
    let (_, mains) = app
        .send(Method::POST, "/dish-types", Some(json!({ "name": "Mains" })))
        .await;
    for name in ["Steak", "Ribs"] {
        app.send(
            Method::POST,
            "/dishes",
            Some(json!({
                "name": name,
                "description": "Grill",
                "price": "20.00",
                "dish_type_id": mains["id"],
            })),
        )
        .await;
    }

    let mains_id = mains["id"].as_str().unwrap();
    let (_, detail) = app
        .send(Method::GET, &format!("/dish-types/{mains_id}"), None)
        .await;
    assert_eq!(detail["dishes"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(Method::DELETE, &format!("/dish-types/{mains_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, overview) = app.send(Method::GET, "/", None).await;
    assert_eq!(
        overview,
        json!({ "num_dish_types": 0, "num_dishes": 0, "num_cooks": 1 })
    );
}

#[tokio::test]
async fn cook_detail_and_update() {
    let app = setup(5);
    let cook_id = app.cook_id;

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/cooks/{cook_id}"),
            Some(json!({
                "username": "chef",
                "first_name": "Gordon",
                "last_name": "Ramsay",
                "years_of_experience": 26,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["years_of_experience"], 26);

    let (status, detail) = app
        .send(Method::GET, &format!("/cooks/{cook_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["cook"]["username"], "chef");
    assert_eq!(detail["dishes"], json!([]));
}
