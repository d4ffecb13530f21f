use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use catalog_quotes::config::EnvironmentConfig;
use catalog_quotes::create_app;
use catalog_quotes::state::AppState;
use catalog_quotes::utils::clock::ManualClock;

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let state = AppState::in_memory(EnvironmentConfig::default(), clock.clone());
        Self {
            router: create_app(state),
            clock,
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            // Los rechazos de extractores de axum responden texto plano
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    async fn create_category(&self, name: &str) -> String {
        let (status, body) = self
            .post("/api/categories", json!({ "name": name, "description": "Línea blanca" }))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, category_id: &str, brand: &str, model: &str, price: u64) -> String {
        let (status, body) = self
            .post(
                "/api/products",
                json!({
                    "category_id": category_id,
                    "brand": brand,
                    "model": model,
                    "base_price": price,
                    "description": "No Frost 382L",
                    "tags": ["frio", "inverter"]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_quotation(&self, product_id: &str, quantity: u32) -> Value {
        let (status, body) = self
            .post(
                "/api/quotations",
                json!({
                    "contact": { "name": "Ana Pérez", "phone": "+54 9 11 5555-1234" },
                    "items": [{ "product_id": product_id, "quantity": quantity }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_category_list_is_sorted_and_reflects_writes() {
    let app = TestApp::new();
    app.create_category("Televisores").await;
    app.create_category("Aires").await;
    app.create_category("Heladeras").await;
    let hidden = app.create_category("Antiguos").await;

    let (status, _) = app.delete(&format!("/api/categories/{}", hidden)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["cached"], false);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Aires", "Heladeras", "Televisores"]);

    let (_, body) = app.get("/api/categories").await;
    assert_eq!(body["cached"], true);

    // Una escritura invalida el cache aunque el TTL no haya vencido
    app.create_category("Lavarropas").await;
    let (_, body) = app.get("/api/categories").await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn test_duplicate_category_conflicts() {
    let app = TestApp::new();
    let first = app.create_category("Audio").await;

    let (status, body) = app.post("/api/categories", json!({ "name": "Audio" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let other = app.create_category("Video").await;
    let (status, _) = app
        .put(&format!("/api/categories/{}", other), json!({ "name": "Audio" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(&format!("/api/categories/{}", first), json!({ "name": "Audio", "icon": "🔊" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_pagination() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    for i in 0..45 {
        app.create_product(&category, "Samsung", &format!("RT{:02}", i), 1000 + i).await;
    }

    let (status, body) = app.get("/api/products?page=1&page_size=20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 20);
    assert_eq!(body["pagination"]["total"], 45);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["has_next"], true);
    assert_eq!(body["pagination"]["has_previous"], false);
    assert_eq!(body["pagination"]["from"], 1);
    assert_eq!(body["pagination"]["to"], 20);

    let (_, body) = app.get("/api/products?page=3&page_size=20").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["has_next"], false);
    assert_eq!(body["pagination"]["has_previous"], true);
    assert_eq!(body["pagination"]["from"], 41);
    assert_eq!(body["pagination"]["to"], 45);

    let (status, body) = app.get("/api/products?page=5&page_size=20").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 45);
    assert_eq!(body["pagination"]["from"], 0);

    let (status, body) = app
        .get(&format!("/api/products?page={}&page_size=20", i64::MAX))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 45);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["pagination"]["has_next"], false);
}

#[tokio::test]
async fn test_product_filters_and_sorting() {
    let app = TestApp::new();
    let fridges = app.create_category("Heladeras").await;
    let tvs = app.create_category("Televisores").await;
    app.create_product(&fridges, "Samsung", "RT38", 300000).await;
    app.create_product(&fridges, "Whirlpool", "WRM45", 250000).await;
    app.create_product(&tvs, "Samsung", "QLED 55", 500000).await;

    let (_, body) = app.get(&format!("/api/products?category={}", fridges)).await;
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = app.get("/api/products?brand=sams&sort=price_desc").await;
    let models: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["model"].as_str().unwrap())
        .collect();
    assert_eq!(models, vec!["QLED 55", "RT38"]);

    let (_, body) = app.get("/api/products?sort=price_asc").await;
    assert_eq!(body["data"][0]["model"], "WRM45");

    let (_, body) = app.get("/api/products?search=qled").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["category_name"], "Televisores");
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/products",
            json!({
                "category_id": uuid::Uuid::new_v4(),
                "brand": "Samsung",
                "model": "RT38",
                "base_price": 1000
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_product_quote() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;

    let (status, body) = app.get(&format!("/api/products/{}/quote", product)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["prices"]["cash"].as_f64(), Some(130000.0));
    assert_eq!(body["data"]["prices"]["three_installments"]["total"].as_f64(), Some(146874.0));
    assert_eq!(body["data"]["prices"]["six_installments"]["total"].as_f64(), Some(157794.0));
    assert_eq!(body["data"]["product"]["category"], "Heladeras");

    let (_, body) = app
        .get(&format!("/api/products/{}/quote?profit_margin=0.5", product))
        .await;
    assert_eq!(body["data"]["prices"]["cash"].as_f64(), Some(150000.0));
}

#[tokio::test]
async fn test_out_of_range_pricing_inputs_are_rejected() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;

    let (status, body) = app
        .get(&format!("/api/products/{}/quote?factor6=1000", product))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .get(&format!(
            "/api/products/{}/quote?factor6=79228162514264337593543950335",
            product
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/products",
            json!({
                "category_id": category,
                "brand": "Samsung",
                "model": "Gigante",
                "base_price": 7e28
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post(
            "/api/quotations",
            json!({
                "contact": { "name": "Ana Pérez", "phone": "+54 9 11 5555-1234" },
                "items": [{ "product_id": product, "quantity": 10001 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // El listado sigue respondiendo: nada fuera de rango quedó guardado
    let (status, body) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_quotation_lifecycle() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;

    let quotation = app.create_quotation(&product, 2).await;
    let id = quotation["id"].as_str().unwrap().to_string();
    assert_eq!(quotation["status"], "draft");
    assert_eq!(quotation["is_valid"], true);
    assert_eq!(quotation["totals"]["cash"].as_f64(), Some(260000.0));
    assert_eq!(quotation["items"][0]["snapshot"]["category"], "Heladeras");

    let (status, body) = app.get(&format!("/api/quotations/{}/message", id)).await;
    assert_eq!(status, StatusCode::OK);
    let message = body["data"]["message"].as_str().unwrap();
    assert!(message.contains("🔢 Cantidad: 2"));
    assert!(message.contains("💵 Contado: $260.000"));
    assert!(body["data"]["whatsapp_url"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/5491155551234?text="));

    let (status, body) = app
        .put(&format!("/api/quotations/{}/status", id), json!({ "status": "sent" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "sent");

    let (status, body) = app
        .put(&format!("/api/quotations/{}/status", id), json!({ "status": "draft" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");

    // Vencida: la vigencia es consultiva y no cambia el estado guardado
    app.clock.advance(Duration::days(7) + Duration::seconds(1));
    let (_, body) = app.get(&format!("/api/quotations/{}", id)).await;
    assert_eq!(body["data"]["is_valid"], false);
    assert_eq!(body["data"]["status"], "sent");

    let (status, _) = app.delete(&format!("/api/quotations/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/quotations/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_quotation_snapshot_is_immutable() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;
    let quotation = app.create_quotation(&product, 1).await;
    let id = quotation["id"].as_str().unwrap();

    let (status, _) = app
        .put(&format!("/api/products/{}", product), json!({ "base_price": 200000, "brand": "LG" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&format!("/api/quotations/{}", id)).await;
    assert_eq!(body["data"]["items"][0]["snapshot"]["brand"], "Samsung");
    assert_eq!(body["data"]["items"][0]["snapshot"]["base_price"].as_f64(), Some(100000.0));
    assert_eq!(body["data"]["totals"]["cash"].as_f64(), Some(130000.0));
}

#[tokio::test]
async fn test_quotation_errors() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;

    let contact = json!({ "name": "Ana Pérez", "phone": "+54 9 11 5555-1234" });

    let (status, body) = app
        .post("/api/quotations", json!({ "contact": contact, "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_QUOTATION");

    let ghost = uuid::Uuid::new_v4();
    let (status, body) = app
        .post(
            "/api/quotations",
            json!({ "contact": contact, "items": [{ "product_id": ghost, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PRODUCTS_UNAVAILABLE");
    assert_eq!(body["details"]["product_ids"][0], ghost.to_string());

    // Producto dado de baja
    app.delete(&format!("/api/products/{}", product)).await;
    let (status, body) = app
        .post(
            "/api/quotations",
            json!({ "contact": contact, "items": [{ "product_id": product, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PRODUCTS_UNAVAILABLE");

    let (status, body) = app
        .post(
            "/api/quotations",
            json!({
                "contact": { "name": "A", "phone": "123" },
                "items": [{ "product_id": product, "quantity": 1 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quotation_list_and_stats() {
    let app = TestApp::new();
    let category = app.create_category("Heladeras").await;
    let product = app.create_product(&category, "Samsung", "RT38", 100000).await;

    let first = app.create_quotation(&product, 1).await;
    app.clock.advance(Duration::minutes(5));
    let (_, _) = app
        .post(
            "/api/quotations",
            json!({
                "contact": { "name": "Bruno Díaz", "phone": "11 4444 3333" },
                "items": [{ "product_id": product, "quantity": 3 }],
                "payment_mode": "three_installments"
            }),
        )
        .await;
    app.put(
        &format!("/api/quotations/{}/status", first["id"].as_str().unwrap()),
        json!({ "status": "sent" }),
    )
    .await;

    let (_, body) = app.get("/api/quotations").await;
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["data"][0]["contact"]["name"], "Bruno Díaz");

    let (_, body) = app.get("/api/quotations?search=bruno").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["payment_mode"], "three_installments");

    let (_, body) = app.get("/api/quotations?status=sent").await;
    assert_eq!(body["pagination"]["total"], 1);

    let (status, body) = app.get("/api/quotations/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["today"], 2);
    assert_eq!(body["data"]["this_month"], 2);
    assert_eq!(body["data"]["by_status"]["draft"], 1);
    assert_eq!(body["data"]["by_status"]["sent"], 1);
    assert_eq!(body["data"]["by_status"]["accepted"], 0);
}
