//! In-process stand-in for the three upstream services.
//!
//! One axum server answers the backend under `/api`, the price feed under
//! `/prices` and the quality service under `/quality`. Every request is
//! recorded. Individual paths can be made to fail, reject, or stall.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use rubberwatch_client::api::UpstreamUrls;

/// Phone and password the mock backend accepts.
pub const ADMIN_PHONE: &str = "9999999999";
pub const ADMIN_PASSWORD: &str = "secret";
pub const ADMIN_TOKEN: &str = "tok-123";

/// Bytes served for every sample photograph.
pub const IMAGE_BYTES: &[u8] = b"\xff\xd8\xff\xe0 sheet";

/// Bytes of the farmer export.
pub const EXPORT_BYTES: &[u8] = b"PK\x03\x04 farmers";

#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Call {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn is_multipart(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|c| c.starts_with("multipart/form-data"))
    }
}

#[derive(Default)]
pub struct MockState {
    base: Mutex<String>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<String>>,
    rejecting: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    price_days: Mutex<HashMap<String, Value>>,
    overrides: Mutex<HashMap<String, Value>>,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub base: String,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        *state.base.lock().unwrap() = base.clone();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, state }
    }

    pub fn urls(&self) -> UpstreamUrls {
        UpstreamUrls {
            backend: format!("{}/api", self.base),
            price: format!("{}/prices", self.base),
            quality: format!("{}/quality", self.base),
        }
    }

    /// Answer `path` with a 500.
    pub fn fail(&self, path: &str) {
        self.state.failing.lock().unwrap().insert(path.to_string());
    }

    pub fn recover(&self, path: &str) {
        self.state.failing.lock().unwrap().remove(path);
    }

    /// Answer `path` with `200 {"success": false}`.
    pub fn reject(&self, path: &str) {
        self.state.rejecting.lock().unwrap().insert(path.to_string());
    }

    /// Hold every answer to `path` for `delay`.
    pub fn stall(&self, path: &str, delay: Duration) {
        self.state
            .delays
            .lock()
            .unwrap()
            .insert(path.to_string(), delay);
    }

    /// Serve `points` for `GET /prices/fetch_rubber_prices?date={day}`.
    pub fn prices_on(&self, day: &str, points: Value) {
        self.state
            .price_days
            .lock()
            .unwrap()
            .insert(day.to_string(), points);
    }

    /// Serve `body` for `path` instead of the fixture.
    pub fn respond(&self, path: &str, body: Value) {
        self.state
            .overrides
            .lock()
            .unwrap()
            .insert(path.to_string(), body);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or_default().to_string();
    let header_text = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.calls.lock().unwrap().push(Call {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let delay = state.delays.lock().unwrap().get(&path).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if state.failing.lock().unwrap().contains(&path) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "upstream exploded"})),
        )
            .into_response();
    }
    if state.rejecting.lock().unwrap().contains(&path) {
        return Json(json!({"success": false, "message": "Not allowed"})).into_response();
    }
    if let Some(body) = state.overrides.lock().unwrap().get(&path).cloned() {
        return Json(body).into_response();
    }

    let base = state.base.lock().unwrap().clone();
    match (method.as_str(), path.as_str()) {
        ("POST", "/api/webLogin") => login(&body),
        ("GET", "/api/farmer_summary") => Json(json!({ "data": farmers() })).into_response(),
        ("GET", "/api/export-user-data") => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            EXPORT_BYTES,
        )
            .into_response(),
        ("GET", "/api/getOfficerData") => Json(json!({ "data": officers() })).into_response(),
        ("POST", "/api/register") => {
            Json(json!({"success": true, "message": "Officer registered"})).into_response()
        }
        ("GET", "/api/getAdvisoryTypes") => Json(json!([
            {"id": 1, "name": "Fertiliser"},
            {"id": 2, "name": "Disease"}
        ]))
        .into_response(),
        ("POST", "/api/addAdvisoryType") => {
            let name = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v["name"].as_str().map(str::to_string))
                .unwrap_or_default();
            Json(json!({"success": true, "data": {"id": 42, "name": name}})).into_response()
        }
        ("GET", "/api/getAdvisory") => Json(json!({ "data": [
            {"id": 10, "advisory_type": "1", "title": "Tapping schedule",
             "description": "Tap on alternate days", "image": "/media/tap.png"},
            {"id": 11, "advisory_type": "3", "title": "Leaf fall",
             "description": "Spray copper oxychloride"}
        ]}))
        .into_response(),
        ("GET", "/api/getEnquiries") => Json(json!({ "data": [
            {"id": 5, "name": "Asha Devi", "phone": "9876500001", "query": "Leaves turning yellow",
             "admin_reply": [{"query_answer": "Apply potash", "image_answer": null}]},
            {"id": 6, "name": "Biren Das", "phone": "9876500002", "query": "Latex yield dropped",
             "admin_reply": null}
        ]}))
        .into_response(),
        ("GET", "/api/bredcrumb") => Json(json!({
            "total_male_workers": 120,
            "total_female_workers": "80",
            "total_immature_area": 40.5,
            "total_mature_area": 59.5,
            "total_agri_area": 100,
            "mature_tree_distribution": {"0-5": 10, "6-10": 25},
            "immature_tree_distribution": {"0-5": 30},
            "plotwise_unique_intercrops": [
                {"inter_crops": "Banana", "count": 4},
                {"inter_crops": "Pineapple", "count": 2}
            ]
        }))
        .into_response(),
        ("GET", "/api/getImmobileData") => Json(json!({ "data": {
            "no_of_lead_farmers": 12,
            "producer_society": 3,
            "entrepreneur_strengthened": 5,
            "demo_plots": 7,
            "total_farmers_outreached": 300,
            "no_of_farmers_trained": 150
        }}))
        .into_response(),
        ("POST", "/api/update_farmer_summary")
        | ("POST", "/api/delete_farmer_summary")
        | ("POST", "/api/updateOfficerStatus")
        | ("POST", "/api/addAdvisory")
        | ("POST", "/api/updateAdvisory")
        | ("POST", "/api/deleteAdvisory")
        | ("POST", "/api/deleteAdvisoryType")
        | ("POST", "/api/replyEnquiry")
        | ("POST", "/api/deleteEnquiry")
        | ("POST", "/api/updateImmobile")
        | ("POST", "/quality/upload") => {
            Json(json!({"success": true, "message": "ok"})).into_response()
        }
        ("GET", "/prices/fetch_rubber_prices") => prices(&state, &query),
        ("GET", "/quality/get_rubber_sheet_quality") => Json(json!([
            {"farmer_id": "G001", "file_path": format!("{base}/quality/images/1.jpg"),
             "predicted_class": "RSS4", "created_at": "2026-10-01 10:00:00"},
            {"farmer_id": "G001", "file_path": format!("{base}/quality/images/2.jpg"),
             "predicted_class": "RSS5", "created_at": "2026-10-05T09:30:00Z"},
            {"farmer_id": "G001", "file_path": format!("{base}/quality/images/missing.jpg"),
             "predicted_class": "RSS4", "created_at": "2026-10-07"}
        ]))
        .into_response(),
        ("GET", "/quality/images/missing.jpg") => StatusCode::NOT_FOUND.into_response(),
        ("GET", p) if p.starts_with("/quality/images/") => {
            ([(header::CONTENT_TYPE, "image/jpeg")], IMAGE_BYTES).into_response()
        }
        ("POST", "/quality/impurity_detection") => Json(json!({
            "impurity_percentage": "3.5",
            "masked_image_path": "/masks/1.png"
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn login(body: &[u8]) -> Response {
    let request: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    if request["phone"] == ADMIN_PHONE && request["password"] == ADMIN_PASSWORD {
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": {"token": ADMIN_TOKEN, "name": "Admin"}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid credentials"})),
        )
            .into_response()
    }
}

fn prices(state: &MockState, query: &str) -> Response {
    let date = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("date="));
    match date {
        Some(day) => {
            let points = state
                .price_days
                .lock()
                .unwrap()
                .get(day)
                .cloned()
                .unwrap_or_else(|| json!([]));
            Json(points).into_response()
        }
        None => Json(json!({ "data": [
            {"market": "Kottayam", "grade": "RSS4", "INR": 180.0, "USD": 2.15, "arrival_date": "2026-10-01"},
            {"market": "Kochi", "grade": "RSS4", "INR": 178.5, "USD": 2.13, "arrival_date": "2026-10-01"},
            {"market": "Bangkok", "grade": "RSS4", "INR": 150.0, "USD": 1.80, "arrival_date": "2026-10-01"},
            {"market": "Kottayam", "grade": "RSS4", "INR": "182", "USD": 2.17, "arrival_date": "2026-10-03T00:00:00"},
            {"market": "Kochi", "grade": "RSS4", "INR": 179.0, "USD": 2.14, "arrival_date": "2026-10-04"}
        ]}))
        .into_response(),
    }
}

pub fn farmers() -> Value {
    json!([
        {"grower_id": "G001", "name": "Asha Devi", "gender": "Female", "address": "Tura",
         "total_agri_area": "2.5", "harvestingTree": "120", "farmType": "Smallholding"},
        {"grower_id": "G002", "name": "Biren Das", "gender": "Male", "address": "Goalpara"},
        {"grower_id": "G003", "name": "Chandra Kalita", "gender": "Male", "address": "Nalbari"},
        {"grower_id": "G004", "name": "Dipika Bora", "gender": "Female", "address": "Jorhat"},
        {"grower_id": "G005", "name": "Eshan Roy", "gender": "Male", "address": "Dhubri"},
        {"grower_id": 6, "name": "Farida Begum", "gender": "Female", "address": "Barpeta"}
    ])
}

pub fn officers() -> Value {
    json!([
        {"id": 1, "name": "Ravi Sharma", "phone": "9876543210", "gender": "male", "status": 1},
        {"id": 2, "name": "Meena Saikia", "phone": "9876501234", "gender": "female", "status": "0"}
    ])
}
