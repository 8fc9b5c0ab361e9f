use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Json;
use reqwest::Client;
use serde_json::{Value, json};

use ::common::Id;
use ::common::config::UploadConfig;
use client::{ApiClient, MemorySessionStore, SessionStore, UploadGateway};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const STUDENT_TOKEN: &str = "student-token";
pub const UPLOAD_PRESET: &str = "test-preset";

pub mod routes {
    pub const USERS: &str = "users";
    pub const THEME_WEEKS: &str = "theme-weeks";
    pub const VIDEOS: &str = "videos";
    pub const MATERIALS: &str = "materials";
}

/// In-memory stand-in for the contest backend and the file host.
#[derive(Default)]
pub struct Backend {
    users: Mutex<Vec<Value>>,
    weeks: Mutex<Vec<Value>>,
    videos: Mutex<Vec<Value>>,
    materials: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
    uploads: AtomicUsize,
    fail_lists: AtomicBool,
    last_update: Mutex<Option<Value>>,
}

type Shared = Arc<Backend>;

impl Backend {
    fn collection(&self, name: &str) -> Option<&Mutex<Vec<Value>>> {
        match name {
            routes::USERS => Some(&self.users),
            routes::THEME_WEEKS => Some(&self.weeks),
            routes::VIDEOS => Some(&self.videos),
            routes::MATERIALS => Some(&self.materials),
            _ => None,
        }
    }

    fn items(&self, name: &str) -> Vec<Value> {
        self.collection(name)
            .map(|c| c.lock().unwrap().clone())
            .unwrap_or_default()
    }

    fn insert(&self, name: &str, mut item: Value) -> Value {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let obj = item.as_object_mut().expect("seeded item must be an object");
        obj.entry("id").or_insert(json!(id));
        obj.entry("created_at")
            .or_insert(json!("2024-01-01T00:00:00Z"));
        obj.remove("password");
        match name {
            routes::THEME_WEEKS => {
                obj.entry("videos_count").or_insert(json!(0));
            }
            routes::MATERIALS => {
                obj.entry("is_winner").or_insert(json!(false));
            }
            _ => {}
        }
        self.collection(name)
            .expect("unknown collection")
            .lock()
            .unwrap()
            .push(item.clone());
        item
    }
}

fn id_of(item: &Value) -> String {
    match &item["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    match bearer(headers) {
        Some(ADMIN_TOKEN) => Ok(()),
        Some(STUDENT_TOKEN) => Err(error(StatusCode::FORBIDDEN, "Admins only")),
        _ => Err(error(StatusCode::UNAUTHORIZED, "Invalid token")),
    }
}

async fn count_requests(State(backend): State<Shared>, req: Request, next: Next) -> Response {
    backend.requests.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("secret")) => Json(json!({
            "token": ADMIN_TOKEN,
            "is_admin": true,
            "username": "admin",
        }))
        .into_response(),
        (Some("student"), Some("secret")) => Json(json!({
            "token": STUDENT_TOKEN,
            "is_admin": false,
            "username": "student",
        }))
        .into_response(),
        _ => error(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

async fn register(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["username"].as_str().unwrap_or_default().is_empty() {
        return error(StatusCode::BAD_REQUEST, "Username is required");
    }
    let user = backend.insert(routes::USERS, body);
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(ADMIN_TOKEN) => Json(json!({ "id": 1, "username": "admin", "is_admin": true }))
            .into_response(),
        Some(STUDENT_TOKEN) => {
            Json(json!({ "id": 2, "username": "student", "is_admin": false })).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

fn list(backend: &Backend, name: &str) -> Response {
    if backend.fail_lists.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    match backend.collection(name) {
        Some(_) => Json(Value::Array(backend.items(name))).into_response(),
        None => error(StatusCode::NOT_FOUND, "No such collection"),
    }
}

async fn admin_list(
    State(backend): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = require_admin(&headers) {
        return res;
    }
    list(&backend, &name)
}

async fn admin_create(
    State(backend): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = require_admin(&headers) {
        return res;
    }
    if backend.collection(&name).is_none() {
        return error(StatusCode::NOT_FOUND, "No such collection");
    }
    if body["title"].as_str() == Some("") {
        return error(StatusCode::BAD_REQUEST, "Title must not be empty");
    }
    let created = backend.insert(&name, body);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn admin_update(
    State(backend): State<Shared>,
    Path((name, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = require_admin(&headers) {
        return res;
    }
    *backend.last_update.lock().unwrap() = Some(body.clone());

    let Some(collection) = backend.collection(&name) else {
        return error(StatusCode::NOT_FOUND, "No such collection");
    };
    let mut items = collection.lock().unwrap();
    let Some(item) = items.iter_mut().find(|item| id_of(item) == id) else {
        return error(StatusCode::NOT_FOUND, "Item not found");
    };
    if let (Some(target), Some(changes)) = (item.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(item.clone()).into_response()
}

async fn admin_delete(
    State(backend): State<Shared>,
    Path((name, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = require_admin(&headers) {
        return res;
    }
    let Some(collection) = backend.collection(&name) else {
        return error(StatusCode::NOT_FOUND, "No such collection");
    };
    let mut items = collection.lock().unwrap();
    let before = items.len();
    items.retain(|item| id_of(item) != id);
    if items.len() == before {
        return error(StatusCode::NOT_FOUND, "Item not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn public_weeks(State(backend): State<Shared>) -> Response {
    list(&backend, routes::THEME_WEEKS)
}

async fn public_materials(State(backend): State<Shared>) -> Response {
    list(&backend, routes::MATERIALS)
}

async fn public_videos(State(backend): State<Shared>) -> Response {
    list(&backend, routes::VIDEOS)
}

async fn public_week(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    backend
        .items(routes::THEME_WEEKS)
        .into_iter()
        .find(|week| id_of(week) == id)
        .map(|week| Json(week).into_response())
        .unwrap_or_else(|| error(StatusCode::NOT_FOUND, "Theme week not found"))
}

async fn upload(State(backend): State<Shared>, mut multipart: Multipart) -> Response {
    let mut preset = None;
    let mut file = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("upload_preset") => preset = field.text().await.ok(),
            Some("file") => {
                let file_name = field.file_name().unwrap_or("blob").to_string();
                let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
                file = Some((file_name, size));
            }
            _ => {}
        }
    }

    if preset.as_deref() != Some(UPLOAD_PRESET) {
        return error(StatusCode::BAD_REQUEST, "Upload preset not found");
    }
    let Some((file_name, size)) = file else {
        return error(StatusCode::BAD_REQUEST, "Missing file");
    };

    backend.uploads.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "secure_url": format!("https://cdn.test/{file_name}"),
        "bytes": size,
    }))
    .into_response()
}

fn build_router(backend: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/admin/{collection}", get(admin_list).post(admin_create))
        .route(
            "/api/admin/{collection}/{id}",
            put(admin_update).delete(admin_delete),
        )
        .route("/api/theme-weeks", get(public_weeks))
        .route("/api/theme-weeks/materials", get(public_materials))
        .route("/api/theme-weeks/{id}", get(public_week))
        .route("/api/videos", get(public_videos))
        .route("/upload", post(upload))
        .layer(middleware::from_fn_with_state(
            backend.clone(),
            count_requests,
        ))
        .with_state(backend)
}

/// A running fake backend plus clients pointed at it.
pub struct TestEnv {
    base: String,
    pub backend: Shared,
    pub session: Arc<MemorySessionStore>,
    pub api: ApiClient,
    pub gateway: UploadGateway,
}

impl TestEnv {
    /// Start a backend with nobody signed in.
    pub async fn spawn() -> Self {
        let backend: Shared = Arc::new(Backend::default());
        let app = build_router(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = format!("http://{addr}");
        let session = Arc::new(MemorySessionStore::new());
        let api = ApiClient::with_http(Client::new(), &format!("{base}/api"), session.clone());
        let gateway = UploadGateway::with_http(
            Client::new(),
            &UploadConfig {
                endpoint: format!("{base}/upload"),
                preset: UPLOAD_PRESET.to_string(),
                timeout_secs: 30,
            },
        );

        Self {
            base,
            backend,
            session,
            api,
            gateway,
        }
    }

    /// Start a backend with the admin token already stored.
    pub async fn signed_in() -> Self {
        let env = Self::spawn().await;
        env.use_token(ADMIN_TOKEN);
        env
    }

    pub fn use_token(&self, token: &str) {
        self.session.set_token(token).unwrap();
    }

    /// Insert an item directly, bypassing the client. Returns its id.
    pub fn seed(&self, collection: &str, item: Value) -> Id {
        let created = self.backend.insert(collection, item);
        Id::new(id_of(&created))
    }

    pub fn seed_week(&self, title: &str) -> Id {
        self.seed(
            routes::THEME_WEEKS,
            json!({
                "title": title,
                "description": "",
                "start_date": "2024-03-01",
                "end_date": "2024-03-07",
                "result_url": "https://youtu.be/dQw4w9WgXcQ",
                "image_url": "https://cdn.test/week.png",
            }),
        )
    }

    pub fn seed_material(&self, title: &str, week: &Id, is_winner: bool) -> Id {
        self.seed(
            routes::MATERIALS,
            json!({
                "title": title,
                "student_name": "Aru",
                "material_type": "image",
                "url": format!("https://cdn.test/{title}.png"),
                "theme_week_id": week.as_str(),
                "is_winner": is_winner,
            }),
        )
    }

    pub fn gateway_endpoint(&self) -> String {
        format!("{}/upload", self.base)
    }

    /// Items currently held by the backend.
    pub fn stored(&self, collection: &str) -> Vec<Value> {
        self.backend.items(collection)
    }

    pub fn requests(&self) -> usize {
        self.backend.requests.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.backend.uploads.load(Ordering::SeqCst)
    }

    pub fn fail_lists(&self, fail: bool) {
        self.backend.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Body of the most recent `PUT`.
    pub fn last_update(&self) -> Option<Value> {
        self.backend.last_update.lock().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session.get_token().unwrap()
    }
}
