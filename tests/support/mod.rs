//! In-process stand-in for the LMS backend, served by axum on a random port.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use instructor_dashboard::api::{ApiClient, StagedFile};
use instructor_dashboard::app::App;
use instructor_dashboard::app::state::AppContext;
use instructor_dashboard::config::{Preferences, Settings};
use instructor_dashboard::session::SessionStore;

pub const TOKEN: &str = "good-token";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Default)]
pub struct Backend {
    pub courses: Vec<Value>,
    pub progress: Vec<(String, Vec<Value>)>,
    pub assessments: Vec<(String, Value)>,
    pub certificates: Vec<Value>,
    pub earnings: f64,
    /// Role handed out on login.
    pub role: String,
    /// Mutating course requests answer 500 when set.
    pub reject_edits: bool,
    /// Thumbnail uploads answer 500 when set.
    pub reject_uploads: bool,
    /// `(course id, file name)` of every accepted thumbnail.
    pub thumbnails: Vec<(String, String)>,
    pub profile: Value,
    pub logouts: u32,
    pub next_id: u32,
}

impl Backend {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

type Shared = Arc<Mutex<Backend>>;

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn ack() -> Response {
    Json(json!({ "success": true })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn authorised(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

macro_rules! guard {
    ($headers:expr) => {
        if !authorised(&$headers) {
            return fail(StatusCode::UNAUTHORIZED, "Not authorized to access this route");
        }
    };
}

#[derive(Deserialize)]
struct Login {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(body): Json<Login>) -> Response {
    if body.email.is_empty() || body.password != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let role = state.lock().unwrap().role.clone();
    ok(json!({ "token": TOKEN, "role": role }))
}

#[derive(Deserialize)]
struct Period {
    period: Option<u32>,
}

async fn list_courses(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(_period): Query<Period>,
) -> Response {
    guard!(headers);
    ok(Value::Array(state.lock().unwrap().courses.clone()))
}

async fn create_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    guard!(headers);
    let mut backend = state.lock().unwrap();
    let id = backend.fresh_id("course");
    body["_id"] = json!(id);
    body["status"] = json!("draft");
    backend.courses.push(body.clone());
    ok(body)
}

async fn get_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(headers);
    let backend = state.lock().unwrap();
    match backend.courses.iter().find(|c| c["_id"] == json!(id)) {
        Some(course) => ok(course.clone()),
        None => fail(StatusCode::NOT_FOUND, "Course not found"),
    }
}

async fn update_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    guard!(headers);
    let mut backend = state.lock().unwrap();
    if backend.reject_edits {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "");
    }
    match backend.courses.iter_mut().find(|c| c["_id"] == json!(id)) {
        Some(course) => {
            course["status"] = body["status"].clone();
            ack()
        }
        None => fail(StatusCode::NOT_FOUND, "Course not found"),
    }
}

async fn delete_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    guard!(headers);
    let mut backend = state.lock().unwrap();
    if backend.reject_edits {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Course could not be deleted");
    }
    backend.courses.retain(|c| c["_id"] != json!(id));
    ack()
}

/// Text fields and `(field, file name)` pairs of a multipart body.
async fn read_form(mut multipart: Multipart) -> (Vec<(String, String)>, Vec<(String, String)>) {
    let mut texts = Vec::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field.bytes().await.expect("file bytes");
                files.push((name, file_name));
            }
            None => texts.push((name, field.text().await.expect("text field"))),
        }
    }
    (texts, files)
}

async fn upload_thumbnail(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    guard!(headers);
    let (_, files) = read_form(multipart).await;
    let mut backend = state.lock().unwrap();
    if backend.reject_uploads {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Thumbnail upload failed");
    }
    let Some((_, file_name)) = files.into_iter().find(|(field, _)| field == "thumbnail") else {
        return fail(StatusCode::BAD_REQUEST, "No thumbnail");
    };
    let url = format!("https://cdn.example.com/thumbnails/{file_name}");
    backend.thumbnails.push((id, file_name));
    ok(json!({ "thumbnail": url }))
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(headers);
    state.lock().unwrap().logouts += 1;
    ack()
}

async fn get_profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(headers);
    ok(state.lock().unwrap().profile.clone())
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    guard!(headers);
    let mut backend = state.lock().unwrap();
    for key in ["bio", "expertise", "socialLinks"] {
        backend.profile[key] = body[key].clone();
    }
    ack()
}

async fn update_details(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    guard!(headers);
    let (texts, files) = read_form(multipart).await;
    let mut backend = state.lock().unwrap();
    for (name, value) in texts {
        backend.profile[name.as_str()] = json!(value);
    }
    if let Some((_, file_name)) = files.into_iter().find(|(field, _)| field == "avatar") {
        backend.profile["avatar"] = json!(format!("https://cdn.example.com/avatars/{file_name}"));
    }
    ok(backend.profile.clone())
}

async fn create_assessment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(course): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    guard!(headers);
    let mut backend = state.lock().unwrap();
    let id = backend.fresh_id("assessment");
    body["_id"] = json!(id);
    backend.assessments.push((course, body.clone()));
    ok(body)
}

async fn get_assessment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((course, id)): Path<(String, String)>,
) -> Response {
    guard!(headers);
    let backend = state.lock().unwrap();
    match backend
        .assessments
        .iter()
        .find(|(c, a)| *c == course && a["_id"] == json!(id))
    {
        Some((_, assessment)) => ok(assessment.clone()),
        None => fail(StatusCode::NOT_FOUND, "Assessment not found"),
    }
}

async fn earnings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    guard!(headers);
    let total = state.lock().unwrap().earnings;
    ok(json!({ "totalEarnings": total }))
}

async fn course_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(course): Path<String>,
) -> Response {
    guard!(headers);
    let backend = state.lock().unwrap();
    let records = backend
        .progress
        .iter()
        .find(|(c, _)| *c == course)
        .map(|(_, r)| r.clone())
        .unwrap_or_default();
    ok(Value::Array(records))
}

async fn issue_certificate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    guard!(headers);
    state.lock().unwrap().certificates.push(body);
    ack()
}

pub struct MockServer {
    pub base_url: String,
    pub state: Shared,
}

impl MockServer {
    pub async fn start(backend: Backend) -> Self {
        let state: Shared = Arc::new(Mutex::new(backend));
        let router = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/logout", get(logout))
            .route("/api/v1/auth/updatedetails", put(update_details))
            .route(
                "/api/v1/instructors/profile",
                get(get_profile).put(update_profile),
            )
            .route(
                "/api/v1/instructors/courses",
                get(list_courses).post(create_course),
            )
            .route(
                "/api/v1/instructors/courses/{id}",
                get(get_course).put(update_course).delete(delete_course),
            )
            .route(
                "/api/v1/instructors/courses/{id}/thumbnail",
                post(upload_thumbnail),
            )
            .route(
                "/api/v1/instructors/courses/{id}/assessments",
                post(create_assessment),
            )
            .route(
                "/api/v1/instructors/courses/{id}/assessments/{aid}",
                get(get_assessment),
            )
            .route("/api/v1/instructors/earnings", get(earnings))
            .route("/api/v1/progress/course/{id}", get(course_progress))
            .route("/api/v1/certificates", post(issue_certificate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
        }
    }
}

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

/// An app wired to `server`, signed in with `token` when one is given.
pub fn app_for(server: &MockServer, token: Option<&str>) -> App {
    let settings = Settings::with_base_url(server.base_url.clone(), temp_dir("dashboard"));
    let session = SessionStore::open(settings.session_path());
    if let Some(token) = token {
        session.save(token).expect("store token");
    }
    let api = ApiClient::new(&settings, session.clone()).expect("http client");
    App::new(AppContext {
        preferences: Preferences::load(&settings.config_path()),
        settings,
        api,
        session,
    })
}

/// Enough of a PNG for format sniffing.
pub fn png(name: &str) -> StagedFile {
    StagedFile::new(name, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0])
}

pub fn course(id: &str, title: &str, price: f64, students: u32) -> Value {
    json!({
        "_id": id,
        "title": title,
        "price": price,
        "discountPrice": 0.0,
        "totalStudents": students,
        "status": "published",
        "rating": 4.5,
        "curriculum": []
    })
}

pub fn progress(enrollment: &str, student: &str, name: &str, percent: f64) -> Value {
    let (first, last) = name.split_once(' ').unwrap_or((name, ""));
    json!({
        "_id": enrollment,
        "student": { "_id": student, "firstName": first, "lastName": last, "email": "" },
        "overallProgress": percent,
        "certificateIssued": false
    })
}
