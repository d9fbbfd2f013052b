//! 集成测试用的内存后端
//!
//! 在 `127.0.0.1:0` 上启动一个 axum 服务，按真实后端的约定实现
//! 主题/测试/题目/选项的增删改查、分页、部分更新和 `/auth/:chat_id`。
//! 所有请求都会被记录，方便检查请求头。

#![allow(dead_code)]

use axum::extract::{Path, Query, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use quiz_admin::auth::{MemoryTokenStore, Session, TokenStore};
use quiz_admin::config::{Config, DetailVariant};
use quiz_admin::services::RecordingNotifier;
use quiz_admin::App;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

pub const BYPASS_VALUE: &str = "69420";
pub const CHAT_ID: &str = "123456";
/// 这个 chat_id 登录会被拒绝
pub const UNKNOWN_CHAT_ID: &str = "999";

/// 记录下来的一次请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub bypass: Option<String>,
}

#[derive(Default)]
struct Db {
    next_id: i64,
    topics: BTreeMap<i64, Value>,
    tests: BTreeMap<i64, Value>,
    questions: BTreeMap<i64, Value>,
    options: BTreeMap<i64, Value>,
    failing_options: HashSet<i64>,
    /// 路径 → 固定的 200 响应体（空串或 `null`）
    canned_bodies: HashMap<String, &'static str>,
    requests: Vec<RecordedRequest>,
}

impl Db {
    fn table(&mut self, resource: &str) -> Option<&mut BTreeMap<i64, Value>> {
        match resource {
            "topic" => Some(&mut self.topics),
            "test" => Some(&mut self.tests),
            "question" => Some(&mut self.questions),
            "option" => Some(&mut self.options),
            _ => None,
        }
    }

    fn insert(&mut self, resource: &str, mut record: Map<String, Value>) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        let now = chrono::Utc::now().to_rfc3339();
        record.insert("id".into(), json!(id));
        record.insert("createdAt".into(), json!(now));
        record.insert("updatedAt".into(), json!(now));
        let value = Value::Object(record);
        if let Some(table) = self.table(resource) {
            table.insert(id, value.clone());
        }
        value
    }

    fn test_with_children(&self, test: &Value) -> Value {
        let mut test = test.clone();
        let test_id = test["id"].as_i64();
        let questions: Vec<Value> = self
            .questions
            .values()
            .filter(|q| q["test_id"].as_i64() == test_id)
            .map(|q| {
                let mut q = q.clone();
                let options: Vec<Value> = self
                    .options
                    .values()
                    .filter(|o| o["question_id"] == q["id"])
                    .cloned()
                    .collect();
                q["options"] = json!(options);
                q
            })
            .collect();
        test["questions"] = json!(questions);
        test
    }

    fn topic_with_tests(&self, topic: &Value) -> Value {
        let mut topic = topic.clone();
        let tests: Vec<Value> = self
            .tests
            .values()
            .filter(|t| t["topic_id"] == topic["id"])
            .cloned()
            .collect();
        topic["tests"] = json!(tests);
        topic
    }
}

/// 正在运行的模拟后端
#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    db: Arc<Mutex<Db>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let db = Arc::new(Mutex::new(Db::default()));
        let router = Router::new()
            .route("/auth/:chat_id", get(login))
            .route("/tests/:resource", get(list).post(create))
            .route(
                "/tests/:resource/:id",
                get(fetch).put(update).delete(remove),
            )
            .layer(middleware::from_fn_with_state(Arc::clone(&db), check_headers))
            .with_state(Arc::clone(&db));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock backend crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            db,
        }
    }

    fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 指向本后端的配置
    pub fn config(&self) -> Config {
        Config {
            backend_url: self.base_url.clone(),
            page_limit: 2,
            detail_variant: DetailVariant::Test,
            ..Config::default()
        }
    }

    pub fn seed_topic(&self, name: &str) -> i64 {
        let record = json!({ "name": name, "description": "", "active": true });
        self.seed("topic", record)
    }

    pub fn seed_test(&self, name: &str, topic_id: Option<i64>) -> i64 {
        let record = json!({
            "name": name,
            "difficulty_level": null,
            "active": true,
            "topic_id": topic_id,
        });
        self.seed("test", record)
    }

    pub fn seed_question(&self, test_id: i64, text: &str) -> i64 {
        let record = json!({ "test_id": test_id, "question": text, "question_score": 1.0 });
        self.seed("question", record)
    }

    pub fn seed_option(&self, question_id: i64, text: &str, is_correct: bool) -> i64 {
        let record = json!({ "question_id": question_id, "option": text, "isCorrect": is_correct });
        self.seed("option", record)
    }

    fn seed(&self, resource: &str, record: Value) -> i64 {
        let record = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.db().insert(resource, record)["id"].as_i64().unwrap_or_default()
    }

    /// 之后对该选项的 PUT 都返回 500
    pub fn fail_option_updates(&self, option_id: i64) {
        self.db().failing_options.insert(option_id);
    }

    /// 之后该路径（任意方法）都返回 200 和空响应体
    pub fn respond_empty(&self, path: &str) {
        self.db().canned_bodies.insert(path.to_string(), "");
    }

    /// 之后该路径（任意方法）都返回 200 和 JSON `null`
    pub fn respond_null(&self, path: &str) {
        self.db().canned_bodies.insert(path.to_string(), "null");
    }

    pub fn option(&self, option_id: i64) -> Option<Value> {
        self.db().options.get(&option_id).cloned()
    }

    pub fn topic(&self, topic_id: i64) -> Option<Value> {
        self.db().topics.get(&topic_id).cloned()
    }

    pub fn correct_options(&self, question_id: i64) -> Vec<i64> {
        self.db()
            .options
            .values()
            .filter(|o| o["question_id"].as_i64() == Some(question_id))
            .filter(|o| o["isCorrect"] == json!(true))
            .filter_map(|o| o["id"].as_i64())
            .collect()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.db().requests.clone()
    }

    pub fn count_requests(&self, method: &Method, path_prefix: &str) -> usize {
        self.db()
            .requests
            .iter()
            .filter(|r| &r.method == method && r.path.starts_with(path_prefix))
            .count()
    }
}

/// 已登录的应用 + 记录通知
pub fn logged_in_app(backend: &MockBackend) -> (App, Arc<RecordingNotifier>) {
    app_with_store(backend, logged_in_store())
}

pub fn app_with_store(
    backend: &MockBackend,
    store: Arc<dyn TokenStore>,
) -> (App, Arc<RecordingNotifier>) {
    app_with_config(backend.config(), store)
}

pub fn app_with_config(
    config: Config,
    store: Arc<dyn TokenStore>,
) -> (App, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let app = App::with_parts(config, store, notifier.clone()).expect("build app");
    (app, notifier)
}

/// 已登录的会话存储
pub fn logged_in_store() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::with_session(Session::new(CHAT_ID)))
}

// ========== 路由 ==========

type SharedDb = Arc<Mutex<Db>>;

fn lock(db: &SharedDb) -> MutexGuard<'_, Db> {
    db.lock().unwrap_or_else(|e| e.into_inner())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn check_headers(State(db): State<SharedDb>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            authorization: header("authorization"),
            bypass: header("ngrok-skip-browser-warning"),
        }
    };
    let canned = {
        let mut db = lock(&db);
        db.requests.push(recorded.clone());
        db.canned_bodies.get(&recorded.path).copied()
    };

    if recorded.bypass.as_deref() != Some(BYPASS_VALUE) {
        return error(StatusCode::FORBIDDEN, "missing bypass header");
    }
    if recorded.path.starts_with("/tests/") && recorded.authorization.is_none() {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if let Some(body) = canned {
        return (StatusCode::OK, body).into_response();
    }
    next.run(request).await
}

async fn login(Path(chat_id): Path<String>) -> Response {
    if chat_id == UNKNOWN_CHAT_ID {
        return error(StatusCode::NOT_FOUND, "User not found");
    }
    match chat_id.parse::<i64>() {
        Ok(id) => Json(json!({ "message": "Login successful", "chat_id": id })).into_response(),
        Err(_) => error(StatusCode::BAD_REQUEST, "chat_id must be a number"),
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
    limit: Option<usize>,
}

async fn list(
    State(db): State<SharedDb>,
    Path(resource): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let mut db = lock(&db);
    let Some(table) = db.table(&resource) else {
        return error(StatusCode::NOT_FOUND, "Not found");
    };
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let all: Vec<Value> = table.values().cloned().collect();
    let total = all.len();
    let data: Vec<Value> = all.into_iter().skip((page - 1) * limit).take(limit).collect();
    Json(json!({
        "data": data,
        "totalCount": total,
        "totalPages": (total + limit - 1) / limit,
        "currentPage": page,
    }))
    .into_response()
}

async fn fetch(State(db): State<SharedDb>, Path((resource, id)): Path<(String, i64)>) -> Response {
    let mut db = lock(&db);
    let record = db.table(&resource).and_then(|t| t.get(&id).cloned());
    match (resource.as_str(), record) {
        ("topic", Some(topic)) => Json(db.topic_with_tests(&topic)).into_response(),
        ("test", Some(test)) => Json(db.test_with_children(&test)).into_response(),
        (_, _) => error(StatusCode::NOT_FOUND, &format!("{} {} not found", resource, id)),
    }
}

async fn create(
    State(db): State<SharedDb>,
    Path(resource): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut db = lock(&db);
    if db.table(&resource).is_none() {
        return error(StatusCode::NOT_FOUND, "Not found");
    }
    let blank_name = body
        .get("name")
        .and_then(Value::as_str)
        .map_or(false, |name| name.trim().is_empty());
    if blank_name {
        return error(StatusCode::BAD_REQUEST, "name must not be empty");
    }
    (StatusCode::CREATED, Json(db.insert(&resource, body))).into_response()
}

async fn update(
    State(db): State<SharedDb>,
    Path((resource, id)): Path<(String, i64)>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut db = lock(&db);
    if resource == "option" && db.failing_options.contains(&id) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "option update failed");
    }
    let Some(record) = db.table(&resource).and_then(|t| t.get_mut(&id)) else {
        return error(StatusCode::NOT_FOUND, &format!("{} {} not found", resource, id));
    };
    if let Value::Object(fields) = record {
        for (key, value) in body {
            fields.insert(key, value);
        }
        fields.insert("updatedAt".into(), json!(chrono::Utc::now().to_rfc3339()));
    }
    Json(json!({ "message": "updated" })).into_response()
}

async fn remove(State(db): State<SharedDb>, Path((resource, id)): Path<(String, i64)>) -> Response {
    let mut db = lock(&db);
    match db.table(&resource).and_then(|t| t.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, &format!("{} {} not found", resource, id)),
    }
}
