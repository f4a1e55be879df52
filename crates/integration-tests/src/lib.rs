//! Integration tests for the Francine storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p francine-integration-tests
//! ```
//!
//! No external services are needed: each test starts a [`FakeBackend`], an
//! in-process axum server speaking the same JSON API as the real backend,
//! on an ephemeral localhost port. Every request it receives is recorded so
//! tests can assert on exactly what the client sent, or that it sent nothing.
//!
//! # Test Categories
//!
//! - `catalog` - Catalog loading, normalization and fallback
//! - `checkout` - Guest checkout and cart clearing
//! - `auth` - Login, registration and session persistence
//! - `admin` - Catalog management

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use francine_storefront::Storefront;
use francine_storefront::config::ClientConfig;
use francine_storefront::storage::FileStorage;

/// Routes whose replies a test can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    ListProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    GuestCheckout,
    Login,
    Register,
}

/// An uploaded file as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub len: usize,
}

/// Body of a recorded request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form {
        fields: BTreeMap<String, String>,
        image: Option<Upload>,
    },
}

/// A request received by the fake backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: RequestBody,
}

impl RecordedRequest {
    /// The JSON body, if the request carried one.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// A multipart text field, if the request was a form.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Form { fields, .. } => fields.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// The uploaded image, if the request was a form with one.
    #[must_use]
    pub const fn image(&self) -> Option<&Upload> {
        match &self.body {
            RequestBody::Form { image, .. } => image.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    id: String,
    name: String,
    password: String,
    role: String,
}

#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Value>,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    overrides: HashMap<Route, (StatusCode, Value)>,
    requests: Vec<RecordedRequest>,
    next_id: u32,
}

impl BackendState {
    fn record(&mut self, method: Method, path: String, headers: &HeaderMap, body: RequestBody) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.requests.push(RecordedRequest {
            method,
            path,
            authorization,
            body,
        });
    }

    fn override_for(&self, route: Route) -> Option<Response> {
        self.overrides
            .get(&route)
            .map(|(status, body)| (*status, Json(body.clone())).into_response())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:04}", self.next_id)
    }

    /// Role of the bearer, or the rejection to send.
    fn require_admin(&self, headers: &HeaderMap) -> Result<(), Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        let Some(token) = token else {
            return Err(reply(
                StatusCode::UNAUTHORIZED,
                json!({"message": "Not authorized, no token"}),
            ));
        };
        match self.tokens.get(token).map(String::as_str) {
            Some("Admin") => Ok(()),
            Some(_) => Err(reply(
                StatusCode::FORBIDDEN,
                json!({"message": "Admin access required"}),
            )),
            None => Err(reply(
                StatusCode::UNAUTHORIZED,
                json!({"message": "Not authorized, token failed"}),
            )),
        }
    }

    fn issue_session(&mut self, email: &str, account: &Account) -> Value {
        let token = format!("token-{}", account.id);
        self.tokens.insert(token.clone(), account.role.clone());
        json!({
            "token": token,
            "user": {
                "_id": account.id,
                "name": account.name,
                "email": email,
                "role": account.role,
            },
        })
    }
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// In-process stand-in for the Francine backend.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Start the backend on an ephemeral localhost port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Shared::default();
        let app = Router::new()
            .route("/api/products", get(list_products).post(create_product))
            .route(
                "/api/products/{id}",
                put(update_product).delete(delete_product),
            )
            .route("/api/order/guestCheckout", post(guest_checkout))
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, task })
    }

    /// Origin the backend is listening on.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self, data_dir: &Path) -> ClientConfig {
        config_for(&self.base_url(), data_dir)
    }

    /// Add a product document to the catalog as-is.
    pub fn seed_product(&self, product: Value) {
        lock(&self.state).products.push(product);
    }

    /// Register an account that can log in.
    pub fn seed_account(&self, name: &str, email: &str, password: &str, role: &str) {
        let mut state = lock(&self.state);
        let id = state.next_id("u");
        state.accounts.insert(
            email.to_owned(),
            Account {
                id,
                name: name.to_owned(),
                password: password.to_owned(),
                role: role.to_owned(),
            },
        );
    }

    /// Answer every request to `route` with this status and body.
    pub fn respond(&self, route: Route, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state).overrides.insert(route, (status, body));
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests whose path starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        lock(&self.state)
            .requests
            .iter()
            .filter(|request| request.path.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Current catalog documents.
    #[must_use]
    pub fn products(&self) -> Vec<Value> {
        lock(&self.state).products.clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Client configuration for `base_url` with state under `data_dir`.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
pub fn config_for(base_url: &str, data_dir: &Path) -> ClientConfig {
    let base_url = base_url.to_owned();
    let home = data_dir.to_string_lossy().into_owned();
    ClientConfig::from_lookup(move |key| match key {
        "FRANCINE_API_BASE" => Some(base_url.clone()),
        "FRANCINE_HOME" => Some(home.clone()),
        "FRANCINE_HTTP_TIMEOUT_SECS" => Some("5".to_owned()),
        _ => None,
    })
    .expect("test configuration is valid")
}

/// Origin of a port nothing is listening on.
///
/// # Panics
///
/// Panics if no port can be reserved.
#[must_use]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve a port");
    let addr = listener.local_addr().expect("reserved port has an address");
    drop(listener);
    format!("http://{addr}")
}

/// Open a file-backed storefront against `base_url` in a fresh directory.
///
/// The directory is removed when the returned guard is dropped.
///
/// # Panics
///
/// Panics if the directory or client cannot be created.
#[must_use]
pub fn open_storefront(base_url: &str) -> (Storefront<FileStorage>, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let storefront = reopen_storefront(base_url, dir.path());
    (storefront, dir)
}

/// Open a storefront over an existing data directory.
///
/// # Panics
///
/// Panics if the client cannot be created.
#[must_use]
pub fn reopen_storefront(base_url: &str, data_dir: &Path) -> Storefront<FileStorage> {
    Storefront::open(config_for(base_url, data_dir)).expect("open storefront")
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.record(
        Method::GET,
        "/api/products".to_owned(),
        &headers,
        RequestBody::Empty,
    );
    if let Some(response) = state.override_for(Route::ListProducts) {
        return response;
    }
    Json(Value::Array(state.products.clone())).into_response()
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let body = match read_form(multipart).await {
        Ok(body) => body,
        Err(status) => return status.into_response(),
    };

    let mut state = lock(&state);
    state.record(
        Method::POST,
        "/api/products".to_owned(),
        &headers,
        body.clone(),
    );
    if let Some(response) = state.override_for(Route::CreateProduct) {
        return response;
    }
    if let Err(response) = state.require_admin(&headers) {
        return response;
    }

    let id = state.next_id("p");
    let mut product = json!({"_id": id});
    apply_form(&mut product, &body);
    state.products.push(product.clone());
    reply(StatusCode::CREATED, product)
}

async fn update_product(
    State(state): State<Shared>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let body = match read_form(multipart).await {
        Ok(body) => body,
        Err(status) => return status.into_response(),
    };

    let mut state = lock(&state);
    state.record(
        Method::PUT,
        format!("/api/products/{id}"),
        &headers,
        body.clone(),
    );
    if let Some(response) = state.override_for(Route::UpdateProduct) {
        return response;
    }
    if let Err(response) = state.require_admin(&headers) {
        return response;
    }

    let Some(product) = state
        .products
        .iter_mut()
        .find(|product| product.get("_id").and_then(Value::as_str) == Some(id.as_str()))
    else {
        return reply(
            StatusCode::NOT_FOUND,
            json!({"message": "Product not found"}),
        );
    };
    apply_form(product, &body);
    Json(product.clone()).into_response()
}

async fn delete_product(
    State(state): State<Shared>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    state.record(
        Method::DELETE,
        format!("/api/products/{id}"),
        &headers,
        RequestBody::Empty,
    );
    if let Some(response) = state.override_for(Route::DeleteProduct) {
        return response;
    }
    if let Err(response) = state.require_admin(&headers) {
        return response;
    }

    let before = state.products.len();
    state
        .products
        .retain(|product| product.get("_id").and_then(Value::as_str) != Some(id.as_str()));
    if state.products.len() == before {
        return reply(
            StatusCode::NOT_FOUND,
            json!({"message": "Product not found"}),
        );
    }
    Json(json!({"message": "Product removed"})).into_response()
}

async fn guest_checkout(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(order): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(
        Method::POST,
        "/api/order/guestCheckout".to_owned(),
        &headers,
        RequestBody::Json(order),
    );
    if let Some(response) = state.override_for(Route::GuestCheckout) {
        return response;
    }
    let order_id = state.next_id("o");
    Json(json!({"status": "success", "orderId": order_id})).into_response()
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(credentials): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(
        Method::POST,
        "/api/auth/login".to_owned(),
        &headers,
        RequestBody::Json(credentials.clone()),
    );
    if let Some(response) = state.override_for(Route::Login) {
        return response;
    }

    let email = text(&credentials, "email");
    let password = text(&credentials, "password");
    match state.accounts.get(&email).cloned() {
        Some(account) if account.password == password => {
            let session = state.issue_session(&email, &account);
            Json(session).into_response()
        }
        _ => reply(
            StatusCode::UNAUTHORIZED,
            json!({"message": "Invalid credentials"}),
        ),
    }
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(details): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.record(
        Method::POST,
        "/api/auth/register".to_owned(),
        &headers,
        RequestBody::Json(details.clone()),
    );
    if let Some(response) = state.override_for(Route::Register) {
        return response;
    }

    let email = text(&details, "email");
    if state.accounts.contains_key(&email) {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"message": "User already exists"}),
        );
    }
    let account = Account {
        id: state.next_id("u"),
        name: text(&details, "name"),
        password: text(&details, "password"),
        role: "Customer".to_owned(),
    };
    state.accounts.insert(email.clone(), account.clone());
    let session = state.issue_session(&email, &account);
    reply(StatusCode::CREATED, session)
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

async fn read_form(mut multipart: Multipart) -> Result<RequestBody, StatusCode> {
    let mut fields = BTreeMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            image = Some(Upload {
                file_name,
                content_type,
                len: bytes.len(),
            });
        } else {
            let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            fields.insert(name, value);
        }
    }

    Ok(RequestBody::Form { fields, image })
}

/// Copy submitted form fields onto a product document.
fn apply_form(product: &mut Value, body: &RequestBody) {
    let RequestBody::Form { fields, image } = body else {
        return;
    };
    let Some(doc) = product.as_object_mut() else {
        return;
    };
    for key in ["name", "description"] {
        if let Some(value) = fields.get(key) {
            doc.insert(key.to_owned(), Value::String(value.clone()));
        }
    }
    if let Some(price) = fields.get("price").and_then(|raw| raw.parse::<f64>().ok()) {
        doc.insert("price".to_owned(), Value::from(price));
    }
    if let Some(upload) = image {
        doc.insert(
            "imageUrl".to_owned(),
            Value::String(format!("/uploads/{}", upload.file_name)),
        );
    }
}
