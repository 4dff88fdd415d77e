//! In-process fake of the retos backend (axum), honouring the same contract as the
//! real service: seeded reference data, duplicate category rejection, default
//! state on creation, 404s on unknown ids. `fail_state_updates` makes every
//! `PATCH /retos/:id/estado` answer 500.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State as AxState},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use retos_client::app::App;
use retos_client::config::ClientConfig;
use retos_client::domain::{Category, Challenge, Difficulty, State};

#[derive(Debug, Default)]
pub struct Db {
    pub categories: Vec<Category>,
    pub difficulties: Vec<Difficulty>,
    pub states: Vec<State>,
    pub retos: Vec<Challenge>,
    pub fail_state_updates: bool,
    /// "METHOD /path" for every request received.
    pub requests: Vec<String>,
}

impl Db {
    pub fn seeded() -> Self {
        let categories = ["Salud", "Educación", "Negocios", "Arte"]
            .iter()
            .enumerate()
            .map(|(i, n)| Category { id: i as i64 + 1, name: (*n).into() })
            .collect();
        let difficulties = ["Bajo", "Medio", "Alto"]
            .iter()
            .enumerate()
            .map(|(i, n)| Difficulty { id: i as i64 + 1, name: (*n).into() })
            .collect();
        let states = ["Pendiente", "En proceso", "Completado"]
            .iter()
            .enumerate()
            .map(|(i, n)| State { id: i as i64 + 1, name: (*n).into() })
            .collect();
        Self { categories, difficulties, states, ..Default::default() }
    }

    pub fn add_category(&mut self, name: &str) -> Category {
        let c = Category { id: self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1, name: name.into() };
        self.categories.push(c.clone());
        c
    }

    /// Insert a challenge directly, bypassing the API.
    pub fn add_reto(&mut self, title: &str, category_id: i64, difficulty_id: i64, state_id: i64) -> i64 {
        let id = self.retos.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let reto = Challenge {
            id,
            title: title.into(),
            description: format!("descripción de {title}"),
            category: self.category(category_id).expect("seeded category"),
            difficulty: self.difficulty(difficulty_id).expect("seeded difficulty"),
            state: self.state(state_id).expect("seeded state"),
        };
        self.retos.push(reto);
        id
    }

    fn category(&self, id: i64) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }
    fn difficulty(&self, id: i64) -> Option<Difficulty> {
        self.difficulties.iter().find(|d| d.id == id).cloned()
    }
    fn state(&self, id: i64) -> Option<State> {
        self.states.iter().find(|s| s.id == id).cloned()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests.iter().filter(|r| r.as_str() == request).count()
    }
}

type Shared = Arc<Mutex<Db>>;

pub struct FakeBackend {
    pub url: String,
    pub db: Shared,
}

impl FakeBackend {
    pub async fn start(db: Db) -> Self {
        let db: Shared = Arc::new(Mutex::new(db));
        let app = router(db.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { url: format!("http://{addr}"), db }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default().with_api_url(&self.url)
    }

    pub fn app(&self) -> App {
        App::new(&self.config()).unwrap()
    }

    pub fn with_db<R>(&self, f: impl FnOnce(&mut Db) -> R) -> R {
        f(&mut self.db.lock().unwrap())
    }
}

fn router(db: Shared) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/retos", get(list_retos).post(create_reto))
        .route("/retos/:id", axum::routing::delete(delete_reto))
        .route("/retos/:id/estado", patch(update_state))
        .route("/categorias", get(list_categorias).post(create_categoria))
        .route("/dificultades", get(list_dificultades))
        .route("/estados", get(list_estados))
        .layer(axum::middleware::from_fn_with_state(db.clone(), record))
        .with_state(db)
}

async fn record(
    AxState(db): AxState<Shared>,
    method: Method,
    uri: Uri,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    db.lock().unwrap().requests.push(format!("{} {}", method, uri.path()));
    next.run(req).await
}

fn err(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": msg })))
}

async fn home() -> impl IntoResponse {
    Json(json!({ "mensaje": "API de Retos corriendo correctamente" }))
}

#[derive(Deserialize)]
struct ListQuery {
    categoria: Option<i64>,
    dificultad: Option<i64>,
}

async fn list_retos(AxState(db): AxState<Shared>, Query(q): Query<ListQuery>) -> impl IntoResponse {
    let db = db.lock().unwrap();
    let list: Vec<Challenge> = db
        .retos
        .iter()
        .filter(|r| q.categoria.map_or(true, |id| r.category.id == id))
        .filter(|r| q.dificultad.map_or(true, |id| r.difficulty.id == id))
        .cloned()
        .collect();
    Json(list)
}

async fn create_reto(AxState(db): AxState<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    for k in ["titulo", "descripcion", "id_categoria", "id_dificultad"] {
        let present = match body.get(k) {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(_)) => true,
            _ => false,
        };
        if !present {
            return err(StatusCode::BAD_REQUEST, &format!("{k} es requerido"));
        }
    }
    let id_of = |k: &str| body.get(k).and_then(Value::as_i64);
    let Some(difficulty) = id_of("id_dificultad").and_then(|id| db.difficulty(id)) else {
        return err(StatusCode::BAD_REQUEST, "Dificultad inválida");
    };
    let state_id = id_of("id_estado").unwrap_or(1);
    let Some(state) = db.state(state_id) else {
        return err(StatusCode::BAD_REQUEST, "Estado inválido");
    };
    let Some(category) = id_of("id_categoria").and_then(|id| db.category(id)) else {
        return err(StatusCode::BAD_REQUEST, "Categoría inválida");
    };

    let reto = Challenge {
        id: db.retos.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        title: body["titulo"].as_str().unwrap_or_default().into(),
        description: body["descripcion"].as_str().unwrap_or_default().into(),
        category,
        difficulty,
        state,
    };
    db.retos.push(reto.clone());
    (StatusCode::CREATED, Json(serde_json::to_value(reto).unwrap()))
}

async fn update_state(
    AxState(db): AxState<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    if db.fail_state_updates {
        return err(StatusCode::INTERNAL_SERVER_ERROR, "fallo interno");
    }
    let Some(state) = body.get("id_estado").and_then(Value::as_i64).and_then(|s| db.state(s)) else {
        return err(StatusCode::BAD_REQUEST, "Estado inválido");
    };
    let Some(reto) = db.retos.iter_mut().find(|r| r.id == id) else {
        return err(StatusCode::NOT_FOUND, "Reto no encontrado");
    };
    reto.state = state;
    let out = serde_json::to_value(&*reto).unwrap();
    (StatusCode::OK, Json(out))
}

async fn delete_reto(AxState(db): AxState<Shared>, Path(id): Path<i64>) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    let Some(pos) = db.retos.iter().position(|r| r.id == id) else {
        return err(StatusCode::NOT_FOUND, "Reto no encontrado");
    };
    db.retos.remove(pos);
    (StatusCode::OK, Json(json!({ "mensaje": format!("Reto {id} eliminado correctamente") })))
}

async fn list_categorias(AxState(db): AxState<Shared>) -> impl IntoResponse {
    Json(db.lock().unwrap().categories.clone())
}

#[derive(Deserialize)]
struct NewCategory {
    nombre: Option<String>,
}

/// Duplicates are detected case-sensitively, like a plain unique column.
async fn create_categoria(AxState(db): AxState<Shared>, Json(body): Json<NewCategory>) -> impl IntoResponse {
    let mut db = db.lock().unwrap();
    let Some(name) = body.nombre.filter(|n| !n.is_empty()) else {
        return err(StatusCode::BAD_REQUEST, "nombre es requerido");
    };
    if db.categories.iter().any(|c| c.name == name) {
        return err(StatusCode::BAD_REQUEST, "La categoría ya existe");
    }
    let c = db.add_category(&name);
    (StatusCode::CREATED, Json(serde_json::to_value(c).unwrap()))
}

async fn list_dificultades(AxState(db): AxState<Shared>) -> impl IntoResponse {
    Json(db.lock().unwrap().difficulties.clone())
}

async fn list_estados(AxState(db): AxState<Shared>) -> impl IntoResponse {
    Json(db.lock().unwrap().states.clone())
}
