//! Remote access to the retos backend.
//!
//! Thin typed wrappers over the REST endpoints. Non-success statuses become
//! `ClientError::Status` carrying the backend's `{error}` message when present.
//! Calls are instrumented and log paths, statuses and result sizes (not bodies).

use reqwest::header::USER_AGENT;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::domain::{find_category_by_name, Category, Challenge, Difficulty, State};
use crate::error::{ClientError, Result};
use crate::protocol::{
  ApiErrorOut, ChallengeForm, MessageOut, NewCategoryIn, NewChallengeIn, RemoteFilter, StateUpdateIn,
};
use crate::util::trunc_for_log;

pub const CATEGORY_UNAVAILABLE_NOTICE: &str = "No se pudo obtener ni crear la categoría";

const UA: &str = concat!("retos-client/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct RetosApi {
  client: reqwest::Client,
  pub base_url: String,
}

impl RetosApi {
  pub fn new(cfg: &ClientConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(cfg.timeout())
      .build()?;
    Ok(Self { client, base_url: cfg.api_url.trim_end_matches('/').to_string() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let res = self.client.get(self.url(path))
      .header(USER_AGENT, UA)
      .send().await?;
    read_json(res).await
  }

  // --- Reference data ---

  #[instrument(level = "debug", skip(self))]
  pub async fn list_difficulties(&self) -> Result<Vec<Difficulty>> {
    self.get_json("/dificultades").await
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn list_states(&self) -> Result<Vec<State>> {
    self.get_json("/estados").await
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn list_categories(&self) -> Result<Vec<Category>> {
    self.get_json("/categorias").await
  }

  /// Case-insensitive exact lookup over `GET /categorias`.
  #[instrument(level = "debug", skip(self))]
  pub async fn find_category(&self, name: &str) -> Result<Option<Category>> {
    let cats = self.list_categories().await?;
    Ok(find_category_by_name(&cats, name).cloned())
  }

  // --- Challenges ---

  /// `GET /retos`, optionally filtered server-side.
  #[instrument(level = "info", skip(self), fields(filtered = filter.map_or(false, |f| !f.is_empty())))]
  pub async fn list_challenges(&self, filter: Option<RemoteFilter>) -> Result<Vec<Challenge>> {
    let mut req = self.client.get(self.url("/retos")).header(USER_AGENT, UA);
    if let Some(f) = filter {
      req = req.query(&f);
    }
    let res = req.send().await?;
    let list: Vec<Challenge> = read_json(res).await?;
    info!(target: "reto", count = list.len(), "Challenges fetched");
    Ok(list)
  }

  /// Get-or-create by name. The backend rejects duplicate names, in which case the
  /// existing category is looked up case-insensitively. Transport errors are not
  /// retried through the fallback.
  #[instrument(level = "info", skip(self))]
  pub async fn create_category(&self, name: &str) -> Result<Category> {
    let res = self.client.post(self.url("/categorias"))
      .header(USER_AGENT, UA)
      .json(&NewCategoryIn { nombre: name.to_string() })
      .send().await?;

    match read_json::<Category>(res).await {
      Ok(cat) => {
        info!(target: "reto", id = cat.id, name = %cat.name, "Category created");
        Ok(cat)
      }
      Err(ClientError::Status { status, message }) => {
        warn!(target: "reto", %status, message = ?message, "Category create rejected; looking up existing");
        match self.find_category(name).await? {
          Some(cat) => {
            debug!(target: "reto", id = cat.id, "Reusing existing category");
            Ok(cat)
          }
          None => Err(ClientError::Lookup(CATEGORY_UNAVAILABLE_NOTICE.into())),
        }
      }
      Err(e) => Err(e),
    }
  }

  /// Validate the form, resolve its category, then `POST /retos`.
  /// A form with any empty field fails before any request is made.
  ///
  /// `known` is the caller's cached category list: a case-insensitive hit there is
  /// reused directly, otherwise the category goes through `create_category`.
  #[instrument(level = "info", skip(self, form, known), fields(title_len = form.title.len(), known = known.len()))]
  pub async fn create_challenge(&self, form: &ChallengeForm, known: &[Category]) -> Result<Challenge> {
    let valid = form.validate()?;
    let category = match find_category_by_name(known, &valid.category_name) {
      Some(c) => {
        debug!(target: "reto", id = c.id, "Category already cached");
        c.clone()
      }
      None => self.create_category(&valid.category_name).await?,
    };

    let body = NewChallengeIn {
      titulo: valid.title,
      descripcion: valid.description,
      id_categoria: category.id,
      id_dificultad: valid.difficulty_id,
      id_estado: valid.state_id,
    };
    let res = self.client.post(self.url("/retos"))
      .header(USER_AGENT, UA)
      .json(&body)
      .send().await?;
    let created: Challenge = read_json(res).await?;
    info!(target: "reto", id = created.id, category = category.id, "Challenge created");
    Ok(created)
  }

  /// `PATCH /retos/:id/estado`. Only the state field is sent.
  #[instrument(level = "info", skip(self))]
  pub async fn update_challenge_state(&self, id: i64, state_id: i64) -> Result<()> {
    let res = self.client.patch(self.url(&format!("/retos/{id}/estado")))
      .header(USER_AGENT, UA)
      .json(&StateUpdateIn { id_estado: state_id })
      .send().await?;
    ensure_success(res).await?;
    info!(target: "reto", id, state_id, "Challenge state updated");
    Ok(())
  }

  #[instrument(level = "info", skip(self))]
  pub async fn delete_challenge(&self, id: i64) -> Result<()> {
    let res = self.client.delete(self.url(&format!("/retos/{id}")))
      .header(USER_AGENT, UA)
      .send().await?;
    ensure_success(res).await?;
    info!(target: "reto", id, "Challenge deleted");
    Ok(())
  }

  /// `GET /` banner, used to check the backend is up.
  #[instrument(level = "debug", skip(self))]
  pub async fn health(&self) -> Result<String> {
    let m: MessageOut = self.get_json("/").await?;
    Ok(m.mensaje)
  }
}

async fn ensure_success(res: Response) -> Result<Response> {
  let status = res.status();
  if status.is_success() {
    return Ok(res);
  }
  let body = res.text().await.unwrap_or_default();
  Err(status_error(status, &body))
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
  let res = ensure_success(res).await?;
  let body = res.text().await?;
  serde_json::from_str::<T>(&body).map_err(|e| {
    debug!(target: "retos_client", body = %trunc_for_log(&body, 200), "Undecodable response body");
    ClientError::Decode(e.to_string())
  })
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
  let message = extract_api_error(body);
  debug!(target: "retos_client", %status, body = %trunc_for_log(body, 200), "Non-success response");
  ClientError::Status { status: status.as_u16(), message }
}

/// Try to extract the `{error}` message from a backend error body.
fn extract_api_error(body: &str) -> Option<String> {
  serde_json::from_str::<ApiErrorOut>(body).ok().map(|e| e.error)
}
