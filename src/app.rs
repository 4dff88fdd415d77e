//! User actions shared by one-shot commands and the interactive shell.
//!
//! This includes:
//!   - page load (reference data + full collection)
//!   - creation with category get-or-create
//!   - local filtering and the server-side filter variant
//!   - optimistic state changes with full resync on failure
//!   - deletion
//!
//! Every failure is caught here, logged, and turned into a notification; actions
//! report success with their return value and never propagate errors.

use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use crate::api::RetosApi;
use crate::config::ClientConfig;
use crate::domain::{find_category_by_name, Challenge, State};
use crate::error::{ClientError, Result};
use crate::filter::LocalFilter;
use crate::notify::NotificationCenter;
use crate::protocol::{ChallengeForm, RemoteFilter};
use crate::render::{render_list, render_notifications};
use crate::store::ChallengeStore;

pub const CREATED_NOTICE: &str = "Reto creado exitosamente";
pub const STATE_UPDATED_NOTICE: &str = "Estado actualizado correctamente";
pub const DELETED_NOTICE: &str = "Reto eliminado correctamente";
pub const INVALID_STATE_NOTICE: &str = "Estado inválido";
pub const UNKNOWN_CATEGORY_NOTICE: &str = "Categoría no encontrada";
pub const UNKNOWN_CHALLENGE_NOTICE: &str = "Reto no encontrado";

/// How the user named the target state: by server id or by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateRef {
  Id(i64),
  Name(String),
}

impl StateRef {
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    match raw.parse::<i64>() {
      Ok(id) => StateRef::Id(id),
      Err(_) => StateRef::Name(raw.to_string()),
    }
  }
}

pub struct App {
  api: RetosApi,
  store: ChallengeStore,
  notices: NotificationCenter,
}

impl App {
  pub fn new(cfg: &ClientConfig) -> Result<Self> {
    Ok(Self {
      api: RetosApi::new(cfg)?,
      store: ChallengeStore::new(),
      notices: NotificationCenter::new(cfg.notification_ttl()),
    })
  }

  pub fn api(&self) -> &RetosApi { &self.api }

  pub fn store(&self) -> &ChallengeStore { &self.store }

  pub fn notices(&self) -> &NotificationCenter { &self.notices }

  pub fn notices_mut(&mut self) -> &mut NotificationCenter { &mut self.notices }

  /// Notifications still on screen followed by the current view.
  pub fn render(&mut self) -> String {
    let list = render_list(self.store.visible());
    self.with_notices(list)
  }

  /// Prefix any view with the notifications that have not expired yet.
  pub fn with_notices(&mut self, view: String) -> String {
    let notes = render_notifications(self.notices.active(Instant::now()));
    if notes.is_empty() { view } else { format!("{}\n\n{}", notes, view) }
  }

  fn fail(&mut self, err: &ClientError, fallback: &str) {
    error!(target: "reto", error = %err, "{}", fallback);
    self.notices.error(err.notice(fallback));
  }

  /// Page load: reference lists, then the whole collection with no filter.
  #[instrument(level = "info", skip(self))]
  pub async fn load_page(&mut self) {
    self.load_reference().await;
    self.store.clear_filter();
    self.reload().await;
  }

  /// Each list loads on its own; one failing does not stop the others.
  #[instrument(level = "info", skip(self))]
  pub async fn load_reference(&mut self) {
    match self.api.list_difficulties().await {
      Ok(d) => self.store.reference.difficulties = d,
      Err(e) => self.fail(&e, "Error al cargar dificultades"),
    }
    match self.api.list_states().await {
      Ok(s) => self.store.reference.states = s,
      Err(e) => self.fail(&e, "Error al cargar estados"),
    }
    match self.api.list_categories().await {
      Ok(c) => self.store.reference.categories = c,
      Err(e) => self.fail(&e, "Error al cargar categorías"),
    }
  }

  /// Replace the cached collection with the server's and re-apply the current filter.
  #[instrument(level = "info", skip(self))]
  pub async fn reload(&mut self) -> bool {
    match self.api.list_challenges(None).await {
      Ok(list) => {
        self.store.replace_all(list);
        true
      }
      Err(e) => {
        self.fail(&e, "Error al obtener retos");
        false
      }
    }
  }

  /// Validate, get-or-create the category, create the challenge, then reload with
  /// the filter cleared so the new entry is visible.
  #[instrument(level = "info", skip(self, form))]
  pub async fn create_challenge(&mut self, form: &ChallengeForm) -> Option<Challenge> {
    match self.api.create_challenge(form, &self.store.reference.categories).await {
      Ok(created) => {
        info!(target: "reto", id = created.id, "Challenge created from form");
        self.notices.success(CREATED_NOTICE);
        if !self.store.reference.categories.iter().any(|c| c.id == created.category.id) {
          self.store.reference.categories.push(created.category.clone());
        }
        self.store.clear_filter();
        self.reload().await;
        Some(created)
      }
      Err(e) if e.is_validation() => {
        warn!(target: "reto", error = %e, "Creation form rejected before sending");
        self.notices.error(e.notice(""));
        None
      }
      Err(e) => {
        self.fail(&e, "Error creando reto");
        None
      }
    }
  }

  /// Local filter over the cached collection. Blank inputs clear the predicate.
  #[instrument(level = "info", skip(self))]
  pub fn apply_filter(&mut self, category: &str, difficulty: &str) -> &[Challenge] {
    self.store.set_filter(LocalFilter::from_inputs(category, difficulty));
    self.store.visible()
  }

  pub fn clear_filter(&mut self) {
    self.store.clear_filter();
  }

  /// Server-side filter. The category must name an existing category exactly
  /// (case-insensitive). The result is returned for display; the cache is untouched.
  #[instrument(level = "info", skip(self))]
  pub async fn filter_remote(&mut self, category: &str, difficulty: &str) -> Option<Vec<Challenge>> {
    let category = category.trim();
    let mut filter = RemoteFilter::default();

    if !category.is_empty() {
      let found = match self.api.list_categories().await {
        Ok(cats) => {
          let hit = find_category_by_name(&cats, category).cloned();
          self.store.reference.categories = cats;
          hit
        }
        Err(e) => {
          self.fail(&e, "Error al filtrar retos");
          return None;
        }
      };
      match found {
        Some(c) => filter.category_id = Some(c.id),
        None => {
          self.notices.error(UNKNOWN_CATEGORY_NOTICE);
          return None;
        }
      }
    }
    let difficulty = difficulty.trim();
    if !difficulty.is_empty() {
      match difficulty.parse::<i64>() {
        Ok(id) => filter.difficulty_id = Some(id),
        Err(_) => {
          debug!(target: "reto", difficulty, "Difficulty is not an id; nothing can match");
          return Some(Vec::new());
        }
      }
    }

    match self.api.list_challenges(Some(filter)).await {
      Ok(list) => Some(list),
      Err(e) => {
        self.fail(&e, "Error al filtrar retos");
        None
      }
    }
  }

  fn resolve_state(&self, wanted: &StateRef) -> Option<State> {
    let refs = &self.store.reference;
    match wanted {
      StateRef::Id(id) => refs.state_by_id(*id).cloned(),
      StateRef::Name(name) => refs.state_by_name(name).cloned(),
    }
  }

  /// Optimistic state change. The cache is updated first; if the server refuses,
  /// the whole collection is reloaded instead of rolling back in place.
  #[instrument(level = "info", skip(self))]
  pub async fn change_state(&mut self, id: i64, wanted: StateRef) -> bool {
    let Some(state) = self.resolve_state(&wanted) else {
      warn!(target: "reto", id, ?wanted, "Unknown state");
      self.notices.error(INVALID_STATE_NOTICE);
      return false;
    };
    let state_id = state.id;
    let Some(previous) = self.store.set_state(id, state) else {
      warn!(target: "reto", id, "State change for a challenge not in cache");
      self.notices.error(UNKNOWN_CHALLENGE_NOTICE);
      return false;
    };
    info!(target: "reto", id, from = previous.id, to = state_id, "Optimistic state applied");

    match self.api.update_challenge_state(id, state_id).await {
      Ok(()) => {
        self.notices.success(STATE_UPDATED_NOTICE);
        true
      }
      Err(e) => {
        self.fail(&e, "Error al cambiar estado");
        warn!(target: "reto", id, "Resyncing collection after failed state change");
        self.reload().await;
        false
      }
    }
  }

  /// Delete on the server, then drop the entry from the cache.
  #[instrument(level = "info", skip(self))]
  pub async fn delete_challenge(&mut self, id: i64) -> bool {
    match self.api.delete_challenge(id).await {
      Ok(()) => {
        self.store.remove(id);
        self.notices.success(DELETED_NOTICE);
        true
      }
      Err(e) => {
        self.fail(&e, "Error al eliminar reto");
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_ref_parses_ids_and_names() {
    assert_eq!(StateRef::parse(" 3 "), StateRef::Id(3));
    assert_eq!(StateRef::parse("En proceso"), StateRef::Name("En proceso".into()));
  }
}
