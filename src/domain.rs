//! Domain models mirrored from the backend: challenges and their reference data.
//!
//! Field names on the wire are Spanish (`id_reto`, `titulo`, ...); the Rust side
//! uses English names and maps them with serde renames.

use serde::{Deserialize, Serialize};

/// Free-text grouping, created on demand by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  #[serde(rename = "id_categoria")] pub id: i64,
  #[serde(rename = "nombre")] pub name: String,
}

/// Fixed difficulty level ("Bajo", "Medio", "Alto" on the reference backend).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
  #[serde(rename = "id_dificultad")] pub id: i64,
  #[serde(rename = "nombre")] pub name: String,
}

/// Lifecycle state of a challenge as issued by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
  #[serde(rename = "id_estado")] pub id: i64,
  #[serde(rename = "nombre")] pub name: String,
}

impl State {
  pub fn kind(&self) -> StateKind {
    StateKind::from_name(&self.name)
  }
}

/// Known states, derived from the server-side name. The id stays authoritative;
/// this is only used to label the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
  Pending,
  InProgress,
  Completed,
  Other,
}

impl StateKind {
  pub fn from_name(name: &str) -> Self {
    match name.trim().to_lowercase().as_str() {
      "pendiente" => StateKind::Pending,
      "en proceso" => StateKind::InProgress,
      "completado" => StateKind::Completed,
      _ => StateKind::Other,
    }
  }

  /// Glyph drawn next to the state name in the terminal view.
  pub fn marker(self) -> &'static str {
    match self {
      StateKind::Pending => "○",
      StateKind::InProgress => "◐",
      StateKind::Completed => "●",
      StateKind::Other => "·",
    }
  }
}

/// A challenge ("reto") with its category, difficulty and state embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
  #[serde(rename = "id_reto")] pub id: i64,
  #[serde(rename = "titulo")] pub title: String,
  #[serde(rename = "descripcion")] pub description: String,
  #[serde(rename = "categoria")] pub category: Category,
  #[serde(rename = "dificultad")] pub difficulty: Difficulty,
  #[serde(rename = "estado")] pub state: State,
}

/// Reference lists loaded once per page load. Read-only from the client's side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceData {
  pub difficulties: Vec<Difficulty>,
  pub states: Vec<State>,
  pub categories: Vec<Category>,
}

impl ReferenceData {
  pub fn state_by_id(&self, id: i64) -> Option<&State> {
    self.states.iter().find(|s| s.id == id)
  }

  /// Case-insensitive exact match on the state name.
  pub fn state_by_name(&self, name: &str) -> Option<&State> {
    let wanted = name.trim().to_lowercase();
    self.states.iter().find(|s| s.name.to_lowercase() == wanted)
  }
}

/// Case-insensitive exact lookup shared by category get-or-create and remote filtering.
pub fn find_category_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
  let wanted = name.trim().to_lowercase();
  categories.iter().find(|c| c.name.to_lowercase() == wanted)
}
