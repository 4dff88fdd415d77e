//! Local filtering of the cached challenge collection.

use crate::domain::Challenge;

/// Difficulty predicate. Input that is not an id is kept as `Unmatchable`.
#[derive(Clone, Debug, PartialEq, Eq)]
enum DifficultyFilter {
  Id(i64),
  Unmatchable,
}

/// Category substring (case-insensitive) and exact difficulty id; `None` disables a predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalFilter {
  category: Option<String>,
  difficulty: Option<DifficultyFilter>,
}

impl LocalFilter {
  pub fn new(category: Option<&str>, difficulty_id: Option<i64>) -> Self {
    let category = category
      .map(|c| c.trim().to_lowercase())
      .filter(|c| !c.is_empty());
    Self { category, difficulty: difficulty_id.map(DifficultyFilter::Id) }
  }

  /// Build from raw input fields. Blank text means "no filter". A non-blank
  /// difficulty that is not an integer selects nothing.
  pub fn from_inputs(category: &str, difficulty: &str) -> Self {
    let mut filter = Self::new(Some(category), None);
    let difficulty = difficulty.trim();
    if !difficulty.is_empty() {
      filter.difficulty = Some(match difficulty.parse::<i64>() {
        Ok(id) => DifficultyFilter::Id(id),
        Err(_) => DifficultyFilter::Unmatchable,
      });
    }
    filter
  }

  pub fn category(&self) -> Option<&str> {
    self.category.as_deref()
  }

  /// The difficulty id filtered on, if the input named one.
  pub fn difficulty_id(&self) -> Option<i64> {
    match self.difficulty {
      Some(DifficultyFilter::Id(id)) => Some(id),
      _ => None,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.category.is_none() && self.difficulty.is_none()
  }

  pub fn matches(&self, c: &Challenge) -> bool {
    let category_ok = match &self.category {
      Some(needle) => c.category.name.to_lowercase().contains(needle.as_str()),
      None => true,
    };
    let difficulty_ok = match self.difficulty {
      Some(DifficultyFilter::Id(id)) => c.difficulty.id == id,
      Some(DifficultyFilter::Unmatchable) => false,
      None => true,
    };
    category_ok && difficulty_ok
  }

  /// Recompute the filtered view from the full collection, keeping its order.
  pub fn apply(&self, all: &[Challenge]) -> Vec<Challenge> {
    all.iter().filter(|c| self.matches(c)).cloned().collect()
  }
}
