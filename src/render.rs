//! Terminal rendering. Pure functions of the current collection to text: the
//! whole view is rebuilt on every call, nothing is diffed.

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::domain::{Challenge, ReferenceData};
use crate::notify::{NoticeKind, Notification};

pub const EMPTY_PLACEHOLDER: &str = "No hay retos disponibles. ¡Crea tu primer reto!";

/// "Mostrando N reto(s)".
pub fn stats_line(total: usize) -> String {
  format!("Mostrando {} {}", total, if total == 1 { "reto" } else { "retos" })
}

pub fn render_list(challenges: &[Challenge]) -> String {
  if challenges.is_empty() {
    return format!("{}\n{}", EMPTY_PLACEHOLDER, stats_line(0));
  }

  let mut table = Table::new();
  table
    .load_preset(UTF8_FULL)
    .set_header(vec!["ID", "Título", "Descripción", "Categoría", "Dificultad", "Estado"]);
  for c in challenges {
    table.add_row(vec![
      c.id.to_string(),
      c.title.clone(),
      c.description.clone(),
      c.category.name.clone(),
      c.difficulty.name.clone(),
      format!("{} {}", c.state.kind().marker(), c.state.name),
    ]);
  }
  format!("{}\n{}", table, stats_line(challenges.len()))
}

pub fn render_notifications(items: &[Notification]) -> String {
  items
    .iter()
    .map(|n| match n.kind {
      NoticeKind::Success => format!("✔ {}", n.message),
      NoticeKind::Error => format!("✖ {}", n.message),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Difficulties, states and categories, one small table each.
pub fn render_reference(refs: &ReferenceData) -> String {
  let section = |title: &str, rows: Vec<(i64, &str)>| {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL).set_header(vec!["ID", title]);
    for (id, name) in rows {
      t.add_row(vec![id.to_string(), name.to_string()]);
    }
    t.to_string()
  };

  [
    section("Dificultad", refs.difficulties.iter().map(|d| (d.id, d.name.as_str())).collect()),
    section("Estado", refs.states.iter().map(|s| (s.id, s.name.as_str())).collect()),
    section("Categoría", refs.categories.iter().map(|c| (c.id, c.name.as_str())).collect()),
  ]
  .join("\n")
}
