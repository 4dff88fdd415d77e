//! Small utility helpers used across modules.

/// Split a shell line into words. Single or double quotes group words
/// (`create --title "Correr 5k"`); there are no escapes.
/// Returns None when a quote is left open.
pub fn split_words(line: &str) -> Option<Vec<String>> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quote: Option<char> = None;

  for ch in line.chars() {
    match quote {
      Some(q) if ch == q => quote = None,
      Some(_) => current.push(ch),
      None if ch == '"' || ch == '\'' => {
        quote = Some(ch);
        in_word = true;
      }
      None if ch.is_whitespace() => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      None => {
        current.push(ch);
        in_word = true;
      }
    }
  }

  if quote.is_some() { return None; }
  if in_word { words.push(current); }
  Some(words)
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole response bodies.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) { end -= 1; }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_group_words() {
    let w = split_words(r#"create --title "Correr 5k" --category 'Vida sana'  --difficulty 2"#).unwrap();
    assert_eq!(w, vec!["create", "--title", "Correr 5k", "--category", "Vida sana", "--difficulty", "2"]);
  }

  #[test]
  fn empty_quotes_make_an_empty_word() {
    assert_eq!(split_words(r#"list --category "" "#).unwrap(), vec!["list", "--category", ""]);
  }

  #[test]
  fn open_quote_is_rejected() {
    assert!(split_words("create --title \"sin cerrar").is_none());
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("corto", 10), "corto");
    let t = trunc_for_log("categoría", 8);
    assert!(t.starts_with("categor"));
    assert!(t.ends_with("(10 bytes total)"));
  }
}
