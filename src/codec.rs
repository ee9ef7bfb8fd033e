//! The MapID codec: permissive positional parse, exhaustive validation,
//! and deterministic generation of question identifiers.
//!
//! An identifier packs six taxonomy fields into five characters plus an
//! optional `-form` suffix:
//!   position 0 → grade, 1 → subject, 2 → chapter, 3 → level, 4 → lesson.
//! `parse` only decomposes; alphabet membership is the business of
//! `validate` and `generate`, so callers can still inspect malformed input
//! for diagnostics before rejecting it.

use serde::Deserialize;

use crate::domain::{is_field_char, Dimension, IdFormat, Identifier, Level};

/// Identifier positions of the five body fields, in order.
const BODY_FIELDS: [Dimension; 5] = [
  Dimension::Grade,
  Dimension::Subject,
  Dimension::Chapter,
  Dimension::Level,
  Dimension::Lesson,
];

/// Errors raised by `parse` and `generate`. `validate` never raises; it
/// accumulates findings into a `ValidationReport` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
  #[error("{segment} must have exactly {expected} character(s), got {actual}")]
  MalformedLength {
    segment: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("missing mandatory component(s): {}", .fields.join(", "))]
  MissingComponent { fields: Vec<String> },
  #[error("component {field} must be exactly one character, got \"{value}\"")]
  InvalidComponentLength { field: &'static str, value: String },
  #[error("component {field} has character '{value}' outside its alphabet")]
  InvalidComponentAlphabet { field: &'static str, value: char },
}

/// Outcome of `validate`: every broken rule, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
  pub is_valid: bool,
  pub errors: Vec<String>,
}

/// Input to `generate`. The first five components are mandatory; supplying
/// `form` selects ID6 output.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IdComponents {
  #[serde(default)] pub grade: Option<String>,
  #[serde(default)] pub subject: Option<String>,
  #[serde(default)] pub chapter: Option<String>,
  #[serde(default)] pub level: Option<String>,
  #[serde(default)] pub lesson: Option<String>,
  #[serde(default)] pub form: Option<String>,
}

impl IdComponents {
  fn get(&self, dim: Dimension) -> Option<&String> {
    match dim {
      Dimension::Grade => self.grade.as_ref(),
      Dimension::Subject => self.subject.as_ref(),
      Dimension::Chapter => self.chapter.as_ref(),
      Dimension::Level => self.level.as_ref(),
      Dimension::Lesson => self.lesson.as_ref(),
      Dimension::Form => self.form.as_ref(),
    }
  }
}

/// Strip enclosing brackets and a trailing `%` (LaTeX sources wrap ids as
/// `[0P1N1-1]%`), then trim whitespace.
pub fn normalize(raw: &str) -> String {
  raw
    .chars()
    .filter(|c| !matches!(c, '[' | ']' | '%'))
    .collect::<String>()
    .trim()
    .to_string()
}

/// Decompose a raw identifier string into positional fields.
///
/// Permissive by design: only segment lengths are enforced here. Characters
/// outside the field alphabets pass through and are caught by `validate`.
pub fn parse(raw: &str) -> Result<Identifier, CodecError> {
  let normalized = normalize(raw);

  let (body, suffix, format) = match normalized.split_once('-') {
    Some((body, suffix)) => {
      let body_len = body.chars().count();
      if body_len != 5 {
        return Err(CodecError::MalformedLength {
          segment: "ID6 body",
          expected: 5,
          actual: body_len,
        });
      }
      // Any second `-` sits after the first one; count separators directly
      // so inputs like "0P1N1--" cannot masquerade as a one-char suffix.
      if suffix.contains('-') {
        return Err(CodecError::MalformedLength {
          segment: "ID6 separator",
          expected: 1,
          actual: normalized.matches('-').count(),
        });
      }
      let suffix_len = suffix.chars().count();
      if suffix_len != 1 {
        return Err(CodecError::MalformedLength {
          segment: "ID6 form suffix",
          expected: 1,
          actual: suffix_len,
        });
      }
      (body.to_string(), suffix.chars().next(), IdFormat::Id6)
    }
    None => {
      let len = normalized.chars().count();
      if len != 5 {
        return Err(CodecError::MalformedLength {
          segment: "ID5",
          expected: 5,
          actual: len,
        });
      }
      (normalized.clone(), None, IdFormat::Id5)
    }
  };

  let chars: Vec<char> = body.chars().collect();
  Ok(Identifier {
    raw: raw.to_string(),
    normalized,
    format,
    grade: Some(chars[0]),
    subject: Some(chars[1]),
    chapter: Some(chars[2]),
    level: Some(chars[3]),
    lesson: Some(chars[4]),
    form: suffix,
  })
}

/// Check a raw string against the full grammar, accumulating one error per
/// broken rule so a caller sees all problems at once.
pub fn validate(raw: &str) -> ValidationReport {
  let normalized = normalize(raw);
  let mut errors = Vec::new();

  let (body, suffix) = match normalized.split_once('-') {
    Some((b, s)) => (b.to_string(), Some(s.to_string())),
    None => (normalized.clone(), None),
  };

  match &suffix {
    Some(s) => {
      let body_len = body.chars().count();
      if body_len != 5 {
        errors.push(format!("ID6 body must have exactly 5 characters, got {}", body_len));
      }
      if s.contains('-') {
        errors.push(format!(
          "ID6 must contain exactly one '-' separator, got {}",
          normalized.matches('-').count()
        ));
      } else {
        let suffix_len = s.chars().count();
        if suffix_len != 1 {
          errors.push(format!("ID6 form suffix must have exactly 1 character, got {}", suffix_len));
        }
      }
    }
    None => {
      let len = body.chars().count();
      if len != 5 {
        errors.push(format!("ID5 must have exactly 5 characters, got {}", len));
      }
    }
  }

  // Alphabet checks on whatever characters are present, by position. The
  // level position is checked against the closed six-code set whenever the
  // body is long enough to contain it.
  for (idx, c) in body.chars().take(5).enumerate() {
    match BODY_FIELDS[idx] {
      Dimension::Level => {
        if Level::from_code(c).is_none() {
          errors.push(format!("level character '{}' must be one of N, H, V, C, T, M", c));
        }
      }
      dim => {
        if !is_field_char(c) {
          errors.push(format!(
            "{} character '{}' must be a digit or an uppercase letter",
            dim.key(),
            c
          ));
        }
      }
    }
  }
  if let Some(s) = &suffix {
    if s.chars().count() == 1 && !s.contains('-') {
      if let Some(c) = s.chars().next() {
        if !is_field_char(c) {
          errors.push(format!("form character '{}' must be a digit or an uppercase letter", c));
        }
      }
    }
  }

  ValidationReport { is_valid: errors.is_empty(), errors }
}

/// Build an identifier string from components. Output always satisfies
/// `validate(output).is_valid`.
pub fn generate(parts: &IdComponents) -> Result<String, CodecError> {
  let missing: Vec<String> = BODY_FIELDS
    .iter()
    .filter(|dim| parts.get(**dim).is_none())
    .map(|dim| dim.key().to_string())
    .collect();
  if !missing.is_empty() {
    return Err(CodecError::MissingComponent { fields: missing });
  }

  let mut checked: Vec<(Dimension, char)> = Vec::with_capacity(6);
  for dim in Dimension::ALL {
    let Some(value) = parts.get(dim) else { continue };
    let mut chars = value.chars();
    let (first, rest) = (chars.next(), chars.next());
    let c = match (first, rest) {
      (Some(c), None) => c,
      _ => {
        return Err(CodecError::InvalidComponentLength {
          field: dim.key(),
          value: value.clone(),
        })
      }
    };
    let in_alphabet = match dim {
      Dimension::Level => Level::from_code(c).is_some(),
      _ => is_field_char(c),
    };
    if !in_alphabet {
      return Err(CodecError::InvalidComponentAlphabet { field: dim.key(), value: c });
    }
    checked.push((dim, c));
  }

  let mut out = String::with_capacity(7);
  for (dim, c) in &checked {
    if *dim == Dimension::Form {
      out.push('-');
    }
    out.push(*c);
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn components(form: Option<&str>) -> IdComponents {
    IdComponents {
      grade: Some("0".into()),
      subject: Some("P".into()),
      chapter: Some("1".into()),
      level: Some("N".into()),
      lesson: Some("1".into()),
      form: form.map(|s| s.to_string()),
    }
  }

  #[test]
  fn parse_bracketed_id6() {
    let id = parse("[0P1N1-1]").unwrap();
    assert_eq!(id.format, IdFormat::Id6);
    assert_eq!(id.normalized, "0P1N1-1");
    assert_eq!(id.grade, Some('0'));
    assert_eq!(id.subject, Some('P'));
    assert_eq!(id.chapter, Some('1'));
    assert_eq!(id.level, Some('N'));
    assert_eq!(id.lesson, Some('1'));
    assert_eq!(id.form, Some('1'));
  }

  #[test]
  fn parse_id5_with_trailing_percent() {
    let id = parse("0P1N1%").unwrap();
    assert_eq!(id.format, IdFormat::Id5);
    assert_eq!(id.normalized, "0P1N1");
    assert_eq!(id.form, None);
  }

  #[test]
  fn parse_is_permissive_about_alphabet() {
    // 'x' is outside the field alphabet but parse still decomposes it.
    let id = parse("0x1Z9").unwrap();
    assert_eq!(id.subject, Some('x'));
    assert!(!validate("0x1Z9").is_valid);
  }

  #[test]
  fn parse_rejects_wrong_lengths() {
    assert_eq!(
      parse("0P1"),
      Err(CodecError::MalformedLength { segment: "ID5", expected: 5, actual: 3 })
    );
    assert_eq!(
      parse("0P1N-1"),
      Err(CodecError::MalformedLength { segment: "ID6 body", expected: 5, actual: 4 })
    );
    assert_eq!(
      parse("0P1N1-12"),
      Err(CodecError::MalformedLength { segment: "ID6 form suffix", expected: 1, actual: 2 })
    );
  }

  #[test]
  fn parse_rejects_more_than_one_separator() {
    assert_eq!(
      parse("0P1N1-1-2"),
      Err(CodecError::MalformedLength { segment: "ID6 separator", expected: 1, actual: 2 })
    );
    // A trailing second dash must not pass as a one-character suffix.
    assert_eq!(
      parse("0P1N1--"),
      Err(CodecError::MalformedLength { segment: "ID6 separator", expected: 1, actual: 2 })
    );
  }

  #[test]
  fn validate_reports_short_id5() {
    let report = validate("0P1");
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["ID5 must have exactly 5 characters, got 3".to_string()]);
  }

  #[test]
  fn validate_accumulates_every_problem() {
    // Bad subject char AND bad level char in one pass.
    let report = validate("0p1X1");
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].contains("subject"));
    assert!(report.errors[1].contains("level"));
  }

  #[test]
  fn validate_rejects_more_than_one_separator() {
    for s in ["0P1N1--", "0P1N1-1-2"] {
      let report = validate(s);
      assert!(!report.is_valid);
      assert!(report
        .errors
        .iter()
        .any(|e| e.contains("exactly one '-' separator")));
    }
  }

  #[test]
  fn validate_checks_level_even_when_suffix_is_broken() {
    let report = validate("0P1X1-12");
    assert!(report.errors.iter().any(|e| e.contains("form suffix")));
    assert!(report.errors.iter().any(|e| e.contains("level")));
  }

  #[test]
  fn validate_never_panics_on_odd_input() {
    for s in ["", "   ", "[]%", "-----", "ĐỀ123", "0P1N1-"] {
      let report = validate(s);
      assert_eq!(report.is_valid, report.errors.is_empty());
    }
  }

  #[test]
  fn validate_accepts_both_formats() {
    assert!(validate("0P1N1").is_valid);
    assert!(validate("[0P1N1-1]%").is_valid);
    assert!(validate("9ZZMZ-Z").is_valid);
  }

  #[test]
  fn generate_id5_and_id6() {
    assert_eq!(generate(&components(None)).unwrap(), "0P1N1");
    assert_eq!(generate(&components(Some("1"))).unwrap(), "0P1N1-1");
  }

  #[test]
  fn generate_output_round_trips() {
    let with_form = components(Some("2"));
    let id = parse(&generate(&with_form).unwrap()).unwrap();
    assert_eq!(id.format, IdFormat::Id6);
    assert_eq!(id.grade, Some('0'));
    assert_eq!(id.form, Some('2'));
    assert!(validate(&generate(&with_form).unwrap()).is_valid);

    let without_form = components(None);
    let id = parse(&generate(&without_form).unwrap()).unwrap();
    assert_eq!(id.format, IdFormat::Id5);
    assert_eq!(id.form, None);
  }

  #[test]
  fn generate_names_every_missing_component() {
    let parts = IdComponents { chapter: Some("1".into()), ..Default::default() };
    match generate(&parts) {
      Err(CodecError::MissingComponent { fields }) => {
        assert_eq!(fields, vec!["grade", "subject", "level", "lesson"]);
      }
      other => panic!("expected MissingComponent, got {:?}", other),
    }
  }

  #[test]
  fn generate_rejects_multi_character_component() {
    let mut parts = components(None);
    parts.lesson = Some("12".into());
    assert_eq!(
      generate(&parts),
      Err(CodecError::InvalidComponentLength { field: "lesson", value: "12".into() })
    );
  }

  #[test]
  fn generate_rejects_level_outside_canonical_codes() {
    let mut parts = components(None);
    parts.level = Some("X".into());
    assert_eq!(
      generate(&parts),
      Err(CodecError::InvalidComponentAlphabet { field: "level", value: 'X' })
    );
  }

  #[test]
  fn generate_rejects_lowercase_field() {
    let parts = components(Some("a"));
    assert_eq!(
      generate(&parts),
      Err(CodecError::InvalidComponentAlphabet { field: "form", value: 'a' })
    );
  }
}
