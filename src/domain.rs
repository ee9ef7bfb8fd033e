//! Domain models for MapID identifiers: formats, taxonomy dimensions,
//! the closed difficulty-level alphabet, and the parsed identifier itself.

use serde::{Deserialize, Serialize};

/// Textual shape of an identifier.
/// ID5 is five characters; ID6 adds a `-` and a single form character.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
  Id5,
  Id6,
}

/// The six taxonomy dimensions, in the fixed order they appear inside an
/// identifier and inside a description.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Grade,
  Subject,
  Chapter,
  Level,
  Lesson,
  Form,
}

impl Dimension {
  pub const ALL: [Dimension; 6] = [
    Dimension::Grade,
    Dimension::Subject,
    Dimension::Chapter,
    Dimension::Level,
    Dimension::Lesson,
    Dimension::Form,
  ];

  /// Key used in the persisted taxonomy document and in API payloads.
  pub fn key(self) -> &'static str {
    match self {
      Dimension::Grade => "grade",
      Dimension::Subject => "subject",
      Dimension::Chapter => "chapter",
      Dimension::Level => "level",
      Dimension::Lesson => "lesson",
      Dimension::Form => "form",
    }
  }

  /// Display name used when rendering a description line.
  pub fn display(self) -> &'static str {
    match self {
      Dimension::Grade => "Lớp",
      Dimension::Subject => "Môn",
      Dimension::Chapter => "Chương",
      Dimension::Level => "Mức độ",
      Dimension::Lesson => "Bài",
      Dimension::Form => "Dạng",
    }
  }
}

/// Canonical difficulty tiers. This enumeration is structurally
/// authoritative: the taxonomy configuration supplies labels for these six
/// codes and can never introduce new ones.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Level {
  /// Nhận biết (recall)
  N,
  /// Thông Hiểu (comprehension)
  H,
  /// VD (application)
  V,
  /// VD Cao (higher application)
  C,
  /// VIP (expert)
  T,
  /// Note (special)
  M,
}

impl Level {
  pub const ALL: [Level; 6] = [Level::N, Level::H, Level::V, Level::C, Level::T, Level::M];

  pub fn code(self) -> char {
    match self {
      Level::N => 'N',
      Level::H => 'H',
      Level::V => 'V',
      Level::C => 'C',
      Level::T => 'T',
      Level::M => 'M',
    }
  }

  pub fn from_code(c: char) -> Option<Level> {
    match c {
      'N' => Some(Level::N),
      'H' => Some(Level::H),
      'V' => Some(Level::V),
      'C' => Some(Level::C),
      'T' => Some(Level::T),
      'M' => Some(Level::M),
      _ => None,
    }
  }
}

/// True for characters permitted in the grade/subject/chapter/lesson/form
/// fields: digits and uppercase ASCII letters (36 symbols).
pub fn is_field_char(c: char) -> bool {
  c.is_ascii_digit() || c.is_ascii_uppercase()
}

/// An identifier decomposed into its positional fields.
///
/// Produced by `codec::parse`, which is deliberately permissive: fields hold
/// whatever character sat at their position, alphabet membership is only
/// enforced by `codec::validate` / `codec::generate`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Identifier {
  /// Original input, possibly with enclosing brackets or a trailing `%`.
  pub raw: String,
  /// `raw` with `[`, `]`, `%` stripped and whitespace trimmed.
  pub normalized: String,
  pub format: IdFormat,
  pub grade: Option<char>,
  pub subject: Option<char>,
  pub chapter: Option<char>,
  pub level: Option<char>,
  pub lesson: Option<char>,
  pub form: Option<char>,
}

impl Identifier {
  /// Field at a given dimension, in identifier position order.
  pub fn field(&self, dim: Dimension) -> Option<char> {
    match dim {
      Dimension::Grade => self.grade,
      Dimension::Subject => self.subject,
      Dimension::Chapter => self.chapter,
      Dimension::Level => self.level,
      Dimension::Lesson => self.lesson,
      Dimension::Form => self.form,
    }
  }
}
