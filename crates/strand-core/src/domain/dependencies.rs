//! Dependencies - 依存する middleware 名の入力
//!
//! 単一の文字列でも列でも受け付け、内部では常に列として持つ。
//! 順序は保持し、重複もそのまま残す（解決はオーケストレーター側の仕事）。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependencies {
    One(String),
    Many(Vec<String>),
}

impl Dependencies {
    pub fn none() -> Self {
        Dependencies::Many(Vec::new())
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Dependencies::One(name) => vec![name],
            Dependencies::Many(names) => names,
        }
    }

    /// No content at all: an empty list, or a single empty string.
    ///
    /// Whitespace-only names are not empty here; validation rejects them.
    pub fn is_empty(&self) -> bool {
        match self {
            Dependencies::One(name) => name.is_empty(),
            Dependencies::Many(names) => names.is_empty(),
        }
    }
}

impl Default for Dependencies {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Dependencies {
    fn from(name: &str) -> Self {
        Dependencies::One(name.to_string())
    }
}

impl From<String> for Dependencies {
    fn from(name: String) -> Self {
        Dependencies::One(name)
    }
}

impl From<Vec<String>> for Dependencies {
    fn from(names: Vec<String>) -> Self {
        Dependencies::Many(names)
    }
}

impl From<Vec<&str>> for Dependencies {
    fn from(names: Vec<&str>) -> Self {
        Dependencies::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Dependencies {
    fn from(names: &[&str]) -> Self {
        Dependencies::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<&[String]> for Dependencies {
    fn from(names: &[String]) -> Self {
        Dependencies::Many(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Dependencies {
    fn from(names: [&str; N]) -> Self {
        Dependencies::Many(names.iter().map(|n| n.to_string()).collect())
    }
}
