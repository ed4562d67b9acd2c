//! Errors - middleware の構築・書き込み時のエラー
//!
//! action 実行中の失敗はここではなく `action::ActionError` で表す。

use std::fmt;

use thiserror::Error;

/// 検証エラーがどの入力を指しているか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Service,
    /// dependencies 入力そのもの（文字列でも列でもない）
    Dependencies,
    /// dependencies の i 番目の要素
    Dependency(usize),
    Action,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("name"),
            Field::Service => f.write_str("service"),
            Field::Dependencies => f.write_str("dependencies"),
            Field::Dependency(index) => write!(f, "dependencies[{index}]"),
            Field::Action => f.write_str("action"),
        }
    }
}

/// MiddlewareError は構築時・書き込み時のエラー
///
/// # 分類
/// - InvalidArgumentCount: 位置引数が 4 つではない
/// - InvalidFieldType: 型が違う（文字列でない、callable でない）
/// - InvalidFieldLength: trim すると空になる
/// - ImmutabilityViolation: 構築済みの middleware への書き込み
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddlewareError {
    #[error("middleware created with wrong arguments count: expected {expected}, got {actual}")]
    InvalidArgumentCount { expected: usize, actual: usize },

    #[error("middleware.{field} set with wrong type")]
    InvalidFieldType { field: Field },

    #[error("middleware.{field} set with wrong length")]
    InvalidFieldLength { field: Field },

    #[error("middleware.{field} cannot be set after construction")]
    ImmutabilityViolation { field: Field },
}

impl MiddlewareError {
    /// エラーの対象フィールド（引数の数のエラーでは None）
    pub fn field(&self) -> Option<Field> {
        match self {
            MiddlewareError::InvalidArgumentCount { .. } => None,
            MiddlewareError::InvalidFieldType { field }
            | MiddlewareError::InvalidFieldLength { field }
            | MiddlewareError::ImmutabilityViolation { field } => Some(*field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = MiddlewareError::InvalidFieldType { field: Field::Name };
        assert_eq!(err.to_string(), "middleware.name set with wrong type");

        let err = MiddlewareError::InvalidFieldLength {
            field: Field::Dependency(2),
        };
        assert_eq!(err.to_string(), "middleware.dependencies[2] set with wrong length");
        assert_eq!(err.field(), Some(Field::Dependency(2)));
    }

    #[test]
    fn argument_count_has_no_field() {
        let err = MiddlewareError::InvalidArgumentCount {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.field(), None);
        assert!(err.to_string().contains("expected 4, got 3"));
    }
}
