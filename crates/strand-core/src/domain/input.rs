//! Input - 型の決まっていない位置引数
//!
//! JSON などの動的なデータから middleware を組み立てるための入口。
//! `Middleware::from_inputs` が件数と各値の型をここで検査する。

use serde_json::Value;

use crate::action::Action;

#[derive(Debug)]
pub enum Input {
    Value(Value),
    Action(Action),
}

impl Input {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Input::Value(Value::Null) => "null",
            Input::Value(Value::Bool(_)) => "bool",
            Input::Value(Value::Number(_)) => "number",
            Input::Value(Value::String(_)) => "string",
            Input::Value(Value::Array(_)) => "array",
            Input::Value(Value::Object(_)) => "object",
            Input::Action(_) => "action",
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<Action> for Input {
    fn from(action: Action) -> Self {
        Input::Action(action)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Value(Value::String(s))
    }
}
