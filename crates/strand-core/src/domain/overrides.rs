//! MiddlewareOverrides - `Middleware::clone_with` に渡す上書き値
//!
//! # 上書きの判定
//! `Some` でも「空」の値は指定なしと同じ扱いになり、元の値が使われる:
//! - name / service: 空文字列 `""`
//! - dependencies: 空の列、または空文字列ひとつ
//!
//! 空白だけの文字列（`"  "`）は空ではないので通常どおり検証され、失敗する。

use super::dependencies::Dependencies;
use crate::action::Action;

#[derive(Debug, Default)]
pub struct MiddlewareOverrides {
    pub name: Option<String>,
    pub service: Option<String>,
    pub dependencies: Option<Dependencies>,
    pub action: Option<Action>,
}

impl MiddlewareOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_dependencies(mut self, dependencies: impl Into<Dependencies>) -> Self {
        self.dependencies = Some(dependencies.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub(crate) fn take_name(&mut self) -> Option<String> {
        self.name.take().filter(|name| !name.is_empty())
    }

    pub(crate) fn take_service(&mut self) -> Option<String> {
        self.service.take().filter(|service| !service.is_empty())
    }

    pub(crate) fn take_dependencies(&mut self) -> Option<Dependencies> {
        self.dependencies.take().filter(|deps| !deps.is_empty())
    }

    pub(crate) fn take_action(&mut self) -> Option<Action> {
        self.action.take()
    }
}
