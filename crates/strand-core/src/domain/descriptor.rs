//! MiddlewareDescriptor - middleware のシリアライズ可能な部分
//!
//! action 以外（name / service / dependencies）をデータとして保持する。
//! パイプライン定義を JSON などで持ちたいオーケストレーター向け。

use serde::{Deserialize, Serialize};

use super::dependencies::Dependencies;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareDescriptor {
    pub name: String,
    pub service: String,

    /// A single name or a list; missing means none.
    #[serde(default)]
    pub dependencies: Dependencies,
}

impl MiddlewareDescriptor {
    pub fn new(name: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            dependencies: Dependencies::none(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: impl Into<Dependencies>) -> Self {
        self.dependencies = dependencies.into();
        self
    }
}
