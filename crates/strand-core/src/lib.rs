//! strand-core
//!
//! Core building blocks for Strand: named, validated units of asynchronous
//! work ("middleware") that an orchestrator composes into pipelines.
//!
//! # モジュール構成
//! - **domain**: `Middleware` とその入力（Dependencies, Input, MiddlewareDescriptor, MiddlewareOverrides, errors）
//! - **action**: action の形（Async / Sync / Stream）と正規化（DynAction, BoxedAction, ActionError）
//!
//! 依存関係の解決・実行順序・パイプライン合成はここでは扱わない。
//! middleware は依存先を名前で宣言するだけで、解決は外側のオーケストレーターが行う。

pub mod action;
pub mod domain;

pub use action::{
    Action, ActionError, ActionFuture, ActionResult, ActionShape, BoxedAction, DynAction,
};
pub use domain::{
    ARITY, Dependencies, Field, Input, Middleware, MiddlewareDescriptor, MiddlewareError,
    MiddlewareOverrides,
};
