//! DynAction - 正規化された action の共通インターフェース
//!
//! # 学習ポイント
//! - Object-safe trait (`DynAction`) + `Arc<dyn DynAction>` による型消去
//! - 同期関数 / Stream を返す関数を async な呼び出し規約に包む newtype
//!
//! ```text
//! Action::Sync(f)    ── SyncAction(f)   ──┐
//! Action::Stream(f)  ── StreamAction(f) ──┼─> Arc<dyn DynAction>
//! Action::Async(a)   ─────────────────────┘   (a はそのまま保持)
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, TryStreamExt};
use serde_json::Value;

use super::error::ActionError;

/// What every action eventually resolves to.
pub type ActionResult = Result<Value, ActionError>;

/// A pending action result, detached from the middleware that produced it.
pub type ActionFuture = BoxFuture<'static, ActionResult>;

/// The single calling convention every stored action presents.
///
/// `args` are the positional arguments, in order.
///
/// # 使用例
/// ```ignore
/// struct Concat;
///
/// #[async_trait]
/// impl DynAction for Concat {
///     async fn invoke(&self, args: Vec<Value>) -> ActionResult {
///         Ok(Value::String(format!("abc{}", args[0].as_str().unwrap_or_default())))
///     }
/// }
/// ```
#[async_trait]
pub trait DynAction: Send + Sync {
    async fn invoke(&self, args: Vec<Value>) -> ActionResult;
}

/// A type-erased action shared between a middleware and its clones.
pub type BoxedAction = Arc<dyn DynAction>;

pub type SyncCallable = Arc<dyn Fn(Vec<Value>) -> ActionResult + Send + Sync>;

pub type StreamCallable =
    Arc<dyn Fn(Vec<Value>) -> BoxStream<'static, ActionResult> + Send + Sync>;

/// Future を返すクロージャ
pub(crate) struct AsyncFn<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> DynAction for AsyncFn<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    async fn invoke(&self, args: Vec<Value>) -> ActionResult {
        (self.0)(args).await
    }
}

/// 同期関数。戻り値をそのまま eventual result として返す
pub(crate) struct SyncAction(pub(crate) SyncCallable);

#[async_trait]
impl DynAction for SyncAction {
    async fn invoke(&self, args: Vec<Value>) -> ActionResult {
        (self.0)(args)
    }
}

/// ステップごとに値を返す callable。順に全て集めて `Value::Array` にする。
/// 途中のステップが失敗したら、呼び出し全体が失敗する。
pub(crate) struct StreamAction(pub(crate) StreamCallable);

#[async_trait]
impl DynAction for StreamAction {
    async fn invoke(&self, args: Vec<Value>) -> ActionResult {
        let steps: Vec<Value> = (self.0)(args).try_collect().await?;
        Ok(Value::Array(steps))
    }
}
