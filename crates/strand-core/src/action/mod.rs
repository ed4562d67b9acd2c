//! Action - middleware が実行する処理
//!
//! 呼び出し側は自然な書き方で処理を登録できる（async / 同期 / Stream）。
//! 登録時に一度だけ正規化され、以降は常に `DynAction` として呼ばれるので、
//! オーケストレーター側は action の形を分岐する必要がない。
//!
//! # 受け付ける形
//! - `Action::Async`  : `DynAction` そのもの。正規化せずに保持
//! - `Action::Sync`   : `Fn(Vec<Value>) -> ActionResult`
//! - `Action::Stream` : `Fn(Vec<Value>) -> Stream<Item = ActionResult>`。全ステップを配列に集める

pub mod error;
pub mod handler;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::stream::{BoxStream, Stream, StreamExt};
use serde_json::Value;

pub use self::error::ActionError;
pub use self::handler::{
    ActionFuture, ActionResult, BoxedAction, DynAction, StreamCallable, SyncCallable,
};

use self::handler::{AsyncFn, StreamAction, SyncAction};

/// Action は middleware が受け付ける callable の形
///
/// どの形で渡しても、構築時に `BoxedAction` へ正規化される。
pub enum Action {
    Async(BoxedAction),
    Sync(SyncCallable),
    Stream(StreamCallable),
}

/// `Action` がどの形で渡されたか（ログ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionShape {
    Async,
    Sync,
    Stream,
}

impl fmt::Display for ActionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionShape::Async => "async",
            ActionShape::Sync => "sync",
            ActionShape::Stream => "stream",
        };
        f.write_str(s)
    }
}

impl Action {
    /// Future を返すクロージャから作る
    ///
    /// # 使用例
    /// ```ignore
    /// let action = Action::from_async(|args: Vec<Value>| async move {
    ///     Ok(json!(format!("abc{}", args[0].as_str().unwrap_or_default())))
    /// });
    /// ```
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Action::Async(Arc::new(AsyncFn(f)))
    }

    /// すでに `DynAction` を実装している型から作る
    pub fn from_dyn<A: DynAction + 'static>(action: A) -> Self {
        Action::Async(Arc::new(action))
    }

    /// 同期関数から作る。`Err` は失敗した result になる
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> ActionResult + Send + Sync + 'static,
    {
        Action::Sync(Arc::new(f))
    }

    /// 値をステップごとに返す callable から作る（generator 相当）
    pub fn from_stream<F, S>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> S + Send + Sync + 'static,
        S: Stream<Item = ActionResult> + Send + 'static,
    {
        Action::Stream(Arc::new(move |args: Vec<Value>| -> BoxStream<'static, ActionResult> {
            f(args).boxed()
        }))
    }

    pub fn shape(&self) -> ActionShape {
        match self {
            Action::Async(_) => ActionShape::Async,
            Action::Sync(_) => ActionShape::Sync,
            Action::Stream(_) => ActionShape::Stream,
        }
    }

    /// middleware が保持する形に正規化する
    ///
    /// `Async` は包まずにそのまま返すので、同じ `Arc` が戻ってくる。
    pub fn normalize(self) -> BoxedAction {
        match self {
            Action::Async(action) => action,
            Action::Sync(f) => Arc::new(SyncAction(f)),
            Action::Stream(f) => Arc::new(StreamAction(f)),
        }
    }
}

impl From<BoxedAction> for Action {
    fn from(action: BoxedAction) -> Self {
        Action::Async(action)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.shape()).finish()
    }
}
