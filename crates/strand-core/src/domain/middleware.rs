//! Middleware - 名前付き・検証済みの非同期処理の単位
//!
//! # 学習ポイント
//! - 構築時に全フィールドを検証する（Fail-fast、中途半端なインスタンスは作らない）
//! - 構築後は不変。フィールドは private で、`set_*` は常にエラーを返す
//! - `clone_with` は元のインスタンスを変更せず、同じ検証経路で新しいインスタンスを作る
//!
//! # 使用例
//! ```ignore
//! let mw = Middleware::init("auth", "gateway", ["session"], Action::from_async(|args| async move {
//!     Ok(json!(format!("abc{}", args[0].as_str().unwrap_or_default())))
//! }))?;
//!
//! assert_eq!(mw.apply("z").await?, json!("abcz"));
//! ```

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, trace};

use super::dependencies::Dependencies;
use super::descriptor::MiddlewareDescriptor;
use super::errors::{Field, MiddlewareError};
use super::input::Input;
use super::overrides::MiddlewareOverrides;
use crate::action::{Action, ActionError, ActionFuture, BoxedAction};

/// middleware を組み立てる位置引数の数
pub const ARITY: usize = 4;

/// Middleware は検証済み・不変の非同期処理の単位
///
/// 構築後に中身が変わることはなく、`dependencies()` はコピーを返すので、
/// 複数の task から読み取り専用で共有できる。
#[derive(Clone)]
pub struct Middleware {
    name: String,
    service: String,
    dependencies: Vec<String>,
    action: BoxedAction,
}

impl Middleware {
    /// Validate the four inputs and build a middleware.
    ///
    /// Fields are checked in order (name, service, dependencies, action) and
    /// the first failure is returned.
    pub fn new(
        name: impl Into<String>,
        service: impl Into<String>,
        dependencies: impl Into<Dependencies>,
        action: impl Into<Action>,
    ) -> Result<Self, MiddlewareError> {
        let (name, service, dependencies) =
            validate_fields(name.into(), service.into(), dependencies.into())
                .inspect_err(log_rejection)?;
        Ok(Self::assemble(name, service, dependencies, action.into()))
    }

    /// 推奨の factory。検証済みの middleware を `Arc` で返す
    pub fn init(
        name: impl Into<String>,
        service: impl Into<String>,
        dependencies: impl Into<Dependencies>,
        action: impl Into<Action>,
    ) -> Result<Arc<Self>, MiddlewareError> {
        Self::new(name, service, dependencies, action).map(Arc::new)
    }

    /// Build from untyped positional inputs.
    ///
    /// Exactly [`ARITY`] inputs are required. name / service must be strings,
    /// dependencies a string or a list of strings, and the last input an
    /// [`Action`].
    pub fn from_inputs(inputs: Vec<Input>) -> Result<Self, MiddlewareError> {
        let (name, service, dependencies, action) =
            decode_inputs(inputs).inspect_err(log_rejection)?;
        Ok(Self::assemble(name, service, dependencies, action))
    }

    /// 定義（descriptor）と action から組み立てる
    pub fn from_descriptor(
        descriptor: MiddlewareDescriptor,
        action: impl Into<Action>,
    ) -> Result<Self, MiddlewareError> {
        let MiddlewareDescriptor {
            name,
            service,
            dependencies,
        } = descriptor;
        Self::new(name, service, dependencies, action)
    }

    fn assemble(name: String, service: String, dependencies: Vec<String>, action: Action) -> Self {
        let shape = action.shape();
        let action = action.normalize();
        debug!(
            middleware = %name,
            service = %service,
            dependencies = ?dependencies,
            %shape,
            "middleware created"
        );
        Self {
            name,
            service,
            dependencies,
            action,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// 毎回新しいコピーを返す。変更しても middleware 側には影響しない
    pub fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    /// The normalized action.
    pub fn action(&self) -> &BoxedAction {
        &self.action
    }

    pub fn descriptor(&self) -> MiddlewareDescriptor {
        MiddlewareDescriptor {
            name: self.name.clone(),
            service: self.service.clone(),
            dependencies: Dependencies::Many(self.dependencies()),
        }
    }

    // ── Field writes ─────────────────────────────────────────────────────────
    //
    // The value is validated like construction would, then the write is
    // refused: a constructed middleware never changes.

    pub fn set_name(&self, name: impl Into<String>) -> Result<(), MiddlewareError> {
        validate_text(Field::Name, name.into())?;
        Err(self.refuse_write(Field::Name))
    }

    pub fn set_service(&self, service: impl Into<String>) -> Result<(), MiddlewareError> {
        validate_text(Field::Service, service.into())?;
        Err(self.refuse_write(Field::Service))
    }

    pub fn set_dependencies(
        &self,
        dependencies: impl Into<Dependencies>,
    ) -> Result<(), MiddlewareError> {
        validate_dependencies(dependencies.into())?;
        Err(self.refuse_write(Field::Dependencies))
    }

    pub fn set_action(&self, _action: impl Into<Action>) -> Result<(), MiddlewareError> {
        Err(self.refuse_write(Field::Action))
    }

    fn refuse_write(&self, field: Field) -> MiddlewareError {
        debug!(middleware = %self.name, %field, "write to constructed middleware refused");
        MiddlewareError::ImmutabilityViolation { field }
    }

    // ── Invocation ───────────────────────────────────────────────────────────

    /// Invoke with an argument list.
    ///
    /// A JSON array is spread into positional arguments; any other value is
    /// passed as the only argument.
    pub fn apply(&self, args: impl Into<Value>) -> ActionFuture {
        let args = match args.into() {
            Value::Array(items) => items,
            single => vec![single],
        };
        self.dispatch(args)
    }

    /// 渡された引数をそのまま位置引数として呼ぶ（配列も展開しない）
    pub fn call<I>(&self, args: I) -> ActionFuture
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.dispatch(args.into_iter().map(Into::into).collect())
    }

    fn dispatch(&self, args: Vec<Value>) -> ActionFuture {
        trace!(
            middleware = %self.name,
            service = %self.service,
            arity = args.len(),
            "invoking middleware action"
        );
        let action = Arc::clone(&self.action);
        let name = self.name.clone();
        async move {
            // panic も shape によらず失敗した result として返す
            AssertUnwindSafe(action.invoke(args))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(ActionError::from_panic(payload)))
                .inspect_err(|error| debug!(middleware = %name, %error, "middleware action failed"))
        }
        .boxed()
    }

    // ── Copy ─────────────────────────────────────────────────────────────────

    /// A new middleware taking each field from `overrides` when given, else
    /// from `self`. The result goes through the same validation as `new`.
    ///
    /// Empty overrides (`""`, an empty dependency list) fall back to the
    /// source value; see [`MiddlewareOverrides`].
    pub fn clone_with(&self, mut overrides: MiddlewareOverrides) -> Result<Self, MiddlewareError> {
        let name = overrides.take_name().unwrap_or_else(|| self.name.clone());
        let service = overrides
            .take_service()
            .unwrap_or_else(|| self.service.clone());
        let dependencies = overrides
            .take_dependencies()
            .unwrap_or_else(|| Dependencies::Many(self.dependencies()));
        let action = overrides
            .take_action()
            .unwrap_or_else(|| Action::Async(Arc::clone(&self.action)));

        Self::new(name, service, dependencies, action)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("name", &self.name)
            .field("service", &self.service)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

fn log_rejection(error: &MiddlewareError) {
    debug!(%error, "middleware construction rejected");
}

fn validate_fields(
    name: String,
    service: String,
    dependencies: Dependencies,
) -> Result<(String, String, Vec<String>), MiddlewareError> {
    let name = validate_text(Field::Name, name)?;
    let service = validate_text(Field::Service, service)?;
    let dependencies = validate_dependencies(dependencies)?;
    Ok((name, service, dependencies))
}

fn decode_inputs(
    inputs: Vec<Input>,
) -> Result<(String, String, Vec<String>, Action), MiddlewareError> {
    let actual = inputs.len();
    let [name, service, dependencies, action]: [Input; ARITY] =
        inputs
            .try_into()
            .map_err(|_| MiddlewareError::InvalidArgumentCount {
                expected: ARITY,
                actual,
            })?;

    let name = text_input(Field::Name, name)?;
    let service = text_input(Field::Service, service)?;
    let dependencies = dependencies_input(dependencies)?;
    let action = match action {
        Input::Action(action) => action,
        other => {
            trace!(kind = other.kind(), "non-callable action input");
            return Err(MiddlewareError::InvalidFieldType {
                field: Field::Action,
            });
        }
    };
    Ok((name, service, dependencies, action))
}

fn validate_text(field: Field, value: String) -> Result<String, MiddlewareError> {
    if value.trim().is_empty() {
        return Err(MiddlewareError::InvalidFieldLength { field });
    }
    Ok(value)
}

fn validate_dependencies(dependencies: Dependencies) -> Result<Vec<String>, MiddlewareError> {
    dependencies
        .into_vec()
        .into_iter()
        .enumerate()
        .map(|(index, name)| validate_text(Field::Dependency(index), name))
        .collect()
}

fn text_input(field: Field, input: Input) -> Result<String, MiddlewareError> {
    match input {
        Input::Value(Value::String(s)) => validate_text(field, s),
        other => {
            trace!(%field, kind = other.kind(), "non-string input");
            Err(MiddlewareError::InvalidFieldType { field })
        }
    }
}

fn dependencies_input(input: Input) -> Result<Vec<String>, MiddlewareError> {
    match input {
        Input::Value(Value::String(name)) => validate_dependencies(Dependencies::One(name)),
        Input::Value(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(name) => validate_text(Field::Dependency(index), name),
                _ => Err(MiddlewareError::InvalidFieldType {
                    field: Field::Dependency(index),
                }),
            })
            .collect(),
        other => {
            trace!(kind = other.kind(), "dependencies neither string nor list");
            Err(MiddlewareError::InvalidFieldType {
                field: Field::Dependencies,
            })
        }
    }
}
