use futures::stream;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use strand_core::{Action, ActionError, Middleware, MiddlewareDescriptor, MiddlewareOverrides};

/// パイプライン定義（本来はオーケストレーターが読み込む）
const PIPELINE: &str = r#"
[
  { "name": "session", "service": "gateway" },
  { "name": "auth", "service": "gateway", "dependencies": "session" },
  { "name": "audit", "service": "gateway", "dependencies": ["session", "auth"] }
]
"#;

#[derive(Debug, Deserialize)]
struct GreetArgs {
    user: String,
}

fn action_for(name: &str) -> Action {
    match name {
        // async: 引数をそのまま session id にする
        "session" => Action::from_async(|args: Vec<Value>| async move {
            let user = args.first().cloned().unwrap_or(Value::Null);
            Ok(json!({ "session": format!("sess-{}", user.as_str().unwrap_or("anonymous")) }))
        }),
        // sync: JSON を decode して検査する
        "auth" => Action::from_sync(|args| {
            let arg = args.into_iter().next().unwrap_or(Value::Null);
            let greet: GreetArgs = serde_json::from_value(arg)?;
            if greet.user.is_empty() {
                return Err(ActionError::new("auth: empty user"));
            }
            Ok(json!({ "user": greet.user, "authorized": true }))
        }),
        // stream: 受け取った引数を 1 件ずつ記録する
        _ => Action::from_stream(|args: Vec<Value>| {
            stream::iter(args.into_iter().map(|arg| Ok(json!({ "audited": arg }))))
        }),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) 定義から middleware を組み立てる
    let descriptors: Vec<MiddlewareDescriptor> = serde_json::from_str(PIPELINE)?;
    let mut pipeline = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let action = action_for(&descriptor.name);
        pipeline.push(Middleware::from_descriptor(descriptor, action)?);
    }

    // (B) 宣言順に呼ぶ（依存の解決はオーケストレーターの仕事なのでここではしない）
    for mw in &pipeline {
        let result = match mw.name() {
            "session" => mw.call(["strand"]).await,
            "auth" => mw.apply(json!({ "user": "strand" })).await,
            _ => mw.call([json!("login"), json!("fetch")]).await,
        };
        match result {
            Ok(value) => info!(
                middleware = mw.name(),
                dependencies = ?mw.dependencies(),
                %value,
                "middleware finished"
            ),
            Err(error) => info!(middleware = mw.name(), %error, "middleware failed"),
        }
    }

    // (C) clone_with: 別サービス向けに差し替える。元の middleware は変わらない
    let Some(auth) = pipeline.iter().find(|mw| mw.name() == "auth") else {
        return Ok(());
    };
    let admin = auth.clone_with(MiddlewareOverrides::new().with_service("admin"))?;
    info!(original = auth.service(), cloned = admin.service(), "cloned middleware");

    // 失敗はそのまま返ってくる
    if let Err(error) = admin.apply(json!({ "user": "" })).await {
        info!(middleware = admin.name(), %error, "expected failure");
    }

    // 構築後の書き込みは拒否される
    if let Err(error) = admin.set_name("renamed") {
        info!(%error, "write refused");
    }

    Ok(())
}
