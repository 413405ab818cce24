use devmate_agent::{AgentConfig, ChatModel, OpenAiChatModel, ProgramAgent};
use devmate_ws::{AgentPool, AgentRegistry, AppState, SessionConfig, create_router};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认最大缓存 30 个 program agent
const DEFAULT_POOL_SIZE: usize = 30;

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devmate_ws=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = env::var("DEVMATE_ADDR").unwrap_or_else(|_| "0.0.0.0:8008".to_string());
    let prompts_dir =
        PathBuf::from(env::var("PROMPTS_DIR").unwrap_or_else(|_| "agent/prompts".to_string()));
    let pool_size = env::var("AGENT_POOL_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POOL_SIZE);

    let config = AgentConfig::from_env(&prompts_dir).expect("Failed to load agent configuration");
    let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(&config));

    // The search tool client is wired in by deployments that run the
    // external search server; without one, agents answer directly.
    let pool = AgentPool::new(
        pool_size,
        Box::new(move || Ok(ProgramAgent::new(config.clone(), chat.clone(), None))),
    );

    let registry = Arc::new(AgentRegistry::new().with_pool("program", pool));

    let state = AppState {
        registry,
        session_config: SessionConfig::default(),
    };
    let app = create_router(state);

    info!("Starting DevMate server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server error");
}
