pub mod error;
pub mod message;
pub mod pool;
pub mod registry;
pub mod server;
pub mod session;

pub use error::{Result, WsError};
pub use message::{ChatAction, ChatRequest};
pub use pool::{AgentPool, PoolStatus};
pub use registry::AgentRegistry;
pub use server::{AppState, create_router};
pub use session::SessionConfig;
