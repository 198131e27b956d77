pub mod config;
pub mod http_authenticator;
pub mod mock_authenticator;
pub mod paths;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::http_authenticator::HttpAuthenticator;
pub use crate::mock_authenticator::MockAuthenticator;
pub use crate::paths::BrigadePaths;
pub use crate::storage::{FileSessionStorage, MemorySessionStorage};
