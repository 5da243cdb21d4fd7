pub mod caller;
pub mod error;
pub mod routes;
pub mod server_config;

pub use caller::{Caller, CALLER_IDENTITY_HEADER};
pub use error::ServerError;
pub use routes::{router, AppState};
pub use server_config::{ServerConfig, StorageConfig};
