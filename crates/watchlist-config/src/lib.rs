pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{default_openrouter_model, Config, OpenRouterConfig, SupabaseConfig, YoutubeConfig};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
