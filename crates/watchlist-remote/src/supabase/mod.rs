pub mod api;
pub mod auth;
pub mod client;
pub mod session;

pub use auth::AuthSession;
pub use client::SupabaseClient;
pub use session::SavedSession;
