pub mod traits;
pub mod supabase;
pub mod youtube;
pub mod openrouter;
pub mod error;

pub use error::RemoteError;
pub use openrouter::OpenRouterRater;
pub use supabase::{SavedSession, SupabaseClient};
pub use traits::{NullRater, RemoteRepository, SessionProvider, TitleMoodRater, VideoMetadataProvider};
pub use youtube::YoutubeMetadata;
