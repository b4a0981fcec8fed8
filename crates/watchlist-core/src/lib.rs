pub mod error;
pub mod query;
pub mod recommend;
pub mod store;
pub mod sync;

pub use error::{RecommendError, StoreError};
pub use query::{SearchFilter, SortOption};
pub use recommend::{Recommendation, RecommendationEngine, TimeContext};
pub use store::WatchlistStore;
pub use sync::{SyncCoordinator, SyncReport, SyncState};
