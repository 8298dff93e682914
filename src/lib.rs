// VisitStore - In-memory museum visit tracking with filter/sort/search queries

pub mod error;
pub mod model;
pub mod query;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use error::StoreError;
pub use model::{SeedVisit, VisitTask, now_ms};
pub use query::{QueryParams, SortKey, StatusFilter};
pub use store::VisitStore;
