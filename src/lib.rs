// Public modules for testing
pub mod config;
pub mod document;
pub mod error;
pub mod files;
pub mod formatter;
pub mod matcher;
pub mod search;
pub mod server;
pub mod templates;

// Re-export main types
pub use error::{AppError, SearchError};
pub use matcher::find_in_text;
pub use search::{SearchEngine, SearchRequest, SearchResponse, SearchSettings};
