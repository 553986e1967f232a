//! Suno link resolution for PromptSD submissions.

pub mod error;
pub mod fetcher;
pub mod patterns;
pub mod resolver;

pub use error::SunoError;
pub use fetcher::{FetchedPage, HttpPageFetcher, PageFetcher};
pub use patterns::{LinkShape, SunoPatterns};
pub use resolver::SunoResolver;
