//! Search results, hit navigation, and the URLs that describe them.

pub mod filters;
pub mod hits;
pub mod links;
pub mod models;
pub mod reducer;

pub use filters::{FileRequest, Filters, TEST_FILE_REGEX};
pub use hits::{hits, Hit, Hits};
pub use links::{path_anchor, LinkTarget, Route};
pub use models::{File, FileHeader, FileResult, Line, LineMatch, ResultState, SearchResult};
pub use reducer::{reduce, State, StoreAction};
