pub mod accumulator;
pub mod filter;

pub use accumulator::{FeedAccumulator, FeedStatus, FetchCursor};
pub use filter::{filter, CriteriaSet, LocationMode};
