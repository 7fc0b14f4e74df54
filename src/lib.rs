//! Scraping and serving of the Wembley Stadium events listing.
//!
//! The library splits into a scrape side (fetch, extract, normalize,
//! store, glued together by [`pipeline::ScrapePipeline`]) and a read side
//! ([`serve`], an Axum router over the same store). The two binaries in
//! this crate are thin wrappers over these modules.

pub mod cli;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod serve;
pub mod store;
