//! Product acquisition sources.
//!
//! [`AmazonSource`] renders a live search-results page and extracts one
//! record per result card; [`FakeStoreSource`] is the fixed catalog used
//! when the live page yields nothing.

pub mod amazon;
pub mod fakestore;

pub use amazon::AmazonSource;
pub use fakestore::FakeStoreSource;
