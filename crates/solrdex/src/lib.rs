//! Solr platform for full-text search
//!
//! Ties configuration, the HTTP transport, the indexing router and the
//! search service together behind one [`SolrPlatform`] facade, the surface
//! a host application drives.

pub mod error;
pub mod platform;

pub use error::{PlatformError, PlatformResult};
pub use platform::{PlatformConfiguration, SolrPlatform};
