//! The Solr platform facade

use crate::PlatformResult;
use serde::Serialize;
use solrdex_common::CorrelationId;
use solrdex_config::{ApplicationConfig, Validate};
use solrdex_document::{DocumentAccess, IndexDocument, IndexStatus, SearchRequest, SearchResult};
use solrdex_indexing::{IndexMaintenance, IndexMapper, IndexRouter, IndexRunner};
use solrdex_search::{Search, SearchService};
use solrdex_transport::{RawResponse, SearchTransport, SolrClient};
use std::sync::Arc;

const PLATFORM_ID: &str = "solr";
const PLATFORM_NAME: &str = "Solr";

/// Connection settings as shown to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformConfiguration {
    /// Servlet URL with any password masked
    pub servlet: String,
    pub core: String,
}

/// Full-text search platform backed by one Solr core
#[derive(Clone)]
pub struct SolrPlatform {
    config: ApplicationConfig,
    transport: Arc<dyn SearchTransport>,
    router: IndexRouter,
    search: Search,
    maintenance: IndexMaintenance,
}

impl SolrPlatform {
    /// Validate `config` and connect to the configured core
    ///
    /// # Errors
    /// - `ConfigurationInvalid` when a setting is missing or out of range
    /// - `Transport` when the HTTP client cannot be built
    pub fn load(config: ApplicationConfig) -> PlatformResult<Self> {
        config.validate()?;
        let client = SolrClient::from_config(&config.solr)?;
        tracing::info!(
            servlet = %config.solr.safe_servlet(),
            core = %config.solr.core,
            "Solr platform loaded"
        );
        Self::with_transport(config, Arc::new(client))
    }

    /// Platform using an already built transport
    ///
    /// # Errors
    /// Returns `ConfigurationInvalid` when a setting is missing or out of range
    pub fn with_transport(
        config: ApplicationConfig,
        transport: Arc<dyn SearchTransport>,
    ) -> PlatformResult<Self> {
        config.validate()?;
        let mapper = IndexMapper::from_config(Arc::clone(&transport), &config);
        Ok(Self {
            router: IndexRouter::new(mapper),
            search: Search::new(Arc::clone(&transport)),
            maintenance: IndexMaintenance::new(Arc::clone(&transport)),
            transport,
            config,
        })
    }

    /// Report per-document indexing events to `runner`
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn IndexRunner>) -> Self {
        self.router = self.router.with_runner(runner);
        self
    }

    pub const fn id(&self) -> &'static str {
        PLATFORM_ID
    }

    pub const fn name(&self) -> &'static str {
        PLATFORM_NAME
    }

    pub fn configuration(&self) -> PlatformConfiguration {
        PlatformConfiguration {
            servlet: self.config.solr.safe_servlet(),
            core: self.config.solr.core.clone(),
        }
    }

    /// Whether the core answers its health check
    ///
    /// # Errors
    /// Returns `Transport` when the engine cannot be reached
    pub async fn test(&self) -> PlatformResult<bool> {
        Ok(self.transport.ping().await?)
    }

    /// Index or remove one document according to its status
    pub async fn index_document(&self, document: &mut IndexDocument) -> IndexStatus {
        self.router.index_document(document).await
    }

    /// Remove `(provider, document)` pairs from the index
    ///
    /// # Errors
    /// Returns `Indexing` for the first pair that cannot be removed
    pub async fn delete_indexes(&self, indexes: &[(&str, &str)]) -> PlatformResult<usize> {
        Ok(self.router.delete_indexes(indexes).await?)
    }

    /// # Errors
    /// Returns `Search` when the query fails or its answer cannot be read
    pub async fn search(
        &self,
        request: &SearchRequest,
        access: &DocumentAccess,
    ) -> PlatformResult<SearchResult> {
        Ok(self
            .search
            .search(request, access, &CorrelationId::new())
            .await?)
    }

    /// # Errors
    /// Returns `Search` when the lookup fails or its answer cannot be read
    pub async fn get_document(
        &self,
        provider_id: &str,
        document_id: &str,
    ) -> PlatformResult<Option<IndexDocument>> {
        Ok(self
            .search
            .get_document(provider_id, document_id, &CorrelationId::new())
            .await?)
    }

    /// Drop the documents of one provider, or all of them for `"all"`
    ///
    /// # Errors
    /// Returns `Indexing` when the engine rejects the delete
    pub async fn reset_index(&self, provider_id: &str) -> PlatformResult<RawResponse> {
        Ok(self.maintenance.reset_index(provider_id).await?)
    }

    /// # Errors
    /// Returns `Indexing` when the engine rejects the command
    pub async fn optimize(&self) -> PlatformResult<RawResponse> {
        Ok(self.maintenance.optimize().await?)
    }
}
