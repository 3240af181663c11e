//! Document to engine request mapping
//!
//! New documents go through the engine's content extraction: the file is
//! uploaded and its extracted text lands in the text field, while the
//! document's identity, tags and access lists travel as literal fields.
//!
//! Content comes from one of two places:
//! - the document's `local_path`, when file storage could resolve one (used
//!   as is and never deleted);
//! - otherwise the document's own content, decoded into a temporary file
//!   that lives exactly as long as the extraction call.

use crate::{IndexerError, IndexerResult};
use base64ct::{Base64, Encoding};
use solrdex_common::CorrelationId;
use solrdex_config::ApplicationConfig;
use solrdex_document::{
    ContentEncoding, FIELD_ID, FIELD_TEXT, FIELD_TITLE, IndexDocument, NAMESPACE_PREFIX,
    is_free_attribute_key, namespaced_field, try_encode_identifier,
};
use solrdex_transport::{CommitPolicy, ExtractRequest, RawResponse, SearchTransport, UpdateRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

const DEFAULT_FILESYSTEM_PROVIDER: &str = "files";
const EXTRACTED_CONTENT_FIELD: &str = "content";
const TEMP_NAME_PART_LIMIT: usize = 40;

/// File handed to the extractor for one call
enum ContentFile {
    Local(PathBuf),
    /// Deleted when dropped
    Temporary(NamedTempFile),
}

impl ContentFile {
    fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Temporary(file) => file.path(),
        }
    }
}

/// Keep temp file names portable whatever the ids contain
fn file_name_part(raw: &str) -> String {
    raw.chars()
        .take(TEMP_NAME_PART_LIMIT)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds and executes engine requests for single documents
#[derive(Clone)]
pub struct IndexMapper {
    transport: Arc<dyn SearchTransport>,
    supported_providers: Vec<String>,
    commit: CommitPolicy,
    temp_dir: Option<PathBuf>,
}

impl IndexMapper {
    /// Mapper accepting the filesystem provider and committing immediately
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            supported_providers: vec![DEFAULT_FILESYSTEM_PROVIDER.to_string()],
            commit: CommitPolicy::Immediate,
            temp_dir: None,
        }
    }

    /// Mapper set up from application configuration
    pub fn from_config(transport: Arc<dyn SearchTransport>, config: &ApplicationConfig) -> Self {
        Self {
            transport,
            supported_providers: config.indexing.supported_providers.clone(),
            commit: CommitPolicy::from_delay_seconds(config.solr.commit_within_seconds),
            temp_dir: config.indexing.temp_dir.as_ref().map(PathBuf::from),
        }
    }

    #[must_use]
    pub fn with_supported_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_providers = providers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_commit_policy(mut self, commit: CommitPolicy) -> Self {
        self.commit = commit;
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub const fn commit_policy(&self) -> CommitPolicy {
        self.commit
    }

    /// Whether documents of this provider can go through extraction
    pub fn supports_provider(&self, provider_id: &str) -> bool {
        self.supported_providers.iter().any(|p| p == provider_id)
    }

    /// Extraction request for `document` with its content staged at `file`
    ///
    /// # Errors
    /// - `AccessContextMissing` when the document has no access context
    /// - `MalformedIdentifier` when the provider id contains the id tie
    /// - `InvalidSubTag` when a subtag key is reserved or not a field name
    pub fn build_extract_request(
        &self,
        document: &IndexDocument,
        file: &Path,
    ) -> IndexerResult<ExtractRequest> {
        let access = document
            .access
            .as_ref()
            .ok_or_else(|| IndexerError::AccessContextMissing {
                id: document.id.clone(),
            })?;

        if let Some(key) = document
            .sub_tags
            .keys()
            .find(|key| !is_free_attribute_key(key))
        {
            return Err(IndexerError::InvalidSubTag {
                id: document.id.clone(),
                key: key.clone(),
            });
        }

        let mut request = ExtractRequest::new(file, self.commit);
        request.add_field(
            FIELD_ID,
            try_encode_identifier(&document.provider_id, &document.id)?,
        );
        if !document.title.is_empty() {
            request.add_field(FIELD_TITLE, document.title.clone());
            request.resource_name = Some(document.title.clone());
        }
        request.add_field(namespaced_field("provider"), document.provider_id.clone());

        request.add_field_values(namespaced_field("tags"), document.tags.iter().cloned());
        for (key, values) in &document.sub_tags {
            request.add_field_values(namespaced_field(key), values.iter().cloned());
        }
        request.add_field_values(namespaced_field("metatags"), document.meta_tags.iter().cloned());

        if !access.owner_id.is_empty() {
            request.add_field(namespaced_field("owner"), access.owner_id.clone());
        }
        request.add_field_values(namespaced_field("users"), access.users.iter().cloned());
        request.add_field_values(namespaced_field("groups"), access.groups.iter().cloned());
        request.add_field_values(namespaced_field("circles"), access.circles.iter().cloned());
        request.add_field_values(namespaced_field("links"), access.links.iter().cloned());

        request
            .field_mappings
            .insert(EXTRACTED_CONTENT_FIELD.to_string(), FIELD_TEXT.to_string());
        request.unknown_field_prefix = Some(NAMESPACE_PREFIX.to_string());

        Ok(request)
    }

    fn check_indexable(&self, document: &IndexDocument) -> IndexerResult<()> {
        if document.is_container() {
            return Err(IndexerError::NotIndexableDocument {
                id: document.id.clone(),
            });
        }
        if !self.supports_provider(&document.provider_id) {
            return Err(IndexerError::ProviderNotCompatible {
                provider_id: document.provider_id.clone(),
            });
        }
        if document.access.is_none() {
            return Err(IndexerError::AccessContextMissing {
                id: document.id.clone(),
            });
        }
        Ok(())
    }

    fn decode_content(document: &IndexDocument) -> IndexerResult<Vec<u8>> {
        match document.content_encoding {
            ContentEncoding::Plain => Ok(document.content.as_bytes().to_vec()),
            ContentEncoding::Base64 => {
                let compact: String = document.content.split_whitespace().collect();
                Base64::decode_vec(&compact).map_err(|e| IndexerError::ContentDecoding {
                    id: document.id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn stage_content(&self, document: &IndexDocument) -> IndexerResult<ContentFile> {
        if let Some(path) = &document.local_path {
            tracing::debug!(path = %path.display(), "Using local file for extraction");
            return Ok(ContentFile::Local(path.clone()));
        }

        let bytes = Self::decode_content(document)?;

        let prefix = format!(
            "solrdex-{}-{}-",
            file_name_part(&document.provider_id),
            file_name_part(&document.id)
        );
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| IndexerError::io("Failed to create temporary file", e))?;

        tokio::fs::write(file.path(), &bytes)
            .await
            .map_err(|e| IndexerError::io("Failed to write temporary file", e))?;

        tracing::debug!(
            path = %file.path().display(),
            bytes = bytes.len(),
            "Staged document content in temporary file"
        );
        Ok(ContentFile::Temporary(file))
    }

    /// Send a new (or changed) document through content extraction
    ///
    /// # Errors
    /// - `NotIndexableDocument` for containers
    /// - `ProviderNotCompatible` for providers without extractable content
    /// - `AccessContextMissing` when the document has no access context
    /// - `InvalidSubTag` when a subtag key is reserved or not a field name
    /// - `ContentDecoding` / `Io` when content cannot be staged
    /// - `DataExtractionFailed` when the engine rejects the request
    #[tracing::instrument(skip(self, document), fields(provider = %document.provider_id, id = %document.id))]
    pub async fn index_document_new(
        &self,
        document: &IndexDocument,
        correlation_id: &CorrelationId,
    ) -> IndexerResult<RawResponse> {
        self.check_indexable(document)?;

        // Must outlive the extract call
        let content = self.stage_content(document).await?;
        let request = self.build_extract_request(document, content.path())?;

        self.transport
            .extract(&request, correlation_id)
            .await
            .map_err(|source| IndexerError::DataExtractionFailed {
                title: document.title.clone(),
                code: source.code(),
                source,
            })
    }

    /// Delete a document from the index
    ///
    /// A document the engine reports as not found counts as deleted.
    ///
    /// # Errors
    /// - `MalformedIdentifier` when the provider id contains the id tie
    /// - `Transport` when the engine rejects the delete
    #[tracing::instrument(skip(self))]
    pub async fn index_document_remove(
        &self,
        provider_id: &str,
        document_id: &str,
        correlation_id: &CorrelationId,
    ) -> IndexerResult<RawResponse> {
        let id = try_encode_identifier(provider_id, document_id)?;

        match self
            .transport
            .update(&UpdateRequest::delete_by_id(id), correlation_id)
            .await
        {
            Ok(response) => Ok(response),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Document already absent from index");
                Ok(RawResponse::empty())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solrdex_document::{DocumentAccess, DocumentKind};
    use solrdex_transport::MockTransport;

    fn mapper() -> IndexMapper {
        IndexMapper::new(Arc::new(MockTransport::new()))
    }

    fn document() -> IndexDocument {
        IndexDocument::new("files", "42")
            .with_title("notes.txt")
            .with_access(
                DocumentAccess::new("alice")
                    .with_user("bob")
                    .with_group("admin"),
            )
    }

    #[test]
    fn test_file_name_part_replaces_separators() {
        assert_eq!(file_name_part("a/b c!d"), "a_b_c_d");
        assert_eq!(file_name_part(&"x".repeat(100)).len(), TEMP_NAME_PART_LIMIT);
    }

    #[test]
    fn test_request_carries_identity_and_access() {
        let request = mapper()
            .build_extract_request(&document(), Path::new("/tmp/notes"))
            .unwrap_or_else(|e| panic!("request should build: {e}"));

        assert_eq!(request.field("id"), ["files!42"]);
        assert_eq!(request.field("title"), ["notes.txt"]);
        assert_eq!(request.field("attr_owner"), ["alice"]);
        assert_eq!(request.field("attr_users"), ["bob"]);
        assert_eq!(request.field("attr_groups"), ["admin"]);
        assert!(request.field("attr_circles").is_empty());
        assert_eq!(
            request.field_mappings.get("content").map(String::as_str),
            Some("text")
        );
        assert_eq!(request.unknown_field_prefix.as_deref(), Some("attr_"));
    }

    #[test]
    fn test_sub_tags_use_namespaced_fields() {
        let document = document()
            .with_tag("work")
            .with_tag("q3")
            .with_sub_tag("author", "alice");

        let request = mapper()
            .build_extract_request(&document, Path::new("/tmp/notes"))
            .unwrap_or_else(|e| panic!("request should build: {e}"));

        assert_eq!(request.field("attr_author"), ["alice"]);
        assert_eq!(request.field("attr_tags"), ["q3", "work"]);
    }

    #[test]
    fn test_sub_tags_cannot_shadow_access_fields() {
        let document = document()
            .with_sub_tag("users", "mallory")
            .with_sub_tag("owner", "mallory");

        let result = mapper().build_extract_request(&document, Path::new("/tmp/notes"));
        assert!(matches!(
            result,
            Err(IndexerError::InvalidSubTag { ref key, .. }) if key == "owner"
        ));
    }

    #[test]
    fn test_sub_tag_key_must_be_a_field_name() {
        let document = document().with_sub_tag("a b", "x");

        let result = mapper().build_extract_request(&document, Path::new("/tmp/notes"));
        assert!(matches!(
            result,
            Err(IndexerError::InvalidSubTag { ref key, .. }) if key == "a b"
        ));
    }

    #[test]
    fn test_missing_access_is_rejected() {
        let mut document = document();
        document.access = None;

        let result = mapper().build_extract_request(&document, Path::new("/tmp/notes"));
        assert!(matches!(
            result,
            Err(IndexerError::AccessContextMissing { .. })
        ));
    }

    #[test]
    fn test_checks_run_in_order() {
        let mapper = mapper();

        let dir = document().with_kind(DocumentKind::Directory);
        assert!(matches!(
            mapper.check_indexable(&dir),
            Err(IndexerError::NotIndexableDocument { .. })
        ));

        let mut foreign = document();
        foreign.provider_id = "bookmarks".to_string();
        assert!(matches!(
            mapper.check_indexable(&foreign),
            Err(IndexerError::ProviderNotCompatible { .. })
        ));
    }

    #[test]
    fn test_commit_policy_follows_config() {
        let mut config = ApplicationConfig::default();
        config.solr.commit_within_seconds = 3;
        let mapper = IndexMapper::from_config(Arc::new(MockTransport::new()), &config);
        assert_eq!(mapper.commit_policy(), CommitPolicy::Within { millis: 3000 });

        config.solr.commit_within_seconds = 0;
        let mapper = IndexMapper::from_config(Arc::new(MockTransport::new()), &config);
        assert_eq!(mapper.commit_policy(), CommitPolicy::Immediate);
    }

    #[test]
    fn test_base64_content_is_decoded() {
        let document = document().with_content("aGVsbG8g\nd29ybGQ=", ContentEncoding::Base64);
        let bytes = IndexMapper::decode_content(&document).unwrap_or_default();
        assert_eq!(bytes, b"hello world");

        let broken = document.with_content("not base64!", ContentEncoding::Base64);
        assert!(matches!(
            IndexMapper::decode_content(&broken),
            Err(IndexerError::ContentDecoding { .. })
        ));
    }
}
