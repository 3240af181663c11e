//! Composite document identifiers
//!
//! The engine sees one flat id per document: `<provider>!<document>`. The
//! provider id never contains the tie, so splitting on the first tie is
//! lossless even when the document id itself carries `!` characters.

use crate::{DocumentError, DocumentResult};

/// Separator between provider id and document id
pub const DOCUMENT_ID_TIE: char = '!';

/// Join a provider id and a document id into the engine identifier
///
/// No escaping is applied. Use [`try_encode_identifier`] when the provider
/// id is not known to be tie-free.
pub fn encode_identifier(provider_id: &str, document_id: &str) -> String {
    format!("{provider_id}{DOCUMENT_ID_TIE}{document_id}")
}

/// Like [`encode_identifier`], but refuses provider ids that would not decode back
///
/// # Errors
/// Returns `DocumentError::MalformedIdentifier` when `provider_id` contains the tie
pub fn try_encode_identifier(provider_id: &str, document_id: &str) -> DocumentResult<String> {
    if provider_id.contains(DOCUMENT_ID_TIE) {
        return Err(DocumentError::malformed(
            encode_identifier(provider_id, document_id),
            format!("provider id '{provider_id}' contains '{DOCUMENT_ID_TIE}'"),
        ));
    }
    Ok(encode_identifier(provider_id, document_id))
}

/// Split an engine identifier into `(provider_id, document_id)` at the first tie
///
/// # Errors
/// Returns `DocumentError::MalformedIdentifier` when the identifier has no tie
pub fn decode_identifier(identifier: &str) -> DocumentResult<(String, String)> {
    identifier
        .split_once(DOCUMENT_ID_TIE)
        .map(|(provider, document)| (provider.to_string(), document.to_string()))
        .ok_or_else(|| DocumentError::malformed(identifier, "missing provider separator"))
}
