//! The indexable document and its access context

use crate::{IndexState, IndexStatus};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Whether a document holds content or only groups other documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    File,
    /// Containers are never sent to content extraction
    Directory,
}

/// How [`IndexDocument::content`] is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    #[default]
    Plain,
    Base64,
}

/// Who may see a document
///
/// `viewer_id` is only set on documents returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentAccess {
    pub owner_id: String,
    pub users: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    pub circles: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub viewer_id: Option<String>,
}

impl DocumentAccess {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    /// Access carrying only the id of the user who ran a search
    pub fn for_viewer(viewer_id: impl Into<String>) -> Self {
        Self {
            viewer_id: Some(viewer_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.users.insert(user.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: impl Into<String>) -> Self {
        self.circles.insert(circle.into());
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.links.insert(link.into());
        self
    }
}

/// A document as handed over by a content provider
///
/// The caller owns it. Indexing only ever writes [`IndexDocument::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexDocument {
    pub provider_id: String,
    pub id: String,
    pub title: String,
    pub content: String,
    pub content_encoding: ContentEncoding,
    pub kind: DocumentKind,
    /// Local copy of the content; preferred over `content` when set
    pub local_path: Option<PathBuf>,
    pub tags: BTreeSet<String>,
    pub sub_tags: BTreeMap<String, BTreeSet<String>>,
    pub meta_tags: BTreeSet<String>,
    pub access: Option<DocumentAccess>,
    pub hash: String,
    pub source: String,
    /// Relevance in percent, set on search results
    pub score: Option<i64>,
    pub excerpts: Vec<String>,
    pub index: IndexState,
}

impl IndexDocument {
    pub fn new(provider_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>, encoding: ContentEncoding) -> Self {
        self.content = content.into();
        self.content_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: DocumentAccess) -> Self {
        self.access = Some(access);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn with_sub_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.sub_tags
            .entry(key.into())
            .or_default()
            .insert(value.into());
        self
    }

    #[must_use]
    pub fn with_meta_tag(mut self, tag: impl Into<String>) -> Self {
        self.meta_tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: IndexStatus) -> Self {
        self.index.status = status;
        self
    }

    /// True for directories and other containers
    pub fn is_container(&self) -> bool {
        self.kind == DocumentKind::Directory
    }
}

/// Absolute path of a file inside a locally mounted storage
///
/// Trailing separators of `mount_root` are ignored so both `/data/` and
/// `/data` yield `/data/<internal_path>`.
pub fn resolve_local_path(mount_root: &Path, internal_path: &str) -> PathBuf {
    let root = mount_root.to_string_lossy();
    let trimmed = root.trim_end_matches(['/', '\\']);
    let base = if trimmed.is_empty() && !root.is_empty() {
        PathBuf::from(std::path::MAIN_SEPARATOR_STR)
    } else {
        PathBuf::from(trimmed)
    };
    base.join(internal_path.trim_start_matches(['/', '\\']))
}
