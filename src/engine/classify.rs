//! Content-type classification
//!
//! Which rules apply to a file is decided by its content tags. Classification
//! is a collaborator of the engine: callers can plug in their own
//! [`ContentClassifier`]; [`ExtensionClassifier`] is the default, built on the
//! file type definitions of the `ignore` crate (the ones ripgrep uses).

use crate::types::ContentType;
use ignore::types::{Types, TypesBuilder};
use std::path::Path;
use std::sync::Arc;

/// Maps a file path to the content tags used to select rules
pub trait ContentClassifier: Send + Sync {
    /// Tags for the file at `path`, most specific first
    fn classify(&self, path: &Path) -> Vec<ContentType>;
}

/// Content tags and the `ignore` file type each one is detected with
const KNOWN_TYPES: &[(&str, &str)] = &[
    ("python", "py"),
    ("rst", "rst"),
    ("typescript", "ts"),
    ("javascript", "js"),
    ("rust", "rust"),
    ("go", "go"),
    ("markdown", "markdown"),
    ("yaml", "yaml"),
    ("toml", "toml"),
    ("json", "json"),
    ("shell", "sh"),
];

/// Classifies files by extension and always adds the `text` tag
#[derive(Clone)]
pub struct ExtensionClassifier {
    matchers: Arc<Vec<(ContentType, Types)>>,
}

impl ExtensionClassifier {
    /// Creates a classifier for all known content types.
    ///
    /// If building a matcher for a type fails, that type is logged and skipped.
    pub fn new() -> Self {
        let mut matchers = Vec::new();

        for &(tag, type_name) in KNOWN_TYPES {
            let Some(content_type) = ContentType::new(tag) else {
                continue;
            };

            let mut builder = TypesBuilder::new();
            builder.add_defaults();
            builder.select(type_name);

            match builder.build() {
                Ok(types) => matchers.push((content_type, types)),
                Err(e) => {
                    tracing::warn!(
                        content_type = tag,
                        error = %e,
                        "failed to build content type matcher"
                    );
                }
            }
        }

        Self {
            matchers: Arc::new(matchers),
        }
    }

    /// The most specific tag for a path, if its extension is known
    pub fn detect(&self, path: &Path) -> Option<ContentType> {
        self.matchers
            .iter()
            .find(|(_, types)| types.matched(path, false).is_whitelist())
            .map(|(content_type, _)| content_type.clone())
    }
}

impl ContentClassifier for ExtensionClassifier {
    fn classify(&self, path: &Path) -> Vec<ContentType> {
        let mut tags: Vec<ContentType> = self.detect(path).into_iter().collect();
        tags.push(ContentType::text());
        tags
    }
}

impl Default for ExtensionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtensionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionClassifier")
            .field(
                "types",
                &self.matchers.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
