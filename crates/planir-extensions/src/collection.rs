//! URI-keyed set of loaded extension documents

use crate::{ExtensionDocument, ExtensionError, Result};
use indexmap::IndexMap;
use planir_types::TypeClass;
use std::io;

/// Merged, in-memory view of loaded extension documents, keyed by the
/// URI they were loaded under.
///
/// Loading a second document under a new URI merges additively. Loading
/// the same URI twice is an error; callers that want idempotent merging
/// check [`ExtensionCollection::contains`] first (dialect localization
/// does). The collection is read-only once handed to a registry.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCollection {
    documents: IndexMap<String, ExtensionDocument>,
}

impl ExtensionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document from already-opened content under `uri`.
    ///
    /// All-or-nothing: on error the collection is unchanged.
    pub fn load(&mut self, uri: impl Into<String>, reader: impl io::Read) -> Result<()> {
        let uri = uri.into();
        let document: ExtensionDocument =
            serde_yaml::from_reader(reader).map_err(|source| ExtensionError::Document {
                uri: uri.clone(),
                source,
            })?;
        self.insert(uri, document)
    }

    /// Loads a document from a string slice under `uri`.
    pub fn load_str(&mut self, uri: impl Into<String>, content: &str) -> Result<()> {
        let uri = uri.into();
        let document: ExtensionDocument =
            serde_yaml::from_str(content).map_err(|source| ExtensionError::Document {
                uri: uri.clone(),
                source,
            })?;
        self.insert(uri, document)
    }

    fn insert(&mut self, uri: String, document: ExtensionDocument) -> Result<()> {
        if self.documents.contains_key(&uri) {
            return Err(ExtensionError::DuplicateUri(uri));
        }
        for declaration in &document.types {
            if TypeClass::from_name(&declaration.name).is_some() {
                return Err(ExtensionError::ShadowsBuiltin {
                    uri,
                    name: declaration.name.clone(),
                });
            }
            if !declaration.structure.is_empty() && !declaration.parameters.is_empty() {
                return Err(ExtensionError::AmbiguousDeclaration {
                    uri,
                    name: declaration.name.clone(),
                });
            }
            let already_defined = self
                .documents
                .values()
                .flat_map(|doc| &doc.types)
                .any(|existing| existing.name == declaration.name);
            if already_defined {
                return Err(ExtensionError::DuplicateType {
                    uri,
                    name: declaration.name.clone(),
                });
            }
        }
        log::debug!(
            "loaded extension document `{uri}`: {} type(s), {} scalar, {} aggregate function(s)",
            document.types.len(),
            document.scalar_functions.len(),
            document.aggregate_functions.len()
        );
        self.documents.insert(uri, document);
        Ok(())
    }

    /// Whether a document is loaded under `uri`.
    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    /// The document loaded under `uri`, if any.
    pub fn document(&self, uri: &str) -> Option<&ExtensionDocument> {
        self.documents.get(uri)
    }

    /// Iterates documents in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionDocument)> {
        self.documents.iter().map(|(uri, doc)| (uri.as_str(), doc))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\ntypes:\n  - name: point\n    structure:\n      latitude: i32\n      longitude: i32\n";

    #[test]
    fn loading_same_uri_twice_is_an_error() {
        let mut collection = ExtensionCollection::new();
        collection.load_str("http://localhost/sample.yaml", SAMPLE).unwrap();
        let err = collection
            .load_str("http://localhost/sample.yaml", SAMPLE)
            .unwrap_err();
        assert!(matches!(err, ExtensionError::DuplicateUri(_)));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn shadowing_a_builtin_fails_at_load_time() {
        let mut collection = ExtensionCollection::new();
        let err = collection
            .load_str(
                "http://localhost/bad.yaml",
                "---\ntypes:\n  - name: i32\n    structure:\n      x: i64\n",
            )
            .unwrap_err();
        assert!(matches!(err, ExtensionError::ShadowsBuiltin { .. }));
        assert!(collection.is_empty());
    }

    #[test]
    fn malformed_documents_leave_the_collection_unchanged() {
        let mut collection = ExtensionCollection::new();
        assert!(collection
            .load_str("http://localhost/bad.yaml", "types: [not, a, type, list]")
            .is_err());
        assert!(collection.is_empty());
    }
}
