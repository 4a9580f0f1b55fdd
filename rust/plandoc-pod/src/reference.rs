use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::PodError;

/// An IRI identifying a Document, Container or Subject in a Pod
///
/// A [Reference] to a Subject usually carries a fragment (`#me`) that picks
/// the Subject out of the Document it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// Create a new [Reference] from an IRI string
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The [Reference] of the Document that contains the resource, i.e. this
    /// IRI with its fragment removed
    pub fn document(&self) -> Reference {
        match self.0.split_once('#') {
            Some((document, _)) => Reference::new(document),
            None => self.clone(),
        }
    }

    /// The fragment of this IRI (without the leading `#`), if any
    pub fn fragment(&self) -> Option<&str> {
        self.0
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .filter(|fragment| !fragment.is_empty())
    }

    /// Resolve `relative` against this [Reference]
    ///
    /// Absolute IRIs are returned as-is (modulo normalization), so this can
    /// be used on input that may or may not already be absolute.
    pub fn join(&self, relative: &str) -> Result<Reference, PodError> {
        let base = Url::parse(&self.0).map_err(|error| PodError::InvalidReference {
            reference: self.0.clone(),
            reason: error.to_string(),
        })?;
        let joined = base
            .join(relative)
            .map_err(|error| PodError::InvalidReference {
                reference: relative.to_string(),
                reason: error.to_string(),
            })?;
        Ok(Reference(joined.into()))
    }

    /// Whether this [Reference] denotes a Container (its path ends in `/`)
    pub fn is_container(&self) -> bool {
        self.document().0.ends_with('/')
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Reference {
    fn from(iri: String) -> Self {
        Self(iri)
    }
}

impl From<&str> for Reference {
    fn from(iri: &str) -> Self {
        Self(iri.to_string())
    }
}

impl From<&Reference> for Reference {
    fn from(reference: &Reference) -> Self {
        reference.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_strips_the_fragment_to_find_the_document() {
        let reference = Reference::new("https://some.pod/profile.ttl#me");

        assert_eq!(reference.document().as_str(), "https://some.pod/profile.ttl");
        assert_eq!(reference.fragment(), Some("me"));
    }

    #[test]
    fn it_has_no_fragment_without_a_hash() {
        let reference = Reference::new("https://some.pod/profile.ttl");

        assert_eq!(reference.document(), reference);
        assert_eq!(reference.fragment(), None);
    }

    #[test]
    fn it_resolves_relative_references() {
        let document = Reference::new("https://some.pod/container/document.ttl");

        assert_eq!(
            document.join("#subject").unwrap().as_str(),
            "https://some.pod/container/document.ttl#subject"
        );
        assert_eq!(
            document.join("other.ttl#subject").unwrap().as_str(),
            "https://some.pod/container/other.ttl#subject"
        );
        assert_eq!(
            document
                .join("https://other.pod/document.ttl#subject")
                .unwrap()
                .as_str(),
            "https://other.pod/document.ttl#subject"
        );
    }

    #[test]
    fn it_rejects_a_base_that_is_not_an_iri() {
        let reference = Reference::new("not an iri");

        assert!(matches!(
            reference.join("#subject"),
            Err(PodError::InvalidReference { .. })
        ));
    }

    #[test]
    fn it_recognises_containers() {
        assert!(Reference::new("https://some.pod/container/").is_container());
        assert!(!Reference::new("https://some.pod/container/document.ttl").is_container());
    }
}
