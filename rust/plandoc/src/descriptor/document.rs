use std::fmt::Debug;
use std::sync::Arc;

use plandoc_pod::{Pod, Reference};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Handle, VirtualContainer, VirtualSubject, read_plain};
use crate::{AclSettings, ConfiguresAcl, Memo, ResolveError};

/// How to get to a Document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", bound = "")]
pub enum DocumentDescriptor<P: Pod> {
    /// The Document at a known location
    FoundAt {
        /// Where the Document lives
        reference: Reference,
    },
    /// The Access Control List of another Document
    IsAclFor {
        /// The Document whose Access Control List this is
        document: VirtualDocument<P>,
    },
    /// The Document referred to by a Subject
    FoundOn {
        /// The Subject that refers to the Document
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds the Document's location
        predicate: Reference,
    },
    /// The Document referred to by a Subject, created in
    /// `fallback_container` (and linked from the Subject) if the Subject
    /// does not refer to one yet
    EnsuredOn {
        /// The Subject that refers to the Document
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds the Document's location
        predicate: Reference,
        /// Where to create the Document if it does not exist yet
        #[serde(rename = "fallbackContainer")]
        fallback_container: VirtualContainer<P>,
        /// Access to grant on the Document when it is created
        #[serde(default)]
        acl: AclSettings,
    },
}

impl<P: Pod> DocumentDescriptor<P> {
    const TAGS: [&'static str; 4] = ["FoundAt", "IsAclFor", "FoundOn", "EnsuredOn"];

    /// The name of this variant, as used in its plain form
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FoundAt { .. } => "FoundAt",
            Self::IsAclFor { .. } => "IsAclFor",
            Self::FoundOn { .. } => "FoundOn",
            Self::EnsuredOn { .. } => "EnsuredOn",
        }
    }
}

/// A description of a Document, to be resolved by a
/// [Resolver](crate::Resolver)
pub struct VirtualDocument<P: Pod> {
    handle: Arc<Handle<DocumentDescriptor<P>, Option<P::Document>>>,
}

impl<P: Pod> VirtualDocument<P> {
    /// Wrap `descriptor` in a new handle
    pub fn new(descriptor: DocumentDescriptor<P>) -> Self {
        Self {
            handle: Handle::new(descriptor),
        }
    }

    /// Describe the Document at `reference`
    pub fn found_at(reference: impl Into<Reference>) -> Self {
        Self::new(DocumentDescriptor::FoundAt {
            reference: reference.into(),
        })
    }

    /// Describe the Access Control List of `document`
    pub fn is_acl_for(document: &VirtualDocument<P>) -> Self {
        Self::new(DocumentDescriptor::IsAclFor {
            document: document.clone(),
        })
    }

    /// Describe the Document that `subject` refers to via `predicate`
    pub fn found_on(subject: &VirtualSubject<P>, predicate: impl Into<Reference>) -> Self {
        Self::new(DocumentDescriptor::FoundOn {
            subject: subject.clone(),
            predicate: predicate.into(),
        })
    }

    /// Describe the Document that `subject` should refer to via
    /// `predicate`
    ///
    /// If `subject` does not refer to a Document yet, a new one is created in
    /// `fallback_container` and linked from `subject`.
    pub fn ensured_on(
        subject: &VirtualSubject<P>,
        predicate: impl Into<Reference>,
        fallback_container: &VirtualContainer<P>,
    ) -> Self {
        Self::new(DocumentDescriptor::EnsuredOn {
            subject: subject.clone(),
            predicate: predicate.into(),
            fallback_container: fallback_container.clone(),
            acl: AclSettings::default(),
        })
    }

    /// Read a [VirtualDocument] from the plain form produced by
    /// [serialise](crate::serialise)
    pub fn from_plain(value: serde_json::Value) -> Result<Self, ResolveError> {
        read_plain("Document", &DocumentDescriptor::<P>::TAGS, value).map(Self::new)
    }

    /// The descriptor of this handle
    pub fn descriptor(&self) -> &DocumentDescriptor<P> {
        &self.handle.descriptor
    }

    /// Whether `other` is a clone of this handle (and so shares its memoized
    /// resolution)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }

    pub(crate) fn memo(&self) -> &Memo<Option<P::Document>> {
        &self.handle.memo
    }

    #[cfg(test)]
    pub(crate) fn strong_count(&self) -> usize {
        Arc::strong_count(&self.handle)
    }
}

impl<P: Pod> ConfiguresAcl for VirtualDocument<P> {
    fn with_acl(&self, configure: impl FnOnce(AclSettings) -> AclSettings) -> Self {
        match self.descriptor() {
            DocumentDescriptor::EnsuredOn {
                subject,
                predicate,
                fallback_container,
                acl,
            } => Self::new(DocumentDescriptor::EnsuredOn {
                subject: subject.clone(),
                predicate: predicate.clone(),
                fallback_container: fallback_container.clone(),
                acl: configure(acl.clone()),
            }),
            descriptor => {
                tracing::warn!(
                    variant = descriptor.tag(),
                    "Access settings only apply to Documents that may be created; ignoring them"
                );
                Self::new(descriptor.clone())
            }
        }
    }
}

impl<P: Pod> Clone for VirtualDocument<P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<P: Pod> Debug for VirtualDocument<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VirtualDocument")
            .field(self.descriptor())
            .finish()
    }
}

impl<P: Pod> Serialize for VirtualDocument<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.descriptor().serialize(serializer)
    }
}

impl<'de, P: Pod> Deserialize<'de> for VirtualDocument<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        DocumentDescriptor::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use plandoc_pod::MemoryPod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    type Document = VirtualDocument<MemoryPod>;

    #[test]
    fn it_gives_every_built_handle_its_own_memo() {
        let first = Document::found_at("https://some.pod/document.ttl");
        let second = Document::found_at("https://some.pod/document.ttl");

        assert!(!first.ptr_eq(&second));
        assert!(first.ptr_eq(&first.clone()));
    }

    #[test]
    fn it_adds_acl_settings_on_a_new_handle() {
        let subject = VirtualSubject::found_at("https://some.pod/profile.ttl#me");
        let container = VirtualContainer::found_at("https://some.pod/container/");
        let document = Document::ensured_on(&subject, "https://vocab.example/notes", &container);

        let readable = document.is_readable_by_everyone();

        let DocumentDescriptor::EnsuredOn { acl, .. } = document.descriptor() else {
            panic!("Expected an EnsuredOn descriptor");
        };
        assert!(!acl.has_acl_settings());

        let DocumentDescriptor::EnsuredOn { acl, .. } = readable.descriptor() else {
            panic!("Expected an EnsuredOn descriptor");
        };
        assert_eq!(acl, &AclSettings::default().readable_by_everyone());
        assert!(!readable.ptr_eq(&document));
    }

    #[test]
    fn it_ignores_acl_settings_on_documents_that_are_never_created() {
        let document = Document::found_at("https://some.pod/document.ttl");

        let configured = document.is_writable_by_everyone();

        assert!(matches!(
            configured.descriptor(),
            DocumentDescriptor::FoundAt { .. }
        ));
    }

    #[test]
    fn it_reads_its_plain_form() {
        let document = Document::from_plain(json!({
            "type": "IsAclFor",
            "document": { "type": "FoundAt", "reference": "https://some.pod/document.ttl" }
        }))
        .unwrap();

        let DocumentDescriptor::IsAclFor { document } = document.descriptor() else {
            panic!("Expected an IsAclFor descriptor");
        };
        assert!(matches!(
            document.descriptor(),
            DocumentDescriptor::FoundAt { reference } if reference.as_str() == "https://some.pod/document.ttl"
        ));
    }

    #[test]
    fn it_rejects_unknown_descriptor_types() {
        let error = Document::from_plain(json!({ "type": "bogus" })).unwrap_err();

        assert_eq!(
            error.to_string(),
            "This type of Virtual Document can not be processed yet."
        );
    }
}
