use std::fmt::Debug;
use std::sync::Arc;

use plandoc_pod::{Pod, Reference, SubjectOf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Handle, VirtualDocument, read_plain};
use crate::{Memo, ResolveError};

/// A property and the value it should have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefPair {
    /// The property
    pub predicate: Reference,
    /// The value
    pub object: Reference,
}

impl RefPair {
    /// Pair `predicate` with `object`
    pub fn new(predicate: impl Into<Reference>, object: impl Into<Reference>) -> Self {
        Self {
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// How to pick a Subject out of a Document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectLocator {
    /// The Subject that has every one of these property values
    WithRefs {
        /// Property values the Subject must all have
        references: Vec<RefPair>,
    },
    /// The Subject at a Reference relative to the Document
    AsRef {
        /// The Subject's Reference, relative to the Document's
        reference: String,
    },
}

/// How to get to a Subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", bound = "")]
pub enum SubjectDescriptor<P: Pod> {
    /// The Subject at a known location
    FoundAt {
        /// Where the Subject lives
        reference: Reference,
    },
    /// The Subject referred to by another Subject
    FoundOn {
        /// The Subject that refers to this one
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds this Subject's Reference
        predicate: Reference,
    },
    /// The Subject referred to by another Subject, created (and linked) if
    /// it is not referred to yet
    EnsuredOn {
        /// The Subject that refers to this one
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds this Subject's Reference
        predicate: Reference,
    },
    /// The one Subject in a Document that matches `locator`
    FoundIn {
        /// The Document to look in
        document: VirtualDocument<P>,
        /// How to pick the Subject
        locator: SubjectLocator,
    },
    /// A Subject in a Document that matches `locator`, created if there is
    /// none yet
    EnsuredIn {
        /// The Document to look in
        document: VirtualDocument<P>,
        /// How to pick (or create) the Subject
        locator: SubjectLocator,
    },
}

impl<P: Pod> SubjectDescriptor<P> {
    const TAGS: [&'static str; 5] = ["FoundAt", "FoundOn", "EnsuredOn", "FoundIn", "EnsuredIn"];

    /// The name of this variant, as used in its plain form
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FoundAt { .. } => "FoundAt",
            Self::FoundOn { .. } => "FoundOn",
            Self::EnsuredOn { .. } => "EnsuredOn",
            Self::FoundIn { .. } => "FoundIn",
            Self::EnsuredIn { .. } => "EnsuredIn",
        }
    }
}

/// A description of a Subject, to be resolved by a
/// [Resolver](crate::Resolver)
pub struct VirtualSubject<P: Pod> {
    handle: Arc<Handle<SubjectDescriptor<P>, Option<SubjectOf<P>>>>,
}

impl<P: Pod> VirtualSubject<P> {
    /// Wrap `descriptor` in a new handle
    pub fn new(descriptor: SubjectDescriptor<P>) -> Self {
        Self {
            handle: Handle::new(descriptor),
        }
    }

    /// Describe the Subject at `reference`
    pub fn found_at(reference: impl Into<Reference>) -> Self {
        Self::new(SubjectDescriptor::FoundAt {
            reference: reference.into(),
        })
    }

    /// Describe the Subject that `subject` refers to via `predicate`
    pub fn found_on(subject: &VirtualSubject<P>, predicate: impl Into<Reference>) -> Self {
        Self::new(SubjectDescriptor::FoundOn {
            subject: subject.clone(),
            predicate: predicate.into(),
        })
    }

    /// Describe the Subject that `subject` should refer to via `predicate`,
    /// adding a new one next to `subject` if there is none yet
    pub fn ensured_on(subject: &VirtualSubject<P>, predicate: impl Into<Reference>) -> Self {
        Self::new(SubjectDescriptor::EnsuredOn {
            subject: subject.clone(),
            predicate: predicate.into(),
        })
    }

    /// Start describing the one Subject in `document` that matches what is
    /// given next
    pub fn found_in(document: &VirtualDocument<P>) -> SubjectInDocument<P> {
        SubjectInDocument {
            document: document.clone(),
            ensure: false,
        }
    }

    /// Start describing a Subject in `document` that matches what is given
    /// next, to be created if it does not exist yet
    pub fn ensured_in(document: &VirtualDocument<P>) -> SubjectInDocument<P> {
        SubjectInDocument {
            document: document.clone(),
            ensure: true,
        }
    }

    /// A new handle that additionally requires the Subject to have `object`
    /// as a value for `predicate`
    ///
    /// Only Subjects located by their property values can be narrowed down;
    /// for any other descriptor, the returned handle is an unchanged copy.
    pub fn with_ref(&self, predicate: impl Into<Reference>, object: impl Into<Reference>) -> Self {
        let pair = RefPair::new(predicate, object);
        let descriptor = match self.descriptor() {
            SubjectDescriptor::FoundIn {
                document,
                locator: SubjectLocator::WithRefs { references },
            } => SubjectDescriptor::FoundIn {
                document: document.clone(),
                locator: SubjectLocator::WithRefs {
                    references: appended(references, pair),
                },
            },
            SubjectDescriptor::EnsuredIn {
                document,
                locator: SubjectLocator::WithRefs { references },
            } => SubjectDescriptor::EnsuredIn {
                document: document.clone(),
                locator: SubjectLocator::WithRefs {
                    references: appended(references, pair),
                },
            },
            descriptor => {
                tracing::warn!(
                    variant = descriptor.tag(),
                    "Only Subjects located by their properties can be narrowed down; ignoring {pair:?}"
                );
                descriptor.clone()
            }
        };
        Self::new(descriptor)
    }

    /// Read a [VirtualSubject] from the plain form produced by
    /// [serialise](crate::serialise)
    pub fn from_plain(value: serde_json::Value) -> Result<Self, ResolveError> {
        read_plain("Subject", &SubjectDescriptor::<P>::TAGS, value).map(Self::new)
    }

    /// The descriptor of this handle
    pub fn descriptor(&self) -> &SubjectDescriptor<P> {
        &self.handle.descriptor
    }

    /// Whether `other` is a clone of this handle
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }

    pub(crate) fn memo(&self) -> &Memo<Option<SubjectOf<P>>> {
        &self.handle.memo
    }

    #[cfg(test)]
    pub(crate) fn strong_count(&self) -> usize {
        Arc::strong_count(&self.handle)
    }
}

fn appended(references: &[RefPair], pair: RefPair) -> Vec<RefPair> {
    let mut references = references.to_vec();
    references.push(pair);
    references
}

/// A Subject in a Document, still waiting to be told how to pick it
pub struct SubjectInDocument<P: Pod> {
    document: VirtualDocument<P>,
    ensure: bool,
}

impl<P: Pod> SubjectInDocument<P> {
    /// Pick the Subject that has `object` as a value for `predicate`
    ///
    /// Further values can be required with [VirtualSubject::with_ref].
    pub fn with_ref(
        self,
        predicate: impl Into<Reference>,
        object: impl Into<Reference>,
    ) -> VirtualSubject<P> {
        self.locate(SubjectLocator::WithRefs {
            references: vec![RefPair::new(predicate, object)],
        })
    }

    /// Pick the Subject at `reference`, resolved against the Document's
    /// Reference (e.g. `#me`)
    pub fn as_ref(self, reference: impl Into<String>) -> VirtualSubject<P> {
        self.locate(SubjectLocator::AsRef {
            reference: reference.into(),
        })
    }

    fn locate(self, locator: SubjectLocator) -> VirtualSubject<P> {
        let document = self.document;
        VirtualSubject::new(if self.ensure {
            SubjectDescriptor::EnsuredIn { document, locator }
        } else {
            SubjectDescriptor::FoundIn { document, locator }
        })
    }
}

impl<P: Pod> Clone for VirtualSubject<P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<P: Pod> Debug for VirtualSubject<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VirtualSubject")
            .field(self.descriptor())
            .finish()
    }
}

impl<P: Pod> Serialize for VirtualSubject<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.descriptor().serialize(serializer)
    }
}

impl<'de, P: Pod> Deserialize<'de> for VirtualSubject<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        SubjectDescriptor::deserialize(deserializer).map(Self::new)
    }
}
