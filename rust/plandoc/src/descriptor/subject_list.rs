use std::fmt::Debug;
use std::sync::Arc;

use plandoc_pod::{Pod, Reference, SubjectOf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Handle, RefPair, VirtualDocument, VirtualSubject, read_plain};
use crate::{Memo, ResolveError};

/// How to get to a list of Subjects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", bound = "")]
pub enum SubjectListDescriptor<P: Pod> {
    /// Every Subject in a Document that has all of the given property values
    FoundIn {
        /// The Document to look in
        document: VirtualDocument<P>,
        /// Property values every Subject must have
        references: Vec<RefPair>,
    },
    /// Every Subject referred to by another Subject
    FoundOn {
        /// The Subject that refers to the list
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds the References
        predicate: Reference,
    },
}

impl<P: Pod> SubjectListDescriptor<P> {
    const TAGS: [&'static str; 2] = ["FoundIn", "FoundOn"];
}

/// A description of a list of Subjects, to be resolved by a
/// [Resolver](crate::Resolver)
pub struct VirtualSubjectList<P: Pod> {
    handle: Arc<Handle<SubjectListDescriptor<P>, Option<Vec<SubjectOf<P>>>>>,
}

impl<P: Pod> VirtualSubjectList<P> {
    /// Wrap `descriptor` in a new handle
    pub fn new(descriptor: SubjectListDescriptor<P>) -> Self {
        Self {
            handle: Handle::new(descriptor),
        }
    }

    /// Describe the Subjects in `document`; narrow them down with
    /// [VirtualSubjectList::with_ref]
    pub fn found_in(document: &VirtualDocument<P>) -> Self {
        Self::new(SubjectListDescriptor::FoundIn {
            document: document.clone(),
            references: Vec::new(),
        })
    }

    /// Describe the Subjects that `subject` refers to via `predicate`
    pub fn found_on(subject: &VirtualSubject<P>, predicate: impl Into<Reference>) -> Self {
        Self::new(SubjectListDescriptor::FoundOn {
            subject: subject.clone(),
            predicate: predicate.into(),
        })
    }

    /// A new handle that only lists Subjects that also have `object` as a
    /// value for `predicate`
    ///
    /// Lists found on a Subject can not be narrowed down; for those the
    /// returned handle is an unchanged copy.
    pub fn with_ref(&self, predicate: impl Into<Reference>, object: impl Into<Reference>) -> Self {
        match self.descriptor() {
            SubjectListDescriptor::FoundIn {
                document,
                references,
            } => {
                let mut references = references.clone();
                references.push(RefPair::new(predicate, object));
                Self::new(SubjectListDescriptor::FoundIn {
                    document: document.clone(),
                    references,
                })
            }
            descriptor @ SubjectListDescriptor::FoundOn { .. } => {
                tracing::warn!("Lists of Subjects found on a Subject can not be narrowed down");
                Self::new(descriptor.clone())
            }
        }
    }

    /// Read a [VirtualSubjectList] from the plain form produced by
    /// [serialise](crate::serialise)
    pub fn from_plain(value: serde_json::Value) -> Result<Self, ResolveError> {
        read_plain("Subject List", &SubjectListDescriptor::<P>::TAGS, value).map(Self::new)
    }

    /// The descriptor of this handle
    pub fn descriptor(&self) -> &SubjectListDescriptor<P> {
        &self.handle.descriptor
    }

    /// Whether `other` is a clone of this handle
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }

    pub(crate) fn memo(&self) -> &Memo<Option<Vec<SubjectOf<P>>>> {
        &self.handle.memo
    }
}

impl<P: Pod> Clone for VirtualSubjectList<P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<P: Pod> Debug for VirtualSubjectList<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VirtualSubjectList")
            .field(self.descriptor())
            .finish()
    }
}

impl<P: Pod> Serialize for VirtualSubjectList<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.descriptor().serialize(serializer)
    }
}

impl<'de, P: Pod> Deserialize<'de> for VirtualSubjectList<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        SubjectListDescriptor::deserialize(deserializer).map(Self::new)
    }
}
