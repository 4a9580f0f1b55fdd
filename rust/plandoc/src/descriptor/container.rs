use std::fmt::Debug;
use std::sync::Arc;

use plandoc_pod::{Pod, Reference};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Handle, VirtualSubject, read_plain};
use crate::{AclSettings, ConfiguresAcl, Memo, ResolveError};

/// How to get to a Container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", bound = "")]
pub enum ContainerDescriptor<P: Pod> {
    /// The Container at a known location
    FoundAt {
        /// Where the Container lives
        reference: Reference,
    },
    /// The Container referred to by a Subject
    FoundOn {
        /// The Subject that refers to the Container
        subject: VirtualSubject<P>,
        /// The property on `subject` that holds the Container's location
        predicate: Reference,
    },
    /// A Container with a given name inside another Container, created if
    /// it does not exist yet
    ContainedIn {
        /// The parent Container
        container: VirtualContainer<P>,
        /// The name of the child Container
        name: String,
        /// Access to grant on the child Container when it is created
        #[serde(default)]
        acl: AclSettings,
    },
}

impl<P: Pod> ContainerDescriptor<P> {
    const TAGS: [&'static str; 3] = ["FoundAt", "FoundOn", "ContainedIn"];

    /// The name of this variant, as used in its plain form
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FoundAt { .. } => "FoundAt",
            Self::FoundOn { .. } => "FoundOn",
            Self::ContainedIn { .. } => "ContainedIn",
        }
    }
}

/// A description of a Container, to be resolved by a
/// [Resolver](crate::Resolver) to the Container's [Reference]
pub struct VirtualContainer<P: Pod> {
    handle: Arc<Handle<ContainerDescriptor<P>, Option<Reference>>>,
}

impl<P: Pod> VirtualContainer<P> {
    /// Wrap `descriptor` in a new handle
    pub fn new(descriptor: ContainerDescriptor<P>) -> Self {
        Self {
            handle: Handle::new(descriptor),
        }
    }

    /// Describe the Container at `reference`
    pub fn found_at(reference: impl Into<Reference>) -> Self {
        Self::new(ContainerDescriptor::FoundAt {
            reference: reference.into(),
        })
    }

    /// Describe the Container that `subject` refers to via `predicate`
    pub fn found_on(subject: &VirtualSubject<P>, predicate: impl Into<Reference>) -> Self {
        Self::new(ContainerDescriptor::FoundOn {
            subject: subject.clone(),
            predicate: predicate.into(),
        })
    }

    /// Describe the child Container called `name` inside `container`
    pub fn contained_in(container: &VirtualContainer<P>, name: impl Into<String>) -> Self {
        Self::new(ContainerDescriptor::ContainedIn {
            container: container.clone(),
            name: name.into(),
            acl: AclSettings::default(),
        })
    }

    /// Read a [VirtualContainer] from the plain form produced by
    /// [serialise](crate::serialise)
    pub fn from_plain(value: serde_json::Value) -> Result<Self, ResolveError> {
        read_plain("Container", &ContainerDescriptor::<P>::TAGS, value).map(Self::new)
    }

    /// The descriptor of this handle
    pub fn descriptor(&self) -> &ContainerDescriptor<P> {
        &self.handle.descriptor
    }

    /// Whether `other` is a clone of this handle
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }

    pub(crate) fn memo(&self) -> &Memo<Option<Reference>> {
        &self.handle.memo
    }
}

impl<P: Pod> ConfiguresAcl for VirtualContainer<P> {
    fn with_acl(&self, configure: impl FnOnce(AclSettings) -> AclSettings) -> Self {
        match self.descriptor() {
            ContainerDescriptor::ContainedIn {
                container,
                name,
                acl,
            } => Self::new(ContainerDescriptor::ContainedIn {
                container: container.clone(),
                name: name.clone(),
                acl: configure(acl.clone()),
            }),
            descriptor => {
                tracing::warn!(
                    variant = descriptor.tag(),
                    "Access settings only apply to Containers that may be created; ignoring them"
                );
                Self::new(descriptor.clone())
            }
        }
    }
}

impl<P: Pod> Clone for VirtualContainer<P> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<P: Pod> Debug for VirtualContainer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VirtualContainer")
            .field(self.descriptor())
            .finish()
    }
}

impl<P: Pod> Serialize for VirtualContainer<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.descriptor().serialize(serializer)
    }
}

impl<'de, P: Pod> Deserialize<'de> for VirtualContainer<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ContainerDescriptor::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use plandoc_pod::MemoryPod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    type Container = VirtualContainer<MemoryPod>;

    #[test]
    fn it_keeps_acl_settings_per_handle() {
        let root = Container::found_at("https://some.pod/");
        let child = Container::contained_in(&root, "notes");
        let shared = child.is_readable_by_agent("https://some.pod/profile#me");

        let ContainerDescriptor::ContainedIn { acl, name, .. } = shared.descriptor() else {
            panic!("Expected a ContainedIn descriptor");
        };
        assert_eq!(name, "notes");
        assert_eq!(
            acl,
            &AclSettings::default().readable_by_agent("https://some.pod/profile#me")
        );

        let ContainerDescriptor::ContainedIn { acl, .. } = child.descriptor() else {
            panic!("Expected a ContainedIn descriptor");
        };
        assert!(!acl.has_acl_settings());
    }

    #[test]
    fn it_rejects_unknown_descriptor_types() {
        let error = Container::from_plain(json!({ "type": "bogus" })).unwrap_err();

        assert_eq!(
            error.to_string(),
            "This type of Virtual Container can not be processed yet."
        );
    }

    #[test]
    fn it_reports_malformed_descriptors() {
        let error = Container::from_plain(json!({ "type": "FoundAt" })).unwrap_err();

        assert!(matches!(
            error,
            ResolveError::InvalidDescriptor {
                kind: "Container",
                ..
            }
        ));
    }
}
