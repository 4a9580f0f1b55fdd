use plandoc_pod::{PodError, Reference};
use thiserror::Error;

/// The common error type used by this crate
///
/// A resolution that fails is shared by every caller waiting on it, so
/// errors are [Clone].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A descriptor's `type` tag is not one this crate knows how to resolve
    #[error("This type of Virtual {kind} can not be processed yet.")]
    UnsupportedDescriptorType {
        /// The kind of descriptor, e.g. `Document`
        kind: &'static str,
    },

    /// A descriptor could not be read from its plain form
    #[error("Could not read Virtual {kind}: {reason}")]
    InvalidDescriptor {
        /// The kind of descriptor, e.g. `Document`
        kind: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// A Subject (or list of Subjects) was to be located by matching
    /// properties, but no properties were given
    #[error("Please specify at least one property to identify {target} with.")]
    MissingIdentifyingProperty {
        /// What was to be identified, e.g. `this subject`
        target: &'static str,
    },

    /// Access settings were requested for a resource whose server does not
    /// advertise where its Access Control List lives
    #[error("Could not find a location for the Access Control List of this {kind}.")]
    MissingAclLocation {
        /// The kind of resource, e.g. `Container`
        kind: &'static str,
    },

    /// The Access Control List could neither be fetched nor created
    ///
    /// [AclService](crate::AclService) never returns this itself, since
    /// creating a local Access Control List can not fail; it is available to
    /// other [Pod](plandoc_pod::Pod)-backed services that provision access.
    #[error("Could not fetch the Access Control List of this Document: {reason}")]
    AclFetchFailed {
        /// Where the Access Control List was expected
        reference: Reference,
        /// What went wrong
        reason: String,
    },

    /// The Pod failed to fulfil a request
    #[error(transparent)]
    Pod(#[from] PodError),
}
