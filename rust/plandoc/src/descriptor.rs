//! Descriptors describe how to get to a Document, Container, Subject or list
//! of Subjects in a Pod, without performing any I/O.
//!
//! Every descriptor is wrapped in a handle (e.g. [VirtualDocument]) that
//! pairs the immutable descriptor with a [Memo]. Cloning a handle shares
//! its [Memo]; every builder method produces a new handle with a fresh one.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{Memo, ResolveError};

mod container;
pub use container::*;

mod document;
pub use document::*;

mod subject;
pub use subject::*;

mod subject_list;
pub use subject_list::*;

/// A descriptor together with the slot its resolution is memoized in
pub(crate) struct Handle<Descriptor, Output>
where
    Output: Clone,
{
    descriptor: Descriptor,
    memo: Memo<Output>,
}

impl<Descriptor, Output> Handle<Descriptor, Output>
where
    Output: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(descriptor: Descriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            memo: Memo::new(),
        })
    }
}

/// Read a descriptor of the given `kind` from its plain (JSON) form,
/// rejecting `type` tags outside of `tags`.
pub(crate) fn read_plain<Descriptor>(
    kind: &'static str,
    tags: &[&str],
    value: serde_json::Value,
) -> Result<Descriptor, ResolveError>
where
    Descriptor: DeserializeOwned,
{
    let known = value
        .get("type")
        .and_then(|tag| tag.as_str())
        .is_some_and(|tag| tags.contains(&tag));
    if !known {
        return Err(ResolveError::UnsupportedDescriptorType { kind });
    }

    serde_json::from_value(value).map_err(|error| ResolveError::InvalidDescriptor {
        kind,
        reason: error.to_string(),
    })
}
