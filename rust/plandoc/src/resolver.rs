//! Turns descriptors into the resources they describe.
//!
//! Every `resolve_*` method of [Resolver] returns the [Resolution]
//! memoized on the handle it is given: the first call starts the work and
//! stores it, every later call (on the handle or any of its clones) shares
//! it. Resolutions settle to `None` when a chain of descriptors can not be
//! followed (e.g. a Subject lacks the property that leads to a Document), and
//! to a [ResolveError] when a request is invalid or the Pod fails.
//!
//! A stored resolution owns a copy of its handle's descriptor (and so the
//! nested handles), never the handle itself.

use futures::FutureExt;
use plandoc_pod::{Pod, PodDocument, PodSubject, Reference, SubjectOf};

use crate::{
    AclService, RefPair, Resolution, ResolveError, VirtualContainer, VirtualDocument,
    VirtualSubject, VirtualSubjectList,
};

mod container;
mod document;
mod subject;
mod subject_list;

/// Resolves descriptor handles against a [Pod]
///
/// A [Resolver] is cheap to clone; clones share the underlying [Pod].
#[derive(Debug, Clone)]
pub struct Resolver<P>
where
    P: Pod,
{
    pod: P,
    acl: AclService<P>,
}

impl<P> Resolver<P>
where
    P: Pod,
{
    /// Create a [Resolver] for the given [Pod]
    pub fn new(pod: P) -> Self {
        Self {
            acl: AclService::new(pod.clone()),
            pod,
        }
    }

    /// The [Pod] this [Resolver] reads from and writes to
    pub fn pod(&self) -> &P {
        &self.pod
    }

    /// Resolve `document` to the Document it describes
    pub fn resolve_document(
        &self,
        document: &VirtualDocument<P>,
    ) -> Resolution<Option<P::Document>> {
        document.memo().get_or_start(|| {
            let resolver = self.clone();
            let descriptor = document.descriptor().clone();
            async move { resolver.document_for(&descriptor).await }.boxed()
        })
    }

    /// Resolve `container` to the Reference of the Container it describes,
    /// creating the Container if the descriptor asks for that
    pub fn resolve_container(
        &self,
        container: &VirtualContainer<P>,
    ) -> Resolution<Option<Reference>> {
        container.memo().get_or_start(|| {
            let resolver = self.clone();
            let descriptor = container.descriptor().clone();
            async move { resolver.container_for(&descriptor).await }.boxed()
        })
    }

    /// Resolve `subject` to the Subject it describes
    pub fn resolve_subject(&self, subject: &VirtualSubject<P>) -> Resolution<Option<SubjectOf<P>>> {
        subject.memo().get_or_start(|| {
            let resolver = self.clone();
            let descriptor = subject.descriptor().clone();
            async move { resolver.subject_for(&descriptor).await }.boxed()
        })
    }

    /// Resolve `list` to the Subjects it describes
    pub fn resolve_subject_list(
        &self,
        list: &VirtualSubjectList<P>,
    ) -> Resolution<Option<Vec<SubjectOf<P>>>> {
        list.memo().get_or_start(|| {
            let resolver = self.clone();
            let descriptor = list.descriptor().clone();
            async move { resolver.subject_list_for(&descriptor).await }.boxed()
        })
    }

    /// Save `changed` (the Document that `document` resolved to, with local
    /// changes) and let later resolutions of `document` see the saved state
    pub async fn save_document(
        &self,
        document: &VirtualDocument<P>,
        changed: &P::Document,
    ) -> Result<P::Document, ResolveError> {
        let saved = changed.save().await?;
        document.memo().settle(Some(saved.clone()));
        Ok(saved)
    }

    /// Save the given Subjects of `resolved` (which `document` resolved to)
    /// and let later resolutions of `document` see the saved state
    async fn save_subjects(
        &self,
        document: &VirtualDocument<P>,
        resolved: &P::Document,
        subjects: &[SubjectOf<P>],
    ) -> Result<P::Document, ResolveError> {
        let saved = resolved.save_subjects(subjects).await?;
        document.memo().settle(Some(saved.clone()));
        Ok(saved)
    }
}

/// Every Subject in `document` that has all of the given property values
///
/// Candidates are the Subjects matching the first pair; `references` must
/// not be empty.
fn subjects_matching<D>(document: &D, references: &[RefPair]) -> Vec<D::Subject>
where
    D: PodDocument,
{
    let Some(first) = references.first() else {
        return Vec::new();
    };

    document
        .find_subjects(&first.predicate, &first.object)
        .into_iter()
        .filter(|subject| {
            references.iter().all(|pair| {
                subject
                    .get_all_refs(&pair.predicate)
                    .contains(&pair.object)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use plandoc_pod::{MemoryPod, vocab};

    use super::*;

    #[test]
    fn it_does_not_keep_handles_alive_through_their_resolution() {
        let resolver = Resolver::new(MemoryPod::new());
        let document = VirtualDocument::found_at("https://some.pod/profile.ttl");
        let subject =
            VirtualSubject::found_in(&document).with_ref(vocab::RDF_TYPE, vocab::FOAF_AGENT);

        let document_resolution = resolver.resolve_document(&document);
        let subject_resolution = resolver.resolve_subject(&subject);

        assert!(document.memo().is_started());
        assert!(subject.memo().is_started());
        assert_eq!(subject.strong_count(), 1);
        assert_eq!(document.strong_count(), 3);

        drop(subject_resolution);
        drop(subject);
        assert_eq!(document.strong_count(), 1);
        drop(document_resolution);
    }
}
