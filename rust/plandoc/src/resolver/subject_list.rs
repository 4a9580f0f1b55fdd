use std::collections::BTreeMap;

use plandoc_pod::{Pod, PodDocument, PodSubject, SubjectOf};

use super::subjects_matching;
use crate::{ResolveError, Resolver, SubjectListDescriptor};

impl<P> Resolver<P>
where
    P: Pod,
{
    pub(super) async fn subject_list_for(
        &self,
        descriptor: &SubjectListDescriptor<P>,
    ) -> Result<Option<Vec<SubjectOf<P>>>, ResolveError> {
        match descriptor {
            SubjectListDescriptor::FoundIn {
                document,
                references,
            } => {
                tracing::debug!(kind = "Subject List", variant = "FoundIn", "Resolving");
                let Some(resolved) = self.resolve_document(document).await? else {
                    return Ok(None);
                };
                if references.is_empty() {
                    return Err(ResolveError::MissingIdentifyingProperty {
                        target: "these Subjects",
                    });
                }
                Ok(Some(subjects_matching(&resolved, references)))
            }
            SubjectListDescriptor::FoundOn { subject, predicate } => {
                tracing::debug!(kind = "Subject List", variant = "FoundOn", "Resolving");
                let Some(source) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                let source_document = source.document();
                let here = source_document.reference();

                let (local, remote): (Vec<_>, Vec<_>) = source
                    .get_all_refs(predicate)
                    .into_iter()
                    .partition(|reference| reference.document() == here);

                let mut documents = BTreeMap::new();
                let mut subjects = Vec::with_capacity(local.len() + remote.len());
                for reference in remote {
                    let location = reference.document();
                    if !documents.contains_key(&location) {
                        let document = self.pod.fetch_document(&location).await?;
                        documents.insert(location.clone(), document);
                    }
                    if let Some(document) = documents.get(&location) {
                        subjects.push(document.subject(&reference));
                    }
                }
                subjects.extend(
                    local
                        .iter()
                        .map(|reference| source_document.subject(reference)),
                );

                Ok(Some(subjects))
            }
        }
    }
}
