use plandoc_pod::{Pod, PodDocument, PodSubject, SubjectOf, vocab};

use super::subjects_matching;
use crate::{ResolveError, Resolver, SubjectDescriptor, SubjectLocator, VirtualDocument};

impl<P> Resolver<P>
where
    P: Pod,
{
    pub(super) async fn subject_for(
        &self,
        descriptor: &SubjectDescriptor<P>,
    ) -> Result<Option<SubjectOf<P>>, ResolveError> {
        tracing::debug!(kind = "Subject", variant = descriptor.tag(), "Resolving");

        match descriptor {
            SubjectDescriptor::FoundAt { reference } => {
                let document = self.pod.fetch_document(reference).await?;
                Ok(Some(document.subject(reference)))
            }
            SubjectDescriptor::FoundOn { subject, predicate } => {
                let Some(source) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                Ok(source
                    .get_ref(predicate)
                    .map(|reference| source.document().subject(&reference)))
            }
            SubjectDescriptor::EnsuredOn { subject, predicate } => {
                let Some(source) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                let document = source.document();
                if let Some(reference) = source.get_ref(predicate) {
                    return Ok(Some(document.subject(&reference)));
                }

                let created = document.add_subject(None);
                source.add_ref(predicate, &created.reference());
                let saved = document
                    .save_subjects(&[source.clone(), created.clone()])
                    .await?;
                tracing::info!(
                    subject = %created.reference(),
                    source = %source.reference(),
                    "Created Subject"
                );
                Ok(Some(saved.subject(&created.reference())))
            }
            SubjectDescriptor::FoundIn { document, locator } => {
                self.subject_in(document, locator, false).await
            }
            SubjectDescriptor::EnsuredIn { document, locator } => {
                self.subject_in(document, locator, true).await
            }
        }
    }

    async fn subject_in(
        &self,
        document: &VirtualDocument<P>,
        locator: &SubjectLocator,
        ensure: bool,
    ) -> Result<Option<SubjectOf<P>>, ResolveError> {
        let Some(resolved) = self.resolve_document(document).await? else {
            return Ok(None);
        };

        match locator {
            SubjectLocator::WithRefs { references } => {
                if references.is_empty() {
                    return Err(ResolveError::MissingIdentifyingProperty {
                        target: "this subject",
                    });
                }

                let mut matches = subjects_matching(&resolved, references);
                if !ensure {
                    // Ambiguous matches count as not found
                    return Ok(match matches.len() {
                        1 => matches.pop(),
                        _ => None,
                    });
                }
                if !matches.is_empty() {
                    return Ok(Some(matches.swap_remove(0)));
                }

                let created = resolved.add_subject(None);
                for pair in references {
                    created.add_ref(&pair.predicate, &pair.object);
                }
                let root = resolved.subject(&resolved.reference());
                root.add_ref(&vocab::DCT_REFERENCES.into(), &created.reference());

                let saved = self
                    .save_subjects(document, &resolved, &[created.clone(), root])
                    .await?;
                tracing::info!(
                    subject = %created.reference(),
                    document = %saved.reference(),
                    "Created Subject"
                );
                Ok(Some(saved.subject(&created.reference())))
            }
            SubjectLocator::AsRef { reference } => {
                let reference = resolved.reference().join(reference)?;
                if let Some(existing) = resolved.get_subject(&reference) {
                    return Ok(Some(existing));
                }
                if !ensure {
                    return Ok(None);
                }
                Ok(Some(resolved.add_subject(reference.fragment())))
            }
        }
    }
}
