use plandoc_pod::{Pod, PodDocument, PodSubject};

use crate::{AclOptions, DocumentDescriptor, ResolveError, Resolver};

impl<P> Resolver<P>
where
    P: Pod,
{
    pub(super) async fn document_for(
        &self,
        descriptor: &DocumentDescriptor<P>,
    ) -> Result<Option<P::Document>, ResolveError> {
        tracing::debug!(kind = "Document", variant = descriptor.tag(), "Resolving");

        match descriptor {
            DocumentDescriptor::FoundAt { reference } => {
                Ok(Some(self.pod.fetch_document(reference).await?))
            }
            DocumentDescriptor::IsAclFor { document } => {
                let Some(resolved) = self.resolve_document(document).await? else {
                    return Ok(None);
                };
                let Some(acl_ref) = resolved.acl_ref() else {
                    return Ok(None);
                };
                Ok(Some(self.pod.fetch_document(&acl_ref).await?))
            }
            DocumentDescriptor::FoundOn { subject, predicate } => {
                let Some(subject) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                let Some(reference) = subject.get_ref(predicate) else {
                    return Ok(None);
                };
                Ok(Some(self.pod.fetch_document(&reference).await?))
            }
            DocumentDescriptor::EnsuredOn {
                subject,
                predicate,
                fallback_container,
                acl,
            } => {
                let Some(subject) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                if let Some(reference) = subject.get_ref(predicate) {
                    return Ok(Some(self.pod.fetch_document(&reference).await?));
                }
                let Some(container) = self.resolve_container(fallback_container).await? else {
                    return Ok(None);
                };

                let created = self
                    .pod
                    .create_document_in_container(&container)
                    .save()
                    .await?;
                tracing::info!(document = %created.reference(), %container, "Created Document");

                subject.set_ref(predicate, &created.reference());
                subject.document().save_subjects(&[subject.clone()]).await?;

                if acl.has_acl_settings() {
                    let acl_ref = created
                        .acl_ref()
                        .ok_or(ResolveError::MissingAclLocation { kind: "Document" })?;
                    self.acl
                        .configure(
                            &created.reference(),
                            &acl_ref,
                            acl,
                            AclOptions { default: false },
                        )
                        .await?;
                }

                Ok(Some(created))
            }
        }
    }
}
