use plandoc_pod::{HttpClient, Pod, PodDocument, PodSubject, Reference};
use reqwest::Method;

use crate::{AclOptions, AclSettings, ContainerDescriptor, ResolveError, Resolver};

/// The Reference of the Container called `name` inside `parent`, with
/// exactly one slash between them and one at the end
fn child_reference(parent: &Reference, name: &str) -> Reference {
    let parent = parent.as_str();
    let parent = parent.strip_suffix('/').unwrap_or(parent);
    let name = name.strip_prefix('/').unwrap_or(name);
    let name = name.strip_suffix('/').unwrap_or(name);
    Reference::new(format!("{parent}/{name}/"))
}

impl<P> Resolver<P>
where
    P: Pod,
{
    pub(super) async fn container_for(
        &self,
        descriptor: &ContainerDescriptor<P>,
    ) -> Result<Option<Reference>, ResolveError> {
        tracing::debug!(kind = "Container", variant = descriptor.tag(), "Resolving");

        match descriptor {
            ContainerDescriptor::FoundAt { reference } => Ok(Some(reference.clone())),
            ContainerDescriptor::FoundOn { subject, predicate } => {
                let Some(subject) = self.resolve_subject(subject).await? else {
                    return Ok(None);
                };
                Ok(subject.get_ref(predicate))
            }
            ContainerDescriptor::ContainedIn {
                container,
                name,
                acl,
            } => {
                let Some(parent) = self.resolve_container(container).await? else {
                    return Ok(None);
                };
                let child = child_reference(&parent, name);

                match self.pod.fetch_document(&child).await {
                    Ok(_) => Ok(Some(child)),
                    Err(error) => {
                        tracing::debug!(%child, %error, "Container does not exist yet");
                        self.create_container(&child, acl).await?;
                        Ok(Some(child))
                    }
                }
            }
        }
    }

    /// Make the server materialize the Container at `child` by adding a
    /// placeholder Document to it and removing it again
    async fn create_container(
        &self,
        child: &Reference,
        acl: &AclSettings,
    ) -> Result<(), ResolveError> {
        let placeholder = Reference::new(format!("{child}.dummy"));
        self.pod.create_document(&placeholder).save().await?;

        match self.pod.client().fetch(&placeholder, Method::DELETE).await {
            Ok(status) if status.is_success() => {}
            Ok(status) => {
                tracing::warn!(%placeholder, %status, "Could not remove placeholder Document")
            }
            Err(error) => {
                tracing::warn!(%placeholder, %error, "Could not remove placeholder Document")
            }
        }

        let created = self.pod.fetch_document(child).await?;
        tracing::info!(container = %child, "Created Container");

        if acl.has_acl_settings() {
            let acl_ref = created
                .acl_ref()
                .ok_or(ResolveError::MissingAclLocation { kind: "Container" })?;
            self.acl
                .configure(child, &acl_ref, acl, AclOptions { default: true })
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use plandoc_pod::{MeasuredPod, MemoryPod, PodCall, Triple, vocab};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ConfiguresAcl, VirtualContainer, VirtualSubject};

    #[test]
    fn it_joins_child_references_with_single_slashes() {
        for parent in ["https://pod/c", "https://pod/c/"] {
            for name in ["name", "name/", "/name", "/name/"] {
                assert_eq!(
                    child_reference(&Reference::new(parent), name),
                    Reference::new("https://pod/c/name/"),
                    "{parent} + {name}"
                );
            }
        }
    }

    #[tokio::test]
    async fn it_returns_found_containers_without_io() -> anyhow::Result<()> {
        let pod = MeasuredPod::new(MemoryPod::new());
        let resolver = Resolver::new(pod.clone());

        let container = resolver
            .resolve_container(&VirtualContainer::found_at("https://pod/c/"))
            .await?;

        assert_eq!(container, Some(Reference::new("https://pod/c/")));
        assert!(pod.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn it_follows_a_subject_to_its_container() -> anyhow::Result<()> {
        let storage = "http://www.w3.org/ns/pim/space#storage";
        let pod = MemoryPod::new();
        pod.insert_document(
            "https://pod/profile.ttl",
            [Triple::new("https://pod/profile.ttl#me", storage, "https://pod/")],
        );
        let resolver = Resolver::new(pod);
        let me = VirtualSubject::found_at("https://pod/profile.ttl#me");

        let found = resolver
            .resolve_container(&VirtualContainer::found_on(&me, storage))
            .await?;
        let missing = resolver
            .resolve_container(&VirtualContainer::found_on(&me, vocab::RDF_TYPE))
            .await?;

        assert_eq!(found, Some(Reference::new("https://pod/")));
        assert_eq!(missing, None);
        Ok(())
    }

    #[tokio::test]
    async fn it_leaves_existing_containers_alone() -> anyhow::Result<()> {
        let memory = MemoryPod::new();
        memory.insert_container("https://pod/c/child/");
        let pod = MeasuredPod::new(memory);
        let resolver = Resolver::new(pod.clone());
        let parent = VirtualContainer::found_at("https://pod/c/");

        let child = resolver
            .resolve_container(
                &VirtualContainer::contained_in(&parent, "child").is_readable_by_everyone(),
            )
            .await?;

        assert_eq!(child, Some(Reference::new("https://pod/c/child/")));
        assert_eq!(
            pod.calls(),
            vec![PodCall::FetchDocument(Reference::new("https://pod/c/child/"))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_resolves_no_child_of_a_missing_parent() -> anyhow::Result<()> {
        let memory = MemoryPod::new();
        memory.insert_document(
            "https://pod/profile.ttl",
            [Triple::new("https://pod/profile.ttl#me", vocab::RDF_TYPE, vocab::FOAF_AGENT)],
        );
        let pod = MeasuredPod::new(memory);
        let resolver = Resolver::new(pod.clone());
        let me = VirtualSubject::found_at("https://pod/profile.ttl#me");
        let parent = VirtualContainer::found_on(&me, "http://www.w3.org/ns/pim/space#storage");

        let child = resolver
            .resolve_container(&VirtualContainer::contained_in(&parent, "child"))
            .await?;

        assert_eq!(child, None);
        assert_eq!(
            pod.calls(),
            vec![PodCall::FetchDocument(Reference::new("https://pod/profile.ttl#me"))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_requires_an_acl_location_for_access_settings() {
        let pod = MemoryPod::new().without_acl_links();
        let resolver = Resolver::new(pod);
        let parent = VirtualContainer::found_at("https://pod/c/");

        let error = resolver
            .resolve_container(
                &VirtualContainer::contained_in(&parent, "child").is_readable_by_everyone(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Could not find a location for the Access Control List of this Container."
        );
    }

    #[tokio::test]
    async fn it_provisions_access_for_children_of_new_containers() -> anyhow::Result<()> {
        let pod = MemoryPod::new();
        let resolver = Resolver::new(pod.clone());
        let parent = VirtualContainer::found_at("https://pod/c/");

        resolver
            .resolve_container(
                &VirtualContainer::contained_in(&parent, "child").is_readable_by_everyone(),
            )
            .await?;

        let acl = pod
            .triples(&Reference::new("https://pod/c/child/.acl"))
            .unwrap_or_default();
        assert!(acl.iter().any(|triple| {
            triple.predicate == Reference::new(vocab::ACL_DEFAULT)
                && triple.object == Reference::new("https://pod/c/child/")
        }));
        assert!(!pod.contains(&Reference::new("https://pod/c/child/.dummy")));
        assert!(pod.contains(&Reference::new("https://pod/c/child/")));
        Ok(())
    }
}
