use async_trait::async_trait;
use plandoc::{
    AclOptions, AclService, AclSettings, ConfiguresAcl, Resolver, VirtualContainer,
    VirtualDocument, VirtualSubject,
};
use plandoc_pod::{
    MeasuredPod, MemoryDocument, MemoryPod, Pod, PodDocument, PodError, PodSubject, Reference,
    Triple, vocab,
};
use pretty_assertions::assert_eq;

const RESOURCE: &str = "https://pod/notes.ttl";
const ACL: &str = "https://pod/notes.ttl.acl";
const ALICE: &str = "https://alice.pod/profile/card#me";

/// A [Pod] that refuses to hand out its Access Control Lists
#[derive(Clone, Debug)]
struct ForbiddenAcls(MemoryPod);

#[async_trait]
impl Pod for ForbiddenAcls {
    type Document = MemoryDocument;
    type Client = MemoryPod;

    async fn fetch_document(&self, reference: &Reference) -> Result<Self::Document, PodError> {
        if reference.as_str().ends_with(".acl") {
            return Err(PodError::Unauthorized {
                reference: reference.clone(),
                reason: "403".into(),
            });
        }
        self.0.fetch_document(reference).await
    }

    fn create_document(&self, reference: &Reference) -> Self::Document {
        self.0.create_document(reference)
    }

    fn create_document_in_container(&self, container: &Reference) -> Self::Document {
        self.0.create_document_in_container(container)
    }

    fn client(&self) -> &Self::Client {
        &self.0
    }
}

fn public_rule(pod: &MemoryPod) {
    let rule = "https://pod/notes.ttl.acl#public";
    pod.insert_document(
        ACL,
        [
            Triple::new(rule, vocab::RDF_TYPE, vocab::ACL_AUTHORIZATION),
            Triple::new(rule, vocab::ACL_ACCESS_TO, RESOURCE),
            Triple::new(rule, vocab::ACL_AGENT_CLASS, vocab::FOAF_AGENT),
            Triple::new(rule, vocab::ACL_MODE, vocab::ACL_READ),
            Triple::new(rule, vocab::ACL_MODE, vocab::ACL_WRITE),
        ],
    );
}

#[test_log::test(tokio::test)]
async fn it_performs_no_io_for_empty_settings() -> anyhow::Result<()> {
    let pod = MeasuredPod::new(MemoryPod::new());
    let service = AclService::new(pod.clone());

    let acl = service
        .configure(
            &Reference::new(RESOURCE),
            &Reference::new(ACL),
            &AclSettings::default(),
            AclOptions { default: true },
        )
        .await?;

    assert!(acl.is_none());
    assert!(pod.calls().is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn it_only_removes_the_read_mode_when_public_read_is_revoked() -> anyhow::Result<()> {
    let pod = MemoryPod::new();
    public_rule(&pod);
    let service = AclService::new(pod.clone());

    service
        .configure(
            &Reference::new(RESOURCE),
            &Reference::new(ACL),
            &AclSettings::default().not_readable_by_everyone(),
            AclOptions::default(),
        )
        .await?;

    let stored = pod.triples(&Reference::new(ACL)).unwrap_or_default();
    let modes: Vec<&Reference> = stored
        .iter()
        .filter(|triple| triple.predicate.as_str() == vocab::ACL_MODE)
        .map(|triple| &triple.object)
        .collect();
    let rules = stored
        .iter()
        .filter(|triple| triple.object.as_str() == vocab::ACL_AUTHORIZATION)
        .count();

    assert_eq!(modes, vec![&Reference::new(vocab::ACL_WRITE)]);
    assert_eq!(rules, 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn it_creates_acls_that_can_not_be_fetched() -> anyhow::Result<()> {
    let memory = MemoryPod::new();
    let service = AclService::new(ForbiddenAcls(memory.clone()));

    let acl = service
        .configure(
            &Reference::new(RESOURCE),
            &Reference::new(ACL),
            &AclSettings::default().readable_by_everyone(),
            AclOptions::default(),
        )
        .await?
        .expect("settings were given");

    let rules = acl.find_subjects(
        &Reference::new(vocab::RDF_TYPE),
        &Reference::new(vocab::ACL_AUTHORIZATION),
    );
    assert_eq!(rules.len(), 1);
    assert_eq!(
        rules[0].get_all_refs(&Reference::new(vocab::ACL_MODE)),
        vec![Reference::new(vocab::ACL_READ)]
    );
    assert!(acl.is_saved_to_pod());
    assert!(memory.contains(&Reference::new(ACL)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn it_grants_access_on_created_containers_and_documents() -> anyhow::Result<()> {
    let pod = MemoryPod::new();
    pod.insert_document(
        "https://pod/profile.ttl",
        [Triple::new(
            "https://pod/profile.ttl#me",
            vocab::RDF_TYPE,
            vocab::FOAF_AGENT,
        )],
    );
    let resolver = Resolver::new(pod.clone());
    let root = VirtualContainer::found_at("https://pod/");
    let private = VirtualContainer::contained_in(&root, "private")
        .is_readable_by_agent(ALICE)
        .is_writable_by_agent(ALICE);
    let me = VirtualSubject::found_at("https://pod/profile.ttl#me");
    let diary = VirtualDocument::ensured_on(&me, "https://vocab.example/diary", &private)
        .is_controllable_by_agent(ALICE);

    let diary = resolver
        .resolve_document(&diary)
        .await?
        .expect("the diary is created");
    let container_acl = resolver
        .resolve_document(&VirtualDocument::is_acl_for(&VirtualDocument::found_at(
            "https://pod/private/",
        )))
        .await?
        .expect("the Container has an ACL");
    let diary_acl = resolver
        .resolve_document(&VirtualDocument::is_acl_for(&VirtualDocument::found_at(
            diary.reference(),
        )))
        .await?
        .expect("the diary has an ACL");

    let modes = |document: &MemoryDocument| {
        let rules = document.find_subjects(
            &Reference::new(vocab::RDF_TYPE),
            &Reference::new(vocab::ACL_AUTHORIZATION),
        );
        assert_eq!(rules.len(), 1);
        let mut modes = rules[0].get_all_refs(&Reference::new(vocab::ACL_MODE));
        modes.sort();
        modes
    };

    assert_eq!(
        modes(&container_acl),
        vec![
            Reference::new(vocab::ACL_READ),
            Reference::new(vocab::ACL_WRITE)
        ]
    );
    assert_eq!(modes(&diary_acl), vec![Reference::new(vocab::ACL_CONTROL)]);
    Ok(())
}
