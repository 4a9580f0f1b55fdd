use plandoc_pod::{Pod, PodDocument, PodError, PodSubject, Reference, vocab};

use super::{AccessMode, AccessModes, AclSettings};
use crate::ResolveError;

/// Options for [AclService::configure]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclOptions {
    /// Whether the rules should also apply to the children of the resource
    /// (only meaningful for Containers)
    pub default: bool,
}

/// The identity an authorization rule grants access to
#[derive(Debug, Clone, Copy)]
enum Identity<'a> {
    Everyone,
    Agent(&'a Reference),
    AgentWithOrigin {
        origin: &'a Reference,
        agent: &'a Reference,
    },
}

impl Identity<'_> {
    fn is_granted_by<S: PodSubject>(&self, rule: &S) -> bool {
        let agents = rule.get_all_refs(&term(vocab::ACL_AGENT));
        let origins = rule.get_all_refs(&term(vocab::ACL_ORIGIN));
        match self {
            Self::Everyone => rule
                .get_all_refs(&term(vocab::ACL_AGENT_CLASS))
                .contains(&term(vocab::FOAF_AGENT)),
            Self::Agent(agent) => agents.contains(agent) && origins.is_empty(),
            Self::AgentWithOrigin { origin, agent } => {
                agents.contains(agent) && origins.contains(origin)
            }
        }
    }

    fn write_to<S: PodSubject>(&self, rule: &S) {
        match self {
            Self::Everyone => {
                rule.set_ref(&term(vocab::ACL_AGENT_CLASS), &term(vocab::FOAF_AGENT))
            }
            Self::Agent(agent) => rule.set_ref(&term(vocab::ACL_AGENT), agent),
            Self::AgentWithOrigin { origin, agent } => {
                rule.set_ref(&term(vocab::ACL_ORIGIN), origin);
                rule.set_ref(&term(vocab::ACL_AGENT), agent);
            }
        }
    }
}

fn term(iri: &str) -> Reference {
    Reference::new(iri)
}

/// Writes [AclSettings] to the Access Control List of a resource
#[derive(Debug, Clone)]
pub struct AclService<P>
where
    P: Pod,
{
    pod: P,
}

impl<P> AclService<P>
where
    P: Pod,
{
    /// Create an [AclService] that reads and writes Access Control Lists in
    /// the given [Pod]
    pub fn new(pod: P) -> Self {
        Self { pod }
    }

    /// Write `settings` for `resource` to the Access Control List at
    /// `acl_ref`, returning the saved Access Control List
    ///
    /// Nothing is read or written (and `None` is returned) when `settings`
    /// are empty. An Access Control List that does not exist yet (or can not
    /// be fetched) is created.
    /// Rules the Access Control List already holds for the same resource and
    /// identity are updated in place.
    pub async fn configure(
        &self,
        resource: &Reference,
        acl_ref: &Reference,
        settings: &AclSettings,
        options: AclOptions,
    ) -> Result<Option<P::Document>, ResolveError> {
        if !settings.has_acl_settings() {
            return Ok(None);
        }

        tracing::debug!(%resource, %acl_ref, "Configuring access");
        let document = self.acl_document(acl_ref).await;

        if let Some(modes) = &settings.public {
            write_rule(&document, resource, Identity::Everyone, modes, options);
        }
        for (agent, modes) in settings.agents.iter().flatten() {
            write_rule(&document, resource, Identity::Agent(agent), modes, options);
        }
        for (origin, agents) in settings.origins.iter().flatten() {
            for (agent, modes) in agents {
                write_rule(
                    &document,
                    resource,
                    Identity::AgentWithOrigin { origin, agent },
                    modes,
                    options,
                );
            }
        }

        let saved = document.save().await?;
        Ok(Some(saved))
    }

    /// The Access Control List at `acl_ref`, or a new local one if it can
    /// not be fetched
    async fn acl_document(&self, acl_ref: &Reference) -> P::Document {
        match self.pod.fetch_document(acl_ref).await {
            Ok(document) => document,
            Err(PodError::NotFound { .. }) => {
                tracing::info!(%acl_ref, "Creating Access Control List");
                self.pod.create_document(acl_ref)
            }
            Err(error) => {
                tracing::warn!(%acl_ref, %error, "Could not fetch Access Control List; creating it");
                self.pod.create_document(acl_ref)
            }
        }
    }
}

fn write_rule<D: PodDocument>(
    document: &D,
    resource: &Reference,
    identity: Identity<'_>,
    modes: &AccessModes,
    options: AclOptions,
) {
    let rule = find_rule(document, resource, identity).unwrap_or_else(|| {
        let rule = document.add_subject(None);
        tracing::info!(rule = %rule.reference(), %resource, "Adding authorization rule");
        rule
    });

    rule.set_ref(&term(vocab::RDF_TYPE), &term(vocab::ACL_AUTHORIZATION));
    rule.set_ref(&term(vocab::ACL_ACCESS_TO), resource);
    identity.write_to(&rule);

    if options.default {
        rule.add_ref(&term(vocab::ACL_DEFAULT), resource);
        rule.add_ref(&term(vocab::ACL_DEFAULT_FOR_NEW), resource);
    }

    for mode in AccessMode::ALL {
        match modes.get(mode) {
            Some(true) => rule.add_ref(&term(vocab::ACL_MODE), &term(mode.iri())),
            Some(false) => rule.remove_ref(&term(vocab::ACL_MODE), &term(mode.iri())),
            None => {}
        }
    }
}

/// The one existing rule for `resource` and `identity`, if the Access
/// Control List has been saved before and holds exactly one
fn find_rule<D: PodDocument>(
    document: &D,
    resource: &Reference,
    identity: Identity<'_>,
) -> Option<D::Subject> {
    if !document.is_saved_to_pod() {
        return None;
    }

    let mut candidates: Vec<D::Subject> = document
        .find_subjects(&term(vocab::RDF_TYPE), &term(vocab::ACL_AUTHORIZATION))
        .into_iter()
        .filter(|rule| rule.get_all_refs(&term(vocab::ACL_ACCESS_TO)).contains(resource))
        .filter(|rule| identity.is_granted_by(rule))
        .collect();

    match candidates.len() {
        1 => candidates.pop(),
        _ => None,
    }
}
