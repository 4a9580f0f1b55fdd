use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, StatusCode};
use ulid::Ulid;

use crate::{HttpClient, Pod, PodDocument, PodError, PodSubject, Reference};

/// A single RDF statement whose object is a [Reference]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// The Subject the statement is about
    pub subject: Reference,
    /// The property
    pub predicate: Reference,
    /// The value
    pub object: Reference,
}

impl Triple {
    /// Create a new [Triple]
    pub fn new(
        subject: impl Into<Reference>,
        predicate: impl Into<Reference>,
        object: impl Into<Reference>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<Reference, Vec<Triple>>,
    containers: BTreeSet<Reference>,
}

impl MemoryState {
    fn store(&mut self, reference: Reference, triples: Vec<Triple>) {
        self.containers.extend(ancestors(&reference));
        self.documents.insert(reference, triples);
    }
}

/// Every Container that (transitively) contains `reference`, including
/// `reference` itself when it is a Container.
fn ancestors(reference: &Reference) -> Vec<Reference> {
    let iri = reference.document();
    let iri = iri.as_str();
    let Some(authority) = iri.find("://").map(|index| index + 3) else {
        return Vec::new();
    };

    iri[authority..]
        .match_indices('/')
        .map(|(index, _)| Reference::new(&iri[..=authority + index]))
        .collect()
}

/// A [Pod] that keeps every Document in memory and never persists it.
///
/// Cloning a [MemoryPod] produces another handle to the same Documents, so
/// a test can keep one clone to inspect what the code under test wrote
/// through another.
///
/// Containers come into existence as soon as a Document inside them is
/// saved, and outlive that Document if it is deleted again (mirroring how
/// Solid servers materialize intermediate Containers).
#[derive(Clone, Debug)]
pub struct MemoryPod {
    state: Arc<RwLock<MemoryState>>,
    acl_links: bool,
}

impl MemoryPod {
    /// Create a new, empty [MemoryPod]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            acl_links: true,
        }
    }

    /// Stop advertising Access Control List locations on Documents, as a
    /// server without ACL support would
    pub fn without_acl_links(mut self) -> Self {
        self.acl_links = false;
        self
    }

    /// Store a Document with the given triples, replacing any Document that
    /// was already stored at `reference`
    pub fn insert_document(
        &self,
        reference: impl Into<Reference>,
        triples: impl IntoIterator<Item = Triple>,
    ) {
        let reference: Reference = reference.into();
        self.state
            .write()
            .store(reference.document(), triples.into_iter().collect());
    }

    /// Make sure a Container exists at `reference`
    pub fn insert_container(&self, reference: impl Into<Reference>) {
        let reference: Reference = reference.into();
        self.state.write().containers.extend(ancestors(&reference));
    }

    /// The stored triples of the Document at `reference`, if it exists
    pub fn triples(&self, reference: &Reference) -> Option<Vec<Triple>> {
        self.state.read().documents.get(&reference.document()).cloned()
    }

    /// Whether a Document or Container exists at `reference`
    pub fn contains(&self, reference: &Reference) -> bool {
        let reference = reference.document();
        let state = self.state.read();
        state.documents.contains_key(&reference) || state.containers.contains(&reference)
    }

    /// The references of all stored Documents inside the given Container
    pub fn documents_in(&self, container: &Reference) -> Vec<Reference> {
        let state = self.state.read();
        let mut documents: Vec<Reference> = state
            .documents
            .keys()
            .filter(|reference| {
                reference
                    .as_str()
                    .strip_prefix(container.as_str())
                    .is_some_and(|rest| !rest.is_empty())
            })
            .cloned()
            .collect();
        documents.sort();
        documents
    }

    fn document(&self, reference: Reference, triples: Vec<Triple>, saved: bool) -> MemoryDocument {
        MemoryDocument {
            pod: self.clone(),
            reference,
            local: Arc::new(RwLock::new(LocalDocument { triples, saved })),
        }
    }
}

impl Default for MemoryPod {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pod for MemoryPod {
    type Document = MemoryDocument;
    type Client = Self;

    async fn fetch_document(&self, reference: &Reference) -> Result<Self::Document, PodError> {
        let reference = reference.document();
        let triples = {
            let state = self.state.read();
            match state.documents.get(&reference) {
                Some(triples) => triples.clone(),
                None if state.containers.contains(&reference) => Vec::new(),
                None => return Err(PodError::NotFound { reference }),
            }
        };
        Ok(self.document(reference, triples, true))
    }

    fn create_document(&self, reference: &Reference) -> Self::Document {
        self.document(reference.document(), Vec::new(), false)
    }

    fn create_document_in_container(&self, container: &Reference) -> Self::Document {
        let name = Ulid::new().to_string().to_lowercase();
        let container = container.as_str().trim_end_matches('/');
        self.document(
            Reference::new(format!("{container}/{name}.ttl")),
            Vec::new(),
            false,
        )
    }

    fn client(&self) -> &Self::Client {
        self
    }
}

#[async_trait]
impl HttpClient for MemoryPod {
    async fn fetch(&self, url: &Reference, method: Method) -> Result<StatusCode, PodError> {
        let reference = url.document();
        let status = match method {
            Method::DELETE => match self.state.write().documents.remove(&reference) {
                Some(_) => StatusCode::OK,
                None => StatusCode::NOT_FOUND,
            },
            Method::GET | Method::HEAD => match self.contains(&reference) {
                true => StatusCode::OK,
                false => StatusCode::NOT_FOUND,
            },
            _ => StatusCode::METHOD_NOT_ALLOWED,
        };
        Ok(status)
    }
}

#[derive(Debug)]
struct LocalDocument {
    triples: Vec<Triple>,
    saved: bool,
}

/// A Document handed out by a [MemoryPod]
///
/// Clones of a [MemoryDocument] share the same local view, so a change made
/// through one of its [MemorySubject]s is visible to all of them.
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    pod: MemoryPod,
    reference: Reference,
    local: Arc<RwLock<LocalDocument>>,
}

impl MemoryDocument {
    /// The triples in the local view of this Document
    pub fn triples(&self) -> Vec<Triple> {
        self.local.read().triples.clone()
    }

    fn reload(&self) -> Result<Self, PodError> {
        let triples = self
            .pod
            .triples(&self.reference)
            .ok_or_else(|| PodError::NotFound {
                reference: self.reference.clone(),
            })?;
        Ok(self.pod.document(self.reference.clone(), triples, true))
    }
}

#[async_trait]
impl PodDocument for MemoryDocument {
    type Subject = MemorySubject;

    fn reference(&self) -> Reference {
        self.reference.clone()
    }

    fn acl_ref(&self) -> Option<Reference> {
        self.pod
            .acl_links
            .then(|| Reference::new(format!("{}.acl", self.reference)))
    }

    fn subject(&self, reference: &Reference) -> Self::Subject {
        MemorySubject {
            document: self.clone(),
            reference: reference.clone(),
        }
    }

    fn get_subject(&self, reference: &Reference) -> Option<Self::Subject> {
        let known = self
            .local
            .read()
            .triples
            .iter()
            .any(|triple| &triple.subject == reference);
        known.then(|| self.subject(reference))
    }

    fn find_subjects(&self, predicate: &Reference, object: &Reference) -> Vec<Self::Subject> {
        let mut found: Vec<Reference> = Vec::new();
        for triple in self.local.read().triples.iter() {
            if &triple.predicate == predicate
                && &triple.object == object
                && !found.contains(&triple.subject)
            {
                found.push(triple.subject.clone());
            }
        }
        found
            .iter()
            .map(|reference| self.subject(reference))
            .collect()
    }

    fn add_subject(&self, identifier: Option<&str>) -> Self::Subject {
        let identifier = match identifier {
            Some(identifier) => identifier.to_string(),
            None => Ulid::new().to_string().to_lowercase(),
        };
        self.subject(&Reference::new(format!("{}#{identifier}", self.reference)))
    }

    async fn save(&self) -> Result<Self, PodError> {
        let triples = self.local.read().triples.clone();
        self.pod.state.write().store(self.reference.clone(), triples);
        self.local.write().saved = true;
        self.reload()
    }

    async fn save_subjects(&self, subjects: &[Self::Subject]) -> Result<Self, PodError> {
        let saving: BTreeSet<Reference> = subjects
            .iter()
            .map(|subject| subject.reference.clone())
            .collect();
        let local: Vec<Triple> = self
            .local
            .read()
            .triples
            .iter()
            .filter(|triple| saving.contains(&triple.subject))
            .cloned()
            .collect();

        {
            let mut state = self.pod.state.write();
            let mut triples: Vec<Triple> = state
                .documents
                .get(&self.reference)
                .map(|triples| {
                    triples
                        .iter()
                        .filter(|triple| !saving.contains(&triple.subject))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            triples.extend(local);
            state.store(self.reference.clone(), triples);
        }

        self.local.write().saved = true;
        self.reload()
    }

    fn is_saved_to_pod(&self) -> bool {
        self.local.read().saved
    }
}

/// A Subject handed out by a [MemoryDocument]
#[derive(Clone, Debug)]
pub struct MemorySubject {
    document: MemoryDocument,
    reference: Reference,
}

impl PodSubject for MemorySubject {
    type Document = MemoryDocument;

    fn reference(&self) -> Reference {
        self.reference.clone()
    }

    fn get_ref(&self, predicate: &Reference) -> Option<Reference> {
        self.document
            .local
            .read()
            .triples
            .iter()
            .find(|triple| triple.subject == self.reference && &triple.predicate == predicate)
            .map(|triple| triple.object.clone())
    }

    fn get_all_refs(&self, predicate: &Reference) -> Vec<Reference> {
        self.document
            .local
            .read()
            .triples
            .iter()
            .filter(|triple| triple.subject == self.reference && &triple.predicate == predicate)
            .map(|triple| triple.object.clone())
            .collect()
    }

    fn set_ref(&self, predicate: &Reference, object: &Reference) {
        let mut local = self.document.local.write();
        local
            .triples
            .retain(|triple| !(triple.subject == self.reference && &triple.predicate == predicate));
        local
            .triples
            .push(Triple::new(&self.reference, predicate, object));
    }

    fn add_ref(&self, predicate: &Reference, object: &Reference) {
        let triple = Triple::new(&self.reference, predicate, object);
        let mut local = self.document.local.write();
        if !local.triples.contains(&triple) {
            local.triples.push(triple);
        }
    }

    fn remove_ref(&self, predicate: &Reference, object: &Reference) {
        let triple = Triple::new(&self.reference, predicate, object);
        self.document
            .local
            .write()
            .triples
            .retain(|existing| existing != &triple);
    }

    fn document(&self) -> Self::Document {
        self.document.clone()
    }
}
