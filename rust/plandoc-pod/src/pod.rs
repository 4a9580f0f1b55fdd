use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::{PodError, Reference};

/// A [Pod] is a facade over a store of RDF documents that can be fetched and
/// created by [Reference]
#[async_trait]
pub trait Pod: Clone + Debug + Send + Sync + 'static {
    /// The Document handle produced by this [Pod]
    type Document: PodDocument;
    /// The client used for raw HTTP requests against this [Pod]
    type Client: HttpClient;

    /// Fetch the Document that contains `reference`
    ///
    /// Any fragment on `reference` is ignored. Fails if the resource does not
    /// exist or cannot be reached.
    async fn fetch_document(&self, reference: &Reference) -> Result<Self::Document, PodError>;

    /// Construct a new, unsaved Document that will live at `reference`
    fn create_document(&self, reference: &Reference) -> Self::Document;

    /// Construct a new, unsaved Document with a generated name inside the
    /// given Container
    fn create_document_in_container(&self, container: &Reference) -> Self::Document;

    /// The client used for raw HTTP requests
    fn client(&self) -> &Self::Client;
}

/// A handle to an RDF document, holding a local view of its triples
///
/// Changes made through the [PodSubject]s of a document are only written to
/// the [Pod] once the document is saved.
#[async_trait]
pub trait PodDocument: Clone + Send + Sync + 'static {
    /// The Subject handle produced by this document
    type Subject: PodSubject<Document = Self>;

    /// The [Reference] of this document
    fn reference(&self) -> Reference;

    /// Where the Access Control List of this document lives, if the [Pod]
    /// advertised one
    fn acl_ref(&self) -> Option<Reference>;

    /// A handle to the Subject at `reference`, whether or not the document
    /// holds any triples about it yet
    fn subject(&self, reference: &Reference) -> Self::Subject;

    /// The Subject at `reference`, if the document holds any triples about it
    fn get_subject(&self, reference: &Reference) -> Option<Self::Subject>;

    /// All Subjects that have `object` as a value for `predicate`
    fn find_subjects(&self, predicate: &Reference, object: &Reference) -> Vec<Self::Subject>;

    /// Add a new Subject to this document
    ///
    /// When no `identifier` is given, one is generated. The Subject's
    /// [Reference] is the document's with the identifier as fragment.
    fn add_subject(&self, identifier: Option<&str>) -> Self::Subject;

    /// Write every local change to the [Pod], returning a handle that
    /// reflects the saved state
    async fn save(&self) -> Result<Self, PodError>;

    /// Write the local changes to the given Subjects to the [Pod], returning
    /// a handle that reflects the saved state
    async fn save_subjects(&self, subjects: &[Self::Subject]) -> Result<Self, PodError>;

    /// Whether this document is known to exist on the [Pod] (as opposed to
    /// having only been constructed locally)
    fn is_saved_to_pod(&self) -> bool;
}

/// A handle to a Subject within a [PodDocument]
pub trait PodSubject: Clone + Send + Sync + 'static {
    /// The Document handle this Subject belongs to
    type Document: PodDocument<Subject = Self>;

    /// The [Reference] of this Subject
    fn reference(&self) -> Reference;

    /// A single value of `predicate` on this Subject, if any
    fn get_ref(&self, predicate: &Reference) -> Option<Reference>;

    /// Every value of `predicate` on this Subject
    fn get_all_refs(&self, predicate: &Reference) -> Vec<Reference>;

    /// Replace every value of `predicate` with `object`
    fn set_ref(&self, predicate: &Reference, object: &Reference);

    /// Add `object` as a value of `predicate`, keeping existing values
    fn add_ref(&self, predicate: &Reference, object: &Reference);

    /// Remove `object` as a value of `predicate`
    fn remove_ref(&self, predicate: &Reference, object: &Reference);

    /// The document this Subject belongs to
    fn document(&self) -> Self::Document;
}

/// A client capable of issuing a bare HTTP request against a Pod
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a request with the given `method` to `url`, returning the status
    /// the server responded with
    async fn fetch(&self, url: &Reference, method: Method) -> Result<StatusCode, PodError>;
}

/// The Subject handle produced by a [Pod]'s Documents
pub type SubjectOf<P> = <<P as Pod>::Document as PodDocument>::Subject;
