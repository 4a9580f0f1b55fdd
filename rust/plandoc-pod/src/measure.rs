use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};

use crate::{HttpClient, Pod, PodError, Reference};

/// A call made to a [Pod] through a [MeasuredPod]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodCall {
    /// [Pod::fetch_document]
    FetchDocument(Reference),
    /// [Pod::create_document]
    CreateDocument(Reference),
    /// [Pod::create_document_in_container]
    CreateDocumentInContainer(Reference),
    /// [HttpClient::fetch]
    Http(Method, Reference),
}

/// A [MeasuredPod] acts as a proxy over a [Pod] implementation that records
/// every call made to it, in order.
#[derive(Clone, Debug)]
pub struct MeasuredPod<P>
where
    P: Pod,
{
    calls: Arc<Mutex<Vec<PodCall>>>,
    pod: P,
}

impl<P> MeasuredPod<P>
where
    P: Pod,
{
    /// Wrap the provided [Pod] so that calls to it may be measured
    pub fn new(pod: P) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            pod,
        }
    }

    /// The wrapped [Pod]
    pub fn inner(&self) -> &P {
        &self.pod
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<PodCall> {
        self.calls.lock().clone()
    }

    /// The aggregate number of Document fetches
    pub fn fetches(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PodCall::FetchDocument(_)))
            .count()
    }

    /// The number of fetches of the Document at `reference`
    pub fn fetches_of(&self, reference: &Reference) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, PodCall::FetchDocument(fetched) if fetched == reference))
            .count()
    }

    /// Forget every call recorded so far
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: PodCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl<P> Pod for MeasuredPod<P>
where
    P: Pod,
{
    type Document = P::Document;
    type Client = Self;

    async fn fetch_document(&self, reference: &Reference) -> Result<Self::Document, PodError> {
        self.record(PodCall::FetchDocument(reference.clone()));
        self.pod.fetch_document(reference).await
    }

    fn create_document(&self, reference: &Reference) -> Self::Document {
        self.record(PodCall::CreateDocument(reference.clone()));
        self.pod.create_document(reference)
    }

    fn create_document_in_container(&self, container: &Reference) -> Self::Document {
        self.record(PodCall::CreateDocumentInContainer(container.clone()));
        self.pod.create_document_in_container(container)
    }

    fn client(&self) -> &Self::Client {
        self
    }
}

#[async_trait]
impl<P> HttpClient for MeasuredPod<P>
where
    P: Pod,
{
    async fn fetch(&self, url: &Reference, method: Method) -> Result<StatusCode, PodError> {
        self.record(PodCall::Http(method.clone(), url.clone()));
        self.pod.client().fetch(url, method).await
    }
}
