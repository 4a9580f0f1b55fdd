#![warn(missing_docs)]

//! This crate contains the interfaces that the `plandoc` resolvers expect
//! from a Pod: a per-user, HTTP-addressable store of RDF documents arranged
//! in containers.
//!
//! A [Pod] hands out [PodDocument] handles, which in turn hand out
//! [PodSubject] handles. Mutations on a subject are local to the document
//! handle until the document is saved. An [HttpClient] is available for the
//! raw requests that have no document-level counterpart (such as `DELETE`).
//!
//! Two implementations ship with this crate:
//!
//! - [MemoryPod], which keeps every document in memory and is suitable for
//!   tests and local experimentation
//! - [MeasuredPod], a proxy that records every call made to the [Pod] it
//!   wraps
//!
//! [RestClient] is an [HttpClient] that talks to a real server via
//! `reqwest`.
//!
//! ```rust
//! use plandoc_pod::{MemoryPod, Pod, PodDocument, PodSubject, Reference, Triple, vocab};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pod = MemoryPod::new();
//! pod.insert_document(
//!     "https://some.pod/profile.ttl",
//!     [Triple::new(
//!         "https://some.pod/profile.ttl#me",
//!         vocab::RDF_TYPE,
//!         vocab::FOAF_AGENT,
//!     )],
//! );
//!
//! let me = Reference::new("https://some.pod/profile.ttl#me");
//! let document = pod.fetch_document(&me).await?;
//! let subject = document.subject(&me);
//!
//! assert_eq!(
//!     subject.get_ref(&Reference::new(vocab::RDF_TYPE)),
//!     Some(Reference::new(vocab::FOAF_AGENT))
//! );
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod reference;
pub use reference::*;

mod pod;
pub use pod::*;

mod memory;
pub use memory::*;

mod measure;
pub use measure::*;

mod rest;
pub use rest::*;

pub mod vocab;
