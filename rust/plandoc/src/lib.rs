#![warn(missing_docs)]

//! Plandoc lets you describe where Documents, Subjects and Containers live in
//! a Pod (and how to create them if they do not exist yet) without doing any
//! I/O, and resolve those descriptions later.
//!
//! A description is a handle such as [VirtualDocument] or [VirtualSubject].
//! Handles nest: a Document can be described as the one a Subject refers to,
//! which in turn can be described as the one in another Document that has a
//! given type. A [Resolver] walks such a chain, fetching (and where asked,
//! creating and granting access to) whatever it needs along the way.
//!
//! Every handle memoizes its own resolution. Resolving a handle (or a clone
//! of it) again, even while the first resolution is still in flight, never
//! repeats the work. Handles built separately never share a resolution, even
//! if they describe the same resource.
//!
//! ```rust
//! use plandoc::{Resolver, VirtualContainer, VirtualDocument, VirtualSubject, ConfiguresAcl};
//! use plandoc_pod::{MemoryPod, PodDocument, Triple, vocab};
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
//! let profile = VirtualDocument::found_at("https://some.pod/profile.ttl");
//! let me = VirtualSubject::found_in(&profile).with_ref(vocab::RDF_TYPE, vocab::FOAF_AGENT);
//! let root = VirtualContainer::found_at("https://some.pod/");
//! let notes = VirtualDocument::ensured_on(
//!     &me,
//!     "https://vocab.example/notes",
//!     &VirtualContainer::contained_in(&root, "notes"),
//! )
//! .is_readable_by_everyone();
//!
//! let resolver = Resolver::new(pod);
//! let notes = resolver.resolve_document(&notes).await?.expect("notes were created");
//!
//! assert!(notes.reference().as_str().starts_with("https://some.pod/notes/"));
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod memo;
pub use memo::*;

mod descriptor;
pub use descriptor::*;

mod acl;
pub use acl::*;

mod resolver;
pub use resolver::*;

mod serialise;
pub use serialise::*;
