//! Access Control List settings, and the service that writes them to a Pod.
//!
//! [AclSettings] are collected on the descriptors of resources that may be
//! created (see [ConfiguresAcl]); once such a resource has been created, the
//! [Resolver](crate::Resolver) hands them to an [AclService], which turns
//! them into authorization rules in the resource's Access Control List.

mod settings;
pub use settings::*;

mod service;
pub use service::*;
