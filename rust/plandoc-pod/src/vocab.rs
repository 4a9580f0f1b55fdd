//! IRIs of the RDF vocabulary terms used when locating and provisioning
//! resources.

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// `acl:Authorization`, the class of an authorization rule
pub const ACL_AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
/// `acl:accessTo`, the resource an authorization rule applies to
pub const ACL_ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
/// `acl:agent`, a specific agent an authorization rule grants access to
pub const ACL_AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
/// `acl:agentClass`, a class of agents an authorization rule grants access to
pub const ACL_AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
/// `acl:origin`, the (web app) origin an authorization rule is limited to
pub const ACL_ORIGIN: &str = "http://www.w3.org/ns/auth/acl#origin";
/// `acl:mode`, an access mode granted by an authorization rule
pub const ACL_MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
/// `acl:default`, marks a rule on a Container as applying to its children
pub const ACL_DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";
/// `acl:defaultForNew`, the deprecated predecessor of [ACL_DEFAULT]; still
/// written because some servers only understand this one
pub const ACL_DEFAULT_FOR_NEW: &str = "http://www.w3.org/ns/auth/acl#defaultForNew";

/// `acl:Read`
pub const ACL_READ: &str = "http://www.w3.org/ns/auth/acl#Read";
/// `acl:Append`
pub const ACL_APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
/// `acl:Write`
pub const ACL_WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
/// `acl:Control`
pub const ACL_CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";

/// `foaf:Agent`, the class of all agents (i.e. everyone)
pub const FOAF_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";

/// `dct:references`, links a Document to the Subjects that were added to it
pub const DCT_REFERENCES: &str = "http://purl.org/dc/terms/references";
