use std::collections::BTreeMap;

use plandoc_pod::{Reference, vocab};
use serde::{Deserialize, Serialize};

/// A kind of access an authorization rule can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessMode {
    /// `acl:Read`
    Read,
    /// `acl:Append`
    Append,
    /// `acl:Write`
    Write,
    /// `acl:Control`
    Control,
}

impl AccessMode {
    /// Every [AccessMode], in the order rules are written
    pub const ALL: [AccessMode; 4] = [Self::Read, Self::Append, Self::Write, Self::Control];

    /// The IRI of this mode in the ACL vocabulary
    pub fn iri(self) -> &'static str {
        match self {
            Self::Read => vocab::ACL_READ,
            Self::Append => vocab::ACL_APPEND,
            Self::Write => vocab::ACL_WRITE,
            Self::Control => vocab::ACL_CONTROL,
        }
    }
}

/// Which [AccessMode]s to grant (`true`) or revoke (`false`)
///
/// Modes that are `None` are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessModes {
    /// Grant or revoke [AccessMode::Read]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    /// Grant or revoke [AccessMode::Append]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    /// Grant or revoke [AccessMode::Write]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<bool>,
    /// Grant or revoke [AccessMode::Control]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<bool>,
}

impl AccessModes {
    /// Whether `mode` is to be granted, revoked or left alone
    pub fn get(&self, mode: AccessMode) -> Option<bool> {
        match mode {
            AccessMode::Read => self.read,
            AccessMode::Append => self.append,
            AccessMode::Write => self.write,
            AccessMode::Control => self.control,
        }
    }

    /// Grant (`true`) or revoke (`false`) `mode`
    pub fn with(mut self, mode: AccessMode, allowed: bool) -> Self {
        let slot = match mode {
            AccessMode::Read => &mut self.read,
            AccessMode::Append => &mut self.append,
            AccessMode::Write => &mut self.write,
            AccessMode::Control => &mut self.control,
        };
        *slot = Some(allowed);
        self
    }
}

/// Access to grant (or revoke) on a resource, per identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclSettings {
    /// Access for everyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<AccessModes>,
    /// Access per agent (WebID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<BTreeMap<Reference, AccessModes>>,
    /// Access per agent, when using an app served from a given origin; keyed
    /// by origin, then by agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origins: Option<BTreeMap<Reference, BTreeMap<Reference, AccessModes>>>,
}

macro_rules! access_setters {
    ($mode:ident, $everyone:ident, $not_everyone:ident, $agent:ident, $not_agent:ident, $origin:ident, $not_origin:ident) => {
        #[doc = concat!("Grant [AccessMode::", stringify!($mode), "] to everyone")]
        pub fn $everyone(self) -> Self {
            self.with_public_mode(AccessMode::$mode, true)
        }

        #[doc = concat!("Revoke [AccessMode::", stringify!($mode), "] from everyone")]
        pub fn $not_everyone(self) -> Self {
            self.with_public_mode(AccessMode::$mode, false)
        }

        #[doc = concat!("Grant [AccessMode::", stringify!($mode), "] to `agent`")]
        pub fn $agent(self, agent: impl Into<Reference>) -> Self {
            self.with_agent_mode(agent, AccessMode::$mode, true)
        }

        #[doc = concat!("Revoke [AccessMode::", stringify!($mode), "] from `agent`")]
        pub fn $not_agent(self, agent: impl Into<Reference>) -> Self {
            self.with_agent_mode(agent, AccessMode::$mode, false)
        }

        #[doc = concat!(
            "Grant [AccessMode::", stringify!($mode),
            "] to `agent` when using an app served from `origin`"
        )]
        pub fn $origin(self, origin: impl Into<Reference>, agent: impl Into<Reference>) -> Self {
            self.with_origin_mode(origin, agent, AccessMode::$mode, true)
        }

        #[doc = concat!(
            "Revoke [AccessMode::", stringify!($mode),
            "] from `agent` when using an app served from `origin`"
        )]
        pub fn $not_origin(self, origin: impl Into<Reference>, agent: impl Into<Reference>) -> Self {
            self.with_origin_mode(origin, agent, AccessMode::$mode, false)
        }
    };
}

impl AclSettings {
    /// Whether there is anything to write to an Access Control List
    pub fn has_acl_settings(&self) -> bool {
        self.public.is_some() || self.agents.is_some() || self.origins.is_some()
    }

    /// Grant (`true`) or revoke (`false`) `mode` for everyone, keeping the
    /// other public modes
    pub fn with_public_mode(mut self, mode: AccessMode, allowed: bool) -> Self {
        let modes = self.public.unwrap_or_default();
        self.public = Some(modes.with(mode, allowed));
        self
    }

    /// Grant (`true`) or revoke (`false`) `mode` for `agent`, keeping the
    /// agent's other modes
    pub fn with_agent_mode(
        mut self,
        agent: impl Into<Reference>,
        mode: AccessMode,
        allowed: bool,
    ) -> Self {
        let modes = self
            .agents
            .get_or_insert_with(BTreeMap::new)
            .entry(agent.into())
            .or_default();
        *modes = modes.with(mode, allowed);
        self
    }

    /// Grant (`true`) or revoke (`false`) `mode` for `agent` using an app
    /// served from `origin`, keeping the other modes of that pair
    pub fn with_origin_mode(
        mut self,
        origin: impl Into<Reference>,
        agent: impl Into<Reference>,
        mode: AccessMode,
        allowed: bool,
    ) -> Self {
        let modes = self
            .origins
            .get_or_insert_with(BTreeMap::new)
            .entry(origin.into())
            .or_default()
            .entry(agent.into())
            .or_default();
        *modes = modes.with(mode, allowed);
        self
    }

    access_setters!(
        Read,
        readable_by_everyone,
        not_readable_by_everyone,
        readable_by_agent,
        not_readable_by_agent,
        readable_by_origin,
        not_readable_by_origin
    );
    access_setters!(
        Append,
        appendable_by_everyone,
        not_appendable_by_everyone,
        appendable_by_agent,
        not_appendable_by_agent,
        appendable_by_origin,
        not_appendable_by_origin
    );
    access_setters!(
        Write,
        writable_by_everyone,
        not_writable_by_everyone,
        writable_by_agent,
        not_writable_by_agent,
        writable_by_origin,
        not_writable_by_origin
    );
    access_setters!(
        Control,
        controllable_by_everyone,
        not_controllable_by_everyone,
        controllable_by_agent,
        not_controllable_by_agent,
        controllable_by_origin,
        not_controllable_by_origin
    );
}

macro_rules! access_predicates {
    ($($predicate:ident => $setter:ident($($argument:ident),*)),* $(,)?) => {
        $(
            #[doc = concat!("A new handle that also applies [AclSettings::", stringify!($setter), "]")]
            fn $predicate(&self $(, $argument: impl Into<Reference>)*) -> Self {
                $(let $argument: Reference = $argument.into();)*
                self.with_acl(move |acl| acl.$setter($($argument),*))
            }
        )*
    };
}

/// Handles of resources that may be created, and so can carry the access to
/// grant on them once they are
///
/// Every method returns a new handle (with its own memoized resolution);
/// the original handle is left untouched. Handles whose descriptor never
/// creates anything return an unchanged copy.
pub trait ConfiguresAcl: Sized {
    /// A new handle whose [AclSettings] are the result of `configure`
    fn with_acl(&self, configure: impl FnOnce(AclSettings) -> AclSettings) -> Self;

    access_predicates!(
        is_readable_by_everyone => readable_by_everyone(),
        is_not_readable_by_everyone => not_readable_by_everyone(),
        is_readable_by_agent => readable_by_agent(agent),
        is_not_readable_by_agent => not_readable_by_agent(agent),
        is_readable_by_origin => readable_by_origin(origin, agent),
        is_not_readable_by_origin => not_readable_by_origin(origin, agent),
        is_appendable_by_everyone => appendable_by_everyone(),
        is_not_appendable_by_everyone => not_appendable_by_everyone(),
        is_appendable_by_agent => appendable_by_agent(agent),
        is_not_appendable_by_agent => not_appendable_by_agent(agent),
        is_appendable_by_origin => appendable_by_origin(origin, agent),
        is_not_appendable_by_origin => not_appendable_by_origin(origin, agent),
        is_writable_by_everyone => writable_by_everyone(),
        is_not_writable_by_everyone => not_writable_by_everyone(),
        is_writable_by_agent => writable_by_agent(agent),
        is_not_writable_by_agent => not_writable_by_agent(agent),
        is_writable_by_origin => writable_by_origin(origin, agent),
        is_not_writable_by_origin => not_writable_by_origin(origin, agent),
        is_controllable_by_everyone => controllable_by_everyone(),
        is_not_controllable_by_everyone => not_controllable_by_everyone(),
        is_controllable_by_agent => controllable_by_agent(agent),
        is_not_controllable_by_agent => not_controllable_by_agent(agent),
        is_controllable_by_origin => controllable_by_origin(origin, agent),
        is_not_controllable_by_origin => not_controllable_by_origin(origin, agent),
    );
}
