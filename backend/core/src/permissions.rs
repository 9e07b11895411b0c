//! Permission keys and the catalog the extension contributes to.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::Authorizer;
use crate::types::ViewerContext;

/// May see the activity block.
pub const PERM_VIEW_STATS: &str = "u_a24hrs_view";
/// Any administrative permission.
pub const PERM_ADMIN: &str = "a_";
/// May follow profile links.
pub const PERM_VIEW_PROFILE: &str = "u_viewprofile";
/// May see hidden online users.
pub const PERM_VIEW_ONLINE: &str = "u_viewonline";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Language key describing the permission in the admin panel.
    pub lang: String,
    /// Category tab the permission is listed under.
    pub cat: String,
}

/// The host's permission catalog, keyed by permission identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    entries: BTreeMap<String, PermissionEntry>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, lang: impl Into<String>, cat: impl Into<String>) {
        let key = key.into();
        debug!(permission = %key, "Registering permission");
        self.entries.insert(
            key,
            PermissionEntry {
                lang: lang.into(),
                cat: cat.into(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&PermissionEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PermissionEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Authorizer backed by a fixed set of granted keys.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    granted: HashSet<String>,
}

impl StaticAuthorizer {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn acl_get(&self, key: &str) -> bool {
        self.granted.contains(key)
    }
}

impl ViewerContext {
    /// Resolve every permission the activity block looks at, once per request.
    pub fn resolve(auth: &dyn Authorizer, user_id: i64) -> Self {
        Self {
            user_id,
            can_view_stats: auth.acl_get(PERM_VIEW_STATS),
            is_admin: auth.acl_get(PERM_ADMIN),
            can_view_online: auth.acl_get(PERM_VIEW_ONLINE),
            can_view_profile: auth.acl_get(PERM_VIEW_PROFILE),
        }
    }
}
