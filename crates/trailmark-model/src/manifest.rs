//! Route manifest: the catalogue of fetchable routes

use serde::{Deserialize, Serialize};

/// One selectable route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route id, used for storage keys and links
    pub id: String,
    /// Display name
    pub name: String,
    /// File name relative to the data root
    pub file: String,
}

/// Ordered list of routes plus the default selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Routes in display order
    pub routes: Vec<RouteEntry>,
    /// Id selected when nothing else applies
    pub default: String,
}

impl RouteManifest {
    /// Parse manifest JSON text
    ///
    /// # Errors
    /// Returns the serde error for malformed or mis-shaped text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Entry with exactly this id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// Entry for `id`, falling back to the default route
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&RouteEntry> {
        self.get(id).or_else(|| self.get(&self.default))
    }

    /// Pick the starting route: link parameter, then last used, then default
    #[must_use]
    pub fn starting_route<'a>(
        &'a self,
        link_param: Option<&'a str>,
        last_used: Option<&'a str>,
    ) -> &'a str {
        link_param
            .filter(|s| !s.is_empty())
            .or(last_used.filter(|s| !s.is_empty()))
            .unwrap_or(self.default.as_str())
    }
}
