//! Test fixtures shared across modules.

use crate::sources::{AppSource, DiscoveredApp, SourceKind};

pub fn discovered(name: &str, source: SourceKind) -> DiscoveredApp {
    DiscoveredApp {
        name: name.to_string(),
        command: name.to_lowercase(),
        icon: Some(name.to_lowercase()),
        source,
    }
}

/// In-memory source with a fixed app list.
pub struct StaticSource {
    kind: SourceKind,
    apps: Vec<DiscoveredApp>,
}

impl StaticSource {
    pub fn new(kind: SourceKind, names: &[&str]) -> Self {
        Self {
            kind,
            apps: names.iter().map(|n| discovered(n, kind)).collect(),
        }
    }
}

impl AppSource for StaticSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn discover(&self) -> Vec<DiscoveredApp> {
        self.apps.clone()
    }
}
