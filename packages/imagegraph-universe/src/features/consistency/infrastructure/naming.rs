//! Build-time namespace detection
//!
//! Elements from the image builder's own namespaces must never be reachable
//! at run time. A qualified name leaks when its lowercase form contains a
//! marker and it does not start with one of that marker's exempt prefixes.

use crate::config::NamespaceMarker;

#[derive(Debug, Clone)]
pub struct NamingConventions {
    markers: Vec<NamespaceMarker>,
}

impl NamingConventions {
    pub fn new(markers: Vec<NamespaceMarker>) -> Self {
        Self { markers }
    }

    /// First marker `name` leaks through, if any
    pub fn leaked_marker(&self, name: &str) -> Option<&NamespaceMarker> {
        let lname = name.to_lowercase();
        self.markers.iter().find(|m| {
            lname.contains(&m.marker) && !m.exempt_prefixes.iter().any(|p| name.starts_with(p.as_str()))
        })
    }

    pub fn is_leak(&self, name: &str) -> bool {
        self.leaked_marker(name).is_some()
    }

    pub fn message(name: &str) -> String {
        format!("Hosted element used at run time: {}", name)
    }
}
