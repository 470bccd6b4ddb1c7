//! Declarative JSON configuration for a [`Container`].
//!
//! A document has three optional sections, applied in a fixed order:
//! `overrides` (install capability overrides), then `services` and
//! `plugins` (each names components to build and retain). `services` and
//! `plugins` are resolved through the identical code path — the two buckets
//! exist only for the document author's organizational clarity, never as a
//! distinction the resolver observes. JSON was chosen over XML or TOML
//! purely to reuse the `serde`/`serde_json` dependency every crate in this
//! workspace already carries, rather than add a new parsing dependency for
//! one loader.
//!
//! ```json
//! {
//!   "overrides": [ { "capability": "Clock", "component": "FixedClock" } ],
//!   "services": [ { "component": "MetricsReporter" } ],
//!   "plugins": [ { "component": "AuditTrail" } ]
//! }
//! ```

use componentry_core::{Container, ConfigError, ResolveError};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    overrides: Vec<OverrideDirective>,
    #[serde(default)]
    services: Vec<ComponentDirective>,
    #[serde(default)]
    plugins: Vec<ComponentDirective>,
}

#[derive(Debug, Deserialize)]
struct OverrideDirective {
    capability: String,
    component: String,
}

#[derive(Debug, Deserialize)]
struct ComponentDirective {
    component: String,
}

fn binding_not_found(capability: &str, component: &str) -> ConfigError {
    ConfigError::from(ResolveError::TypeNotFound {
        qualified_name: format!("{capability}::{component}"),
    })
}

/// Applies a parsed document's directives to `container`.
pub struct Loader;

impl Loader {
    /// Parses `json` and applies every directive to `container`: overrides
    /// first, then every `services`/`plugins` entry in source order within
    /// its own bucket.
    ///
    /// Returns `Ok(true)` if at least one directive was applied, `Ok(false)`
    /// for a syntactically valid but entirely empty document. A malformed
    /// document or a directive naming an unregistered capability/component
    /// is reported as `Err` with nothing further applied from that
    /// directive onward; directives already applied earlier in the same
    /// document are not rolled back.
    pub fn load_document(container: &Container, json: &str) -> Result<bool, ConfigError> {
        let document: Document =
            serde_json::from_str(json).map_err(|source| ConfigError::ParseError { detail: source.to_string() })?;

        let mut applied = false;

        for directive in &document.overrides {
            let binding = componentry_core::registry()
                .binding(&directive.capability, &directive.component)
                .ok_or_else(|| binding_not_found(&directive.capability, &directive.component))?;
            container.apply_override_binding(binding);
            applied = true;
        }

        for directive in document.services.iter().chain(&document.plugins) {
            container.retain_by_name(&directive.component).map_err(ConfigError::from)?;
            applied = true;
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_applies_nothing() {
        let container = Container::new();
        let applied = Loader::load_document(&container, "{}").unwrap();
        assert!(!applied);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let container = Container::new();
        let err = Loader::load_document(&container, "not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn override_directive_naming_an_unregistered_pair_fails() {
        let container = Container::new();
        let json = r#"{"overrides": [{"capability": "Clock", "component": "NoSuchClock"}]}"#;
        let err = Loader::load_document(&container, json).unwrap_err();
        assert!(matches!(err, ConfigError::Directive(ResolveError::TypeNotFound { .. })));
    }
}
