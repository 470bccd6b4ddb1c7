//! Error taxonomy for the resolution engine.
//!
//! Four kinds, matching the container's error taxonomy: a name could not be
//! looked up, an abstract type had no way to become concrete, a slot could
//! not be written, or a configuration document was malformed. No rollback
//! of partially-built peers is attempted anywhere in this crate; see
//! [`ResolveError`] docs for why.

use std::fmt;

/// Chain of concrete type names currently being resolved, carried by
/// [`ResolveError::CyclicNonSharedDependency`] to show which types formed
/// the cycle.
#[derive(Debug, Clone, Default)]
pub struct ResolutionChain(Vec<&'static str>);

impl ResolutionChain {
    pub(crate) fn from_names(names: Vec<&'static str>) -> Self {
        Self(names)
    }

    pub(crate) fn render(&self) -> String {
        self.0.join(" -> ")
    }
}

impl fmt::Display for ResolutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Errors raised while resolving, injecting, or looking up a component.
///
/// Assembly is single-pass: when one of these propagates out of a `resolve`
/// or `load` call, any non-shared peers already constructed earlier in the
/// same call are simply dropped along with the stack frame that held them.
/// A shared instance already published into the container's cache (the
/// publish-before-construct step) is *not* rolled back even if a later step
/// fails — it stays in the cache as-is. This is an accepted limitation, not
/// an oversight.
#[derive(Debug)]
pub enum ResolveError {
    /// A textual component or capability name could not be resolved under
    /// its configured root.
    TypeNotFound {
        /// The root-qualified name that was looked up.
        qualified_name: String,
    },
    /// An abstract capability was requested with neither an override nor a
    /// default implementation registered.
    UnresolvableAbstract {
        /// `std::any::type_name` of the capability trait object.
        capability: &'static str,
    },
    /// A dependency slot could not be filled.
    InjectionFailure {
        /// The concrete type whose slot failed.
        owner: &'static str,
        /// The slot's field name.
        slot: &'static str,
        /// What went wrong resolving the slot's value.
        source: Box<ResolveError>,
    },
    /// A non-shared dependency cycle was detected while injecting slots.
    ///
    /// Circular resolution among non-shared components is out of scope
    /// (see the spec's non-goals); this variant turns what would otherwise
    /// be unbounded recursion into a clear, immediate error.
    CyclicNonSharedDependency {
        /// The chain of concrete types being resolved, oldest first.
        chain: ResolutionChain,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNotFound { qualified_name } => {
                write!(f, "no component registered under name `{qualified_name}`")
            }
            Self::UnresolvableAbstract { capability } => {
                write!(
                    f,
                    "capability `{capability}` has neither an override nor a default implementation"
                )
            }
            Self::InjectionFailure { owner, slot, source } => {
                write!(f, "failed to inject slot `{owner}::{slot}`: {source}")
            }
            Self::CyclicNonSharedDependency { chain } => {
                write!(
                    f,
                    "cyclic dependency among non-shared components: {chain} (cycles are only supported between `shared` components)"
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InjectionFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while loading a declarative configuration document.
///
/// Malformed documents cause the loader to report "nothing loaded" rather
/// than partial load, per the container's propagation policy: overrides
/// already applied before a parse error are left registered (the loader
/// only refuses to instantiate components), and it is the host's
/// responsibility to revert them if that matters for a given caller.
#[derive(Debug)]
pub enum ConfigError {
    /// The document could not be parsed into directives at all.
    ParseError {
        /// Description of what failed, from the underlying format parser.
        detail: String,
    },
    /// A directive referenced a component or capability that resolved, but
    /// the resolution itself failed.
    Directive(ResolveError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError { detail } => write!(f, "malformed configuration document: {detail}"),
            Self::Directive(err) => write!(f, "directive failed: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Directive(err) => Some(err),
            Self::ParseError { .. } => None,
        }
    }
}

impl From<ResolveError> for ConfigError {
    fn from(err: ResolveError) -> Self {
        Self::Directive(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_not_found_display() {
        let err = ResolveError::TypeNotFound {
            qualified_name: "services.Locator".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "no component registered under name `services.Locator`"
        );
    }

    #[test]
    fn injection_failure_wraps_source() {
        let inner = ResolveError::UnresolvableAbstract { capability: "Clock" };
        let err = ResolveError::InjectionFailure {
            owner: "Locator",
            slot: "clock",
            source: Box::new(inner),
        };
        assert!(format!("{err}").contains("Locator::clock"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_parse_error_has_no_source() {
        let err = ConfigError::ParseError {
            detail: "unexpected token".to_string(),
        };
        assert!(std::error::Error::source(&err).is_none());
    }
}
