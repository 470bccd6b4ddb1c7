//! A dependency-injection runtime for plain Rust structs.
//!
//! `componentry` resolves a graph of `#[derive(Component)]` types against a
//! [`Container`]: each component declares its own dependency slots, the
//! container fills them (building fresh instances for ordinary components,
//! sharing one instance per `#[shared]` type, and substituting a registered
//! override or default implementation for abstract `#[capability]` slots),
//! and runs every matching hook once construction finishes.
//!
//! There is no reflective classpath scan behind this — every fact the
//! engine uses about a type is generated at macro-expansion time and
//! collected process-wide via `inventory`. See `componentry_core` for the
//! resolution engine itself and `componentry_macros` for the codegen.
//!
//! # Quick start
//!
//! ```ignore
//! use componentry::prelude::*;
//!
//! #[capability(default = SystemClock)]
//! pub trait Clock {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Component)]
//! #[implements(Clock)]
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 { 0 }
//! }
//!
//! #[derive(Component)]
//! struct ReportGenerator {
//!     #[dependency]
//!     clock: Dep<SystemClock>,
//! }
//!
//! fn main() {
//!     let container = Container::new();
//!     let generator: ReportGenerator = container.load().unwrap();
//!     let _ = generator.clock.now();
//! }
//! ```

pub use componentry_core as core;
pub use componentry_macros as macros;

#[cfg(feature = "config")]
pub use componentry_config as config;

pub use componentry_core::{
    ambient, clear_ambient, debug, set_ambient, CapabilityBinding, CapabilityDescriptor, CapabilityEntry,
    CapabilityFor, Component, ComponentRegistration, ConfigError, Construct, Container, Dep, Engine, InitializerIndex,
    LogConfig, LogEntry, LogLevel, Logger, NullSink, ResolutionChain, ResolveError, Sink, StderrSink, TypeRegistry,
};
pub use componentry_macros::{capability, Component as DeriveComponent};

#[cfg(feature = "config")]
pub use componentry_config::Loader;

/// Convenience imports for defining and wiring components.
pub mod prelude {
    pub use crate::{CapabilityFor, Component, Construct, Container, Dep, Engine, ResolveError};
    pub use componentry_macros::{capability, Component};

    #[cfg(feature = "config")]
    pub use crate::Loader;
}
