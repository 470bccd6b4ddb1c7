//! Core resolution engine for the componentry dependency-injection runtime.
//!
//! This crate has no macros of its own — `componentry-macros` generates the
//! glue code (`Component` impls, capability trampolines, `inventory`
//! registrations) that calls into the types here. Most applications depend
//! on the `componentry` facade crate instead of this one directly.

mod component;
mod container;
mod engine;
mod error;
mod initializers;
mod log;
mod overrides;
mod registry;

pub mod debug;

// Re-exported so `componentry-macros`-generated code can write
// `$crate_root::inventory::submit! { .. }` without every downstream crate
// needing its own direct dependency on `inventory`.
pub use inventory;

pub use component::{
    CapabilityBinding, CapabilityDescriptor, CapabilityEntry, CapabilityFor, Component, ComponentRegistration,
    Construct, Dep,
};
pub use container::{ambient, clear_ambient, set_ambient, Container};
pub use engine::Engine;
pub use error::{ConfigError, ResolutionChain, ResolveError};
pub use initializers::InitializerIndex;
pub use log::{AutoSpan, LogConfig, LogEntry, LogLevel, Logger, NullSink, Sink, Span, StderrSink};
pub use overrides::{DefaultImplTable, OverrideTable};
pub use registry::{global as registry, TypeRegistry};
