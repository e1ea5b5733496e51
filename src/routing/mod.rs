//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → router.rs (package lookup)
//!     → matcher.rs (evaluate mount and host conditions)
//!     → Return: matched PackageRegistration or NoMatch
//!
//! Route Compilation (at startup and on reload):
//!     PackageConfig[]
//!     → Provision registrations
//!     → Sort by specificity
//!     → Freeze as immutable PackageRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled ahead of time, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same package

pub mod matcher;
pub mod router;

pub use router::{PackageRouter, Route};
