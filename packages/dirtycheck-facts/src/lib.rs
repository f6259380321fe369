//! Persisted effect facts
//!
//! One analyzer pass over a package publishes the computed effects of that
//! package's functions as *facts*; later passes over dependent packages read
//! them back to resolve cross-package calls. This crate holds the fact
//! values, the `FactStore` port a driver implements, and an in-memory store
//! used by tests and simple drivers.
//!
//! Facts are plain values: the analyzer never holds driver-owned memory
//! across passes.

pub mod domain;
pub mod error;

pub use domain::{FactStore, FunctionEffectsFact, MemoryFactStore, PackageEffectsFact};
pub use error::{ErrorKind, FactError, Result};
