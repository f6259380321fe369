/// Effect Analysis Feature
///
/// Infers each function's full effect set from its declarations and its
/// transitive callees, then checks every annotated function against what
/// it actually calls.
///
/// - **domain**: function records, the call graph, violation values
/// - **infrastructure**: collector, call-graph builder, cross-package
///   resolver, fixpoint propagator, checker, verbose reporter
/// - **application**: the pass orchestrator driving the phases in order
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::*;
pub use domain::*;
pub use infrastructure::*;
