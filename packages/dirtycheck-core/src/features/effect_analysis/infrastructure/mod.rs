mod call_graph_builder;
mod checker;
mod collector;
mod cross_package;
mod propagator;
mod reporter;

pub use call_graph_builder::{build_call_graph, PendingCrossCall};
pub use checker::check_effects;
pub use collector::collect_functions;
pub use cross_package::{resolve_cross_package_calls, CrossPackageResolver};
pub use propagator::propagate_effects;
pub use reporter::{build_propagation_path, EffectViolation, PropagationStep};
