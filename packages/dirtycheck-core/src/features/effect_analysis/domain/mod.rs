mod call_graph;
mod function_record;

pub use call_graph::CallGraph;
pub use function_record::{CallSite, FunctionRecord};
