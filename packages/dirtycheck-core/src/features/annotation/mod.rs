/// Annotation Language Feature
///
/// The small expression language carried in `// dirty:` documentation
/// comments: effect labels (`select[users]`), set literals
/// (`{ a | b }`), parenthesized unions, and named references.
///
/// - **domain**: labels, sets, the expression tree, the resolver port
/// - **infrastructure**: lexer and recursive-descent parser, plus the
///   lenient annotation entry point used by the collector and registry
pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
