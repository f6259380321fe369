/// Annotation language: effect labels, sets, expressions, lexer, parser
pub mod annotation;

/// Effect inference and checking over the package call graph
pub mod effect_analysis;

/// Side-channel effect inputs: external registry, generated-query map
pub mod registry;
