mod effect_set;
mod expr;
mod label;

pub use effect_set::EffectSet;
pub use expr::{EffectExpr, EffectResolver, EvalError};
pub use label::EffectLabel;
