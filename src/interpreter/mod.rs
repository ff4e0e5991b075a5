pub mod builtin;
pub mod environment;
pub mod evaluator;
pub mod macro_expansion;
pub mod object;
