pub mod config;
pub mod repl;

pub use self::{
    config::{Config, Mode},
    repl::{eval_line, start, Engine},
};
