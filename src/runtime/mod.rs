//! Runtime system
//!
//! Values and the interpreter that evaluates programs over them.

pub mod interpreter;
pub mod value;
