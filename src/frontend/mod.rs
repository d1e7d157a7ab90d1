pub mod ast;
pub mod literal;
pub mod parser;
pub mod span;
pub mod token;
