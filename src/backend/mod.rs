pub mod edit;
pub mod rewrite;
