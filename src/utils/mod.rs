pub mod fast;
pub mod parallel;
