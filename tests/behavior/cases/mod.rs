pub mod runner;
pub mod ticker;
