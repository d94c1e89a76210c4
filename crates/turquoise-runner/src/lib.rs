pub mod runner;

pub use runner::BoardRunner;
