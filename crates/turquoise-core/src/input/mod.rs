pub mod queue;
pub mod translator;
