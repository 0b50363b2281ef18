pub mod grading;
pub mod output;
pub mod store;
