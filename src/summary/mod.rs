pub mod lenient;
pub mod summary_model;
