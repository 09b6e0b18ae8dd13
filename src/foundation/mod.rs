pub mod core;
pub mod deadline;
pub mod error;
pub mod staged;
