//! Layout planning: industry templates, the plan model, and the strategist that refines them.

pub mod copy;
pub mod model;
pub mod strategist;
pub mod templates;
