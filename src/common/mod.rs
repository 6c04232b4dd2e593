pub mod labels;
pub mod matchers;
pub mod types;
