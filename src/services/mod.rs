pub mod loader;
pub mod recommendation;
pub mod training;
