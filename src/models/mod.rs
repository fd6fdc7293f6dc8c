pub mod project;
pub mod stage;

pub use project::*;
pub use stage::*;
