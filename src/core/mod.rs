// Engine-independent building blocks: scene hierarchy and math helpers

pub mod hierarchy;
pub mod math;
