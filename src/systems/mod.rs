//! Systems module - ECS glue around the bullet core.

pub mod debug;
pub mod simulate;
pub mod spawn;
