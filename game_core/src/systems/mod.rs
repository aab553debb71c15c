pub mod collision;
pub mod cooldown;
pub mod movement;
pub mod scoring;

pub use collision::*;
pub use cooldown::*;
pub use movement::*;
pub use scoring::*;
