//! stormgrid: paint conductors, insulators and clouds on a grid and watch
//! randomized discharges find their way to ground.

pub mod config;
pub mod display;
pub mod render;
pub mod storm;
pub mod util;

pub use config::{ConfigError, StormConfig};
pub use render::StormView;
pub use storm::Storm;
