pub mod booking;

pub use booking::{AxisConfig, Config, HistConfig};
