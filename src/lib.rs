pub mod clock;
pub mod config;
pub mod day;
pub mod logging;
pub mod render;
pub mod rng;
pub mod simulator;
pub mod theme;
pub mod ticker;
pub mod weather;
pub mod web;

pub use config::{Config, ConfigLoader};
pub use simulator::{DayCycle, Frame};
pub use ticker::{Ticker, TickerHandle};
