#![forbid(unsafe_code)]

pub mod combo;
pub mod error;
pub mod generator;
pub mod model;
pub mod rng;
pub mod scoring;
pub mod time;
pub mod timer;

pub use error::Error;
pub use time::Clock;
