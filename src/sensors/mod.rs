pub mod client;
pub mod service;

pub use client::{LevelSource, PollError, SensorClient};
pub use service::{next_tick_after, Poller};
