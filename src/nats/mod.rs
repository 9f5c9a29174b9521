pub mod client;

pub use client::{MessageBus, NatsBus};
