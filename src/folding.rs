pub mod chunks;
pub mod phase;
