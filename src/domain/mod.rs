pub mod events;
pub mod grid;
pub mod payment;
pub mod ports;
