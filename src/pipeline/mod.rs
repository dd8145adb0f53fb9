pub mod clock;
pub mod grid;
pub mod kit;
pub mod project;
pub mod transport;
