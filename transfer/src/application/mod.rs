// Application layer - use cases for the file owner
// Orchestrates domain logic through the ports, depends on domain layer only

pub mod owner;
pub mod ports;
