// Infrastructure layer - external concerns (Drive API, credential files, CLI)
// Implements interfaces defined in application layer

pub mod config;
pub mod driven;    // Output adapters (Drive REST API, credential store)
pub mod driving;   // Input adapters (CLI)
