// Domain layer - permission records, value objects and the error taxonomy
// No dependencies on other layers

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
