pub mod location;
pub mod slot;
