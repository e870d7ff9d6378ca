pub mod mapping;
pub mod profile;
pub mod settings;
pub mod unicode;
