pub mod files;
pub mod fred;
