//! Durable key-value storage backends

pub mod file;

pub use file::FileStorage;
