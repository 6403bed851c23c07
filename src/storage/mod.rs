pub mod connection;
pub mod entity;
pub mod import;
pub mod repository;
pub mod source;

pub use connection::establish_connection;
pub use source::{DatabaseSource, VillageSource};
