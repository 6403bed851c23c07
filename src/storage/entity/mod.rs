pub mod village;
