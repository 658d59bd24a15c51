pub mod color;
pub mod config;
pub mod constants;
pub mod geo;
pub mod transform;
pub mod value;
