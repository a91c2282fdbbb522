pub mod color;
pub mod error;
pub mod fs;
pub mod raster;
