pub mod builder;
pub mod model;
pub mod pptx;
pub mod raster;
pub mod svg;
pub mod text_fit;
