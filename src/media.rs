pub mod blob;
pub mod wav;
