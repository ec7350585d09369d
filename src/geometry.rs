pub mod quadrant;
pub mod radar;
