pub mod estimate;
pub mod input;
