pub mod records;
pub mod renderer;
