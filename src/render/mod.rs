pub mod axis;
pub mod figure;
