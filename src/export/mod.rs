pub mod filename;
pub mod html;
pub mod png;
pub mod table;
