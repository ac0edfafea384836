pub mod view;

pub use view::draw;

pub const CANVAS_SIZE: i32 = 400;
pub const OUTLINE_WIDTH: f64 = 1.5;
pub const LINE_WIDTH: f64 = 3.0;
pub const LABEL_FONT_SIZE: f64 = 14.0;
pub const LABEL_FONT: &str = "Sans";
