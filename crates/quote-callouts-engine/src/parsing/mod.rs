pub mod command;
pub mod lexer;
pub mod params;

pub use command::{clean_title, generate, parse, parse_legacy, recognize};
pub use params::{
    DEFAULT_SPACING, DEFAULT_WIDTH, MAX_HEIGHT_PX, MIN_HEIGHT_PX, directive_width, is_length, normalize_height,
    normalize_spacing, normalize_width,
};
