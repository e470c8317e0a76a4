pub mod table;
pub mod xterm_color;
