pub mod bar_font;
