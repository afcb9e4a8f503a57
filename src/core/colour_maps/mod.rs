pub mod hsb_palette;
