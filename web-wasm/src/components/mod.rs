//! UIコンポーネント

pub mod header;
pub mod image_uploader;
pub mod result_panel;
pub mod score_display;
pub mod settings_panel;
