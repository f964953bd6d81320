//! Report renderers.

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;

pub use self::csv::{records_to_csv, write_records_csv};
pub use html::render_html;
pub use json::{render_json, render_json_with_records};
pub use markdown::render_markdown;
