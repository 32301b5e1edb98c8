//! Presentation helpers for the CLI
pub mod icons;
pub mod render;

pub use self::icons::IconTable;
pub use self::render::{ReportRenderer, category_title};
