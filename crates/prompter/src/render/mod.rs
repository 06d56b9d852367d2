pub mod overlay;
pub mod text;

pub use text::{GUIDE_FRACTION, ScriptLayout, layout_script, paint_script};
