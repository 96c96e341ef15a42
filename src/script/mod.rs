//! Script conversion: detect → Shahmukhi→Gurmukhi → normalize → romanize.

pub mod converter;
pub mod detect;
pub mod normalize;
pub mod romanize;
pub mod shahmukhi;
pub mod types;

pub use converter::ScriptConverter;
pub use types::ConvertError;
