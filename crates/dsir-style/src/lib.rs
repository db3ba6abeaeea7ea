//! DSIR Style System
//!
//! Canonical style records and the run-scoped table that deduplicates them.
//!
//! # Core Concepts
//!
//! - [`StyleRecord`]: Normalized visual/layout properties of one node
//! - [`Scalar`] / [`Color`]: The only leaf encodings a record contains
//! - [`ContentHash`]: 32-byte Blake3 hash of a record's canonical bytes
//! - [`GlobalVariableTable`]: Content-addressed intern table (`VarId` → record)
//!
//! # Example
//!
//! ```rust,ignore
//! use dsir_style::{Color, GlobalVariableTable, Paint, StyleRecord};
//!
//! let mut table = GlobalVariableTable::new();
//! let red = StyleRecord {
//!     fills: vec![Paint::Solid(Color::from_unit(1.0, 0.0, 0.0, 1.0))],
//!     ..StyleRecord::default()
//! };
//! let a = table.intern(red.clone())?;
//! let b = table.intern(red)?;
//! assert_eq!(a, b);
//! ```

#![warn(unreachable_pub)]

mod error;
mod hash;
mod record;
mod table;
mod value;

// Re-exports
pub use error::StyleError;
pub use hash::ContentHash;
pub use record::{
    Blur, CornerRadius, Effect, GradientKind, GradientPaint, GradientStop, ImagePaint,
    LayoutMode, LayoutStyle, Paint, Shadow, StyleRecord, TextStyle,
};
pub use table::{GlobalVariableTable, GlobalVars, VarId, VAR_ID_PREFIX};
pub use value::{Color, Scalar};
