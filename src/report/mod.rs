//! Report generation module - Stitching tables and prose into documents.
//!
//! This module handles:
//! - Parsing prose templates with `{{name}}` insertion points
//! - Assembling platform tables and fragments in caller order
//! - Writing, checking and JSON-exporting the result
//!
//! Table rendering itself is handled by the table_format module.
//!
//! # Module Organization
//!
//! - `template` - Template segments, slot names, default layout
//! - `assemble` - Report, PlatformSection, Fragment and slot resolution
//! - `export` - Document write/check and JSON export

mod assemble;
mod export;
mod template;

pub use assemble::{Fragment, PlatformSection, Report};
pub use template::{SlotTarget, Template};
pub(crate) use template::is_slot_name;

pub use export::{check_document, export_json, write_document};
