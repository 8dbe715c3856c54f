//! Document engine for the ring designer.
//!
//! This crate owns the design document behind the editor: the ordered
//! element scene, a bounded undo/redo history, and the bezel synthesizer
//! that frames gemstones in gold or silver. It does no I/O and no drawing.
//! Image loading, uploads, rasterization and design storage are supplied by
//! the host through the traits in [`assets`]; the host UI renders the scene
//! and calls [`document::Document`] commands in response to user input.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Command API: add, delete, duplicate, edit, bezels, undo/redo, save |
//! | [`scene`] | Ordered element list, property edits and snapshots |
//! | [`history`] | Fixed-depth undo/redo buffer of snapshots |
//! | [`bezel`] | Bezel sizing, metal colors, style effects and placement |
//! | [`element`] | Element, geometry, transform and style types |
//! | [`assets`] | Collaborator traits and the async image flow |
//! | [`design`] | Saved-design document shape |
//! | [`color`] | Hex color parsing |
//! | [`config`] | Environment-driven document settings |
//! | [`error`] | Error enums and `E_*` codes |
//! | [`consts`] | Shared numeric constants (history depth, bezel sizes, etc.) |

pub mod assets;
pub mod bezel;
pub mod color;
pub mod config;
pub mod consts;
pub mod design;
pub mod document;
pub mod element;
pub mod error;
pub mod history;
pub mod scene;
