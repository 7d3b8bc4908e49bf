//! Layer geometry and interaction engine for a page-based design editor.
//!
//! The crate owns everything between raw pointer input and the layer records
//! of a design: rotation and bounding-box math, control-point geometry and
//! shape resize policies, snapping, the move/select pointer state machine,
//! z-order and alignment. It renders nothing. The host feeds
//! [`input::PointerEvent`]s into [`engine::EngineCore`] and draws the design
//! it reads back, reacting to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event dispatch facade, [`engine::EngineCore`] |
//! | [`store`] | Editor context: pages, selection, control-state token |
//! | [`doc`] | Page / layer / styles model, copy-on-write style patches |
//! | [`factory`] | Layer builders, design JSON import / export |
//! | [`geometry`] | Degree trig, rotated points, rotated bounding boxes |
//! | [`camera`] | Page viewport and screen / page conversion |
//! | [`control`] | Control points, resize policies, line geometry |
//! | [`gesture`] | Scale, resize, rotate and line-endpoint handle gestures |
//! | [`snap`] | Snap lines for move and scale, rotation angle snap |
//! | [`moving`] | Per-layer move/select controller |
//! | [`sub_controller`] | Child selection inside groups and frames |
//! | [`hit`] | Hit-testing layers, children and control points |
//! | [`zindex`] | Z-order invariant and layer-order commands |
//! | [`align`] | Alignment to the page or within a multi-selection |
//! | [`input`] | Pointer events, modifiers, pointer tracking |
//! | [`scheduler`] | Frame-coalesced move throttling |
//! | [`collab`] | Event bus, text editor and undo collaborator traits |
//! | [`replay`] | Scripted input replay |
//! | [`config`] | Engine tunables with env overrides |
//! | [`consts`] | Shared numeric constants (snap distance, minimum sizes, etc.) |

pub mod align;
pub mod camera;
pub mod collab;
pub mod config;
pub mod consts;
pub mod control;
pub mod doc;
pub mod engine;
pub mod factory;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod moving;
pub mod replay;
pub mod scheduler;
pub mod snap;
pub mod store;
pub mod sub_controller;
pub mod zindex;

#[cfg(test)]
pub(crate) mod test_support;
