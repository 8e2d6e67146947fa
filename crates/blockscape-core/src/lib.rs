/// Blockscape Core — scanning, classification, selection and 3D layout.
///
/// This crate contains all business logic with zero UI dependencies. A host
/// hands it a root path and a [`config::BlockscapeConfig`] and gets back an
/// aggregated node tree plus placement records ready for a renderer.
///
/// # Modules
///
/// - [`scanner`] — Bounded, cycle-safe recursive scan into a [`model::FileNode`] tree.
/// - [`classify`] — Tag, family and colour for each node, with budgeted content sniffing.
/// - [`aggregate`] — Top-N selection of a node's children plus the Others remainder.
/// - [`layout`] — Deterministic placement strategies (family arms, grid, radial, rooms).
/// - [`model`] — Node tree, placement records, size formatting.
/// - [`platform`] — Filesystem metadata provider and allocated-size lookups.
/// - [`config`] / [`error`] — Tunables and typed errors.
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod platform;
pub mod scanner;
