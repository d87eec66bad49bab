//! Runtime data model definitions.
//!
//! Types in `model` describe the persisted entity types and the relations
//! between them. They are usually generated once (macro output or a startup
//! registry) and then read by the resolver for every call.
//!
//! In general:
//! - `entity` names a persisted type and lists its relations
//! - `relation` carries the navigation and storage facts that decide edge direction
//! - `registry` maps entity paths to their static models
pub mod entity;
pub mod registry;
pub mod relation;
