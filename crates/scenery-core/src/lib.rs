//! Scenery Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Scenery parser,
//! graph builder and renderer. It includes:
//!
//! - **Identifiers**: String-interned hierarchy node names ([`identifier::Name`])
//! - **Scenes**: The elaborated scene tree ([`scene`] module)
//! - **Declarations**: Declared-type metadata backing scenes ([`declaration`] module)

pub mod declaration;
pub mod identifier;
pub mod scene;
