//! Symbol model for delegate cache synthesis.
//!
//! The lowering pass hands the cache subsystem references to methods and
//! types. This crate defines those references and the small amount of
//! symbol-table machinery needed to reason about them:
//!
//! - [`SymbolTable`]: immutable arena of type and method definitions
//! - [`TypeRef`] / [`NamedTypeRef`] / [`MethodRef`]: constructed references
//! - [`TypeParamRef`]: type-parameter identity `(owner, ordinal)`
//! - [`Symbol`] / [`SymbolVisitor`]: closed dispatch over reference kinds
//! - [`Substitution`]: type-parameter replacement
//! - [`DisplayFormat`]: deterministic signature text used for sort keys
//!
//! # Identity
//!
//! Definitions are identified by dense `u32` ids ([`TypeDefId`],
//! [`MethodDefId`]). A table can be extended into a new builder, so later
//! submissions and generations see a superset of the ids an earlier
//! compilation used.

mod display;
mod ids;
mod stack;
mod substitute;
mod symbols;
mod types;
mod visitor;

pub use display::DisplayFormat;
pub use ids::{ContainerId, MethodDefId, TypeDefId};
pub use stack::ensure_sufficient_stack;
pub use substitute::Substitution;
pub use symbols::{MethodDef, MethodFlags, SymbolTable, SymbolTableBuilder, TypeDef, TypeDefKind};
pub use types::{
    AnonymousMember, AnonymousType, MethodRef, NamedTypeRef, ParamOwner, TypeParamRef, TypeRef,
};
pub use visitor::{AliasRef, Symbol, SymbolKind, SymbolVisitor};
