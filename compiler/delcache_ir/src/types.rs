//! Type and method references.
//!
//! References are plain structural values: two references are equal when
//! they name the same definition with the same type arguments. Type
//! parameters are compared by `(owner, ordinal)` only; their display name is
//! carried along for rendering.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::ids::{ContainerId, MethodDefId, TypeDefId};

/// The symbol that declares a type parameter.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ParamOwner {
    /// A generic type definition.
    Type(TypeDefId),
    /// A generic method definition.
    Method(MethodDefId),
    /// A synthesized generic cache container.
    Container(ContainerId),
}

/// Reference to a type parameter.
#[derive(Clone, Debug)]
pub struct TypeParamRef {
    pub owner: ParamOwner,
    pub ordinal: u32,
    pub name: Arc<str>,
}

impl TypeParamRef {
    pub fn new(owner: ParamOwner, ordinal: u32, name: impl Into<Arc<str>>) -> Self {
        TypeParamRef {
            owner,
            ordinal,
            name: name.into(),
        }
    }
}

impl PartialEq for TypeParamRef {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.ordinal == other.ordinal
    }
}

impl Eq for TypeParamRef {}

impl Hash for TypeParamRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.ordinal.hash(state);
    }
}

/// A (possibly constructed) reference to a named type.
///
/// `type_args` holds the arguments for the type's *own* parameters only;
/// arguments of enclosing types live on `containing`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedTypeRef {
    pub def: TypeDefId,
    pub type_args: Vec<TypeRef>,
    pub containing: Option<Box<NamedTypeRef>>,
}

impl NamedTypeRef {
    /// A top-level type with the given own type arguments.
    pub fn new(def: TypeDefId, type_args: Vec<TypeRef>) -> Self {
        NamedTypeRef {
            def,
            type_args,
            containing: None,
        }
    }

    /// Nest this reference inside a constructed containing type.
    #[must_use]
    pub fn nested_in(mut self, containing: NamedTypeRef) -> Self {
        self.containing = Some(Box::new(containing));
        self
    }

    /// Iterate this type and its containing types, innermost first.
    pub fn self_and_containing(&self) -> impl Iterator<Item = &NamedTypeRef> {
        std::iter::successors(Some(self), |ty| ty.containing.as_deref())
    }
}

/// One member of a structural (anonymous) type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AnonymousMember {
    pub name: Arc<str>,
    pub ty: TypeRef,
}

/// A structural type whose identity is its ordered member list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AnonymousType {
    pub members: Vec<AnonymousMember>,
}

impl AnonymousType {
    pub fn new(members: impl IntoIterator<Item = (Arc<str>, TypeRef)>) -> Self {
        AnonymousType {
            members: members
                .into_iter()
                .map(|(name, ty)| AnonymousMember { name, ty })
                .collect(),
        }
    }

    /// Member types in declaration order.
    pub fn member_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.members.iter().map(|member| &member.ty)
    }
}

/// A type reference in any position a delegate conversion can mention.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// Named type, possibly generic and possibly nested.
    Named(NamedTypeRef),
    /// Open type parameter.
    TypeParam(TypeParamRef),
    /// Array of `element` with the given rank (1 for `T[]`).
    Array { element: Box<TypeRef>, rank: u32 },
    /// Unmanaged pointer.
    Pointer(Box<TypeRef>),
    /// Dynamically-typed object.
    Dynamic,
    /// Anonymous (structural) type.
    Anonymous(AnonymousType),
}

impl TypeRef {
    /// Non-generic, non-nested named type.
    pub fn named(def: TypeDefId) -> Self {
        TypeRef::Named(NamedTypeRef::new(def, Vec::new()))
    }

    /// Top-level generic type applied to `args`.
    pub fn generic(def: TypeDefId, args: Vec<TypeRef>) -> Self {
        TypeRef::Named(NamedTypeRef::new(def, args))
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    pub fn pointer(pointee: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(pointee))
    }

    pub fn as_named(&self) -> Option<&NamedTypeRef> {
        match self {
            TypeRef::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl From<TypeParamRef> for TypeRef {
    fn from(param: TypeParamRef) -> Self {
        TypeRef::TypeParam(param)
    }
}

impl From<NamedTypeRef> for TypeRef {
    fn from(named: NamedTypeRef) -> Self {
        TypeRef::Named(named)
    }
}

/// A (possibly constructed) method reference.
///
/// `containing` is the constructed type that declares the method; for a
/// method on `Outer<int>.Inner<string>` it carries both argument lists.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodRef {
    pub def: MethodDefId,
    pub containing: NamedTypeRef,
    pub type_args: Vec<TypeRef>,
}

impl MethodRef {
    pub fn new(def: MethodDefId, containing: NamedTypeRef, type_args: Vec<TypeRef>) -> Self {
        MethodRef {
            def,
            containing,
            type_args,
        }
    }
}
