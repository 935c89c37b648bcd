//! Type-parameter substitution.

use rustc_hash::FxHashMap;

use crate::stack::ensure_sufficient_stack;
use crate::symbols::SymbolTable;
use crate::types::{AnonymousMember, AnonymousType, MethodRef, NamedTypeRef, TypeParamRef, TypeRef};

/// A mapping from type parameters to the types that replace them.
///
/// Parameters without a mapping are left in place.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<TypeParamRef, TypeRef>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair parameters with arguments positionally.
    ///
    /// # Panics
    /// Panics in debug builds if the two lists differ in length.
    pub fn from_pairs<'a>(
        params: impl IntoIterator<Item = &'a TypeParamRef>,
        args: impl IntoIterator<Item = &'a TypeRef>,
    ) -> Self {
        let mut subst = Self::new();
        let mut args = args.into_iter();
        for param in params {
            let arg = args.next();
            debug_assert!(arg.is_some(), "fewer type arguments than parameters");
            if let Some(arg) = arg {
                subst.insert(param.clone(), arg.clone());
            }
        }
        debug_assert!(args.next().is_none(), "more type arguments than parameters");
        subst
    }

    /// The substitution that turns a method's definition into `method`:
    /// its own parameters and those of every containing type.
    pub fn for_method(table: &SymbolTable, method: &MethodRef) -> Self {
        let mut subst = Self::new();
        for (ordinal, arg) in (0u32..).zip(&method.type_args) {
            subst.insert(table.method_type_param(method.def, ordinal), arg.clone());
        }
        for ty in method.containing.self_and_containing() {
            for (ordinal, arg) in (0u32..).zip(&ty.type_args) {
                subst.insert(table.type_param(ty.def, ordinal), arg.clone());
            }
        }
        subst
    }

    pub fn insert(&mut self, param: TypeParamRef, arg: TypeRef) {
        self.map.insert(param, arg);
    }

    pub fn get(&self, param: &TypeParamRef) -> Option<&TypeRef> {
        self.map.get(param)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl TypeRef {
    /// Replace every mapped type parameter in this type.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> TypeRef {
        if subst.is_empty() {
            return self.clone();
        }
        ensure_sufficient_stack(|| match self {
            TypeRef::TypeParam(param) => subst.get(param).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Named(named) => TypeRef::Named(named.substitute(subst)),
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(subst)),
                rank: *rank,
            },
            TypeRef::Pointer(pointee) => TypeRef::Pointer(Box::new(pointee.substitute(subst))),
            TypeRef::Anonymous(anon) => TypeRef::Anonymous(AnonymousType {
                members: anon
                    .members
                    .iter()
                    .map(|member| AnonymousMember {
                        name: member.name.clone(),
                        ty: member.ty.substitute(subst),
                    })
                    .collect(),
            }),
            TypeRef::Dynamic => TypeRef::Dynamic,
        })
    }
}

impl NamedTypeRef {
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> NamedTypeRef {
        NamedTypeRef {
            def: self.def,
            type_args: self.type_args.iter().map(|arg| arg.substitute(subst)).collect(),
            containing: self
                .containing
                .as_ref()
                .map(|outer| Box::new(outer.substitute(subst))),
        }
    }
}

impl MethodRef {
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> MethodRef {
        MethodRef {
            def: self.def,
            containing: self.containing.substitute(subst),
            type_args: self.type_args.iter().map(|arg| arg.substitute(subst)).collect(),
        }
    }
}
