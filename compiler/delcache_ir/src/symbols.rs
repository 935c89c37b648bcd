//! Type and method definitions.
//!
//! `SymbolTable` is the slice of the compiler's symbol table that delegate
//! caching consumes: names, namespaces, containing-type chains, generic
//! arity, and method signatures. It is immutable once built and is shared
//! (behind `Arc`) by every thread lowering method bodies.

use std::ops::Deref;
use std::sync::Arc;

use bitflags::bitflags;

use crate::ids::{MethodDefId, TypeDefId};
use crate::types::{MethodRef, NamedTypeRef, ParamOwner, TypeParamRef, TypeRef};

/// What kind of named type a definition declares.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeDefKind {
    Class,
    Struct,
    Interface,
    Delegate,
}

/// A named type definition.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: Arc<str>,
    /// Dotted namespace path; empty for the global namespace.
    pub namespace: Arc<str>,
    pub containing: Option<TypeDefId>,
    pub type_params: Vec<Arc<str>>,
    pub kind: TypeDefKind,
    /// Language keyword rendered instead of the qualified name (`int`, `string`).
    pub keyword: Option<&'static str>,
}

impl TypeDef {
    #[inline]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }
}

bitflags! {
    /// Method properties relevant to delegate caching.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MethodFlags: u8 {
        /// No receiver; a delegate to it captures nothing.
        const STATIC = 1 << 0;
        /// Lowered local function; may mention type parameters of the
        /// enclosing method that its own symbol does not declare.
        const LOCAL_FUNCTION = 1 << 1;
    }
}

/// A method definition.
#[derive(Clone, Debug)]
pub struct MethodDef {
    pub name: Arc<str>,
    pub containing: TypeDefId,
    pub type_params: Vec<Arc<str>>,
    pub params: Vec<TypeRef>,
    /// `None` for `void`.
    pub return_type: Option<TypeRef>,
    pub flags: MethodFlags,
}

impl MethodDef {
    #[inline]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }
}

/// Immutable arena of type and method definitions.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    types: Vec<TypeDef>,
    methods: Vec<MethodDef>,
}

impl SymbolTable {
    pub fn builder() -> SymbolTableBuilder {
        SymbolTableBuilder::new()
    }

    /// Extend this table; existing ids stay valid in the result.
    pub fn to_builder(&self) -> SymbolTableBuilder {
        SymbolTableBuilder {
            table: self.clone(),
        }
    }

    /// Look up a type definition.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this table (or an ancestor it extends).
    pub fn type_def(&self, id: TypeDefId) -> &TypeDef {
        &self.types[id.index()]
    }

    /// Look up a method definition.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this table (or an ancestor it extends).
    pub fn method_def(&self, id: MethodDefId) -> &MethodDef {
        &self.methods[id.index()]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// The `ordinal`-th type parameter declared by a type.
    pub fn type_param(&self, def: TypeDefId, ordinal: u32) -> TypeParamRef {
        let name = &self.type_def(def).type_params[ordinal as usize];
        TypeParamRef::new(ParamOwner::Type(def), ordinal, Arc::clone(name))
    }

    /// The `ordinal`-th type parameter declared by a method.
    pub fn method_type_param(&self, def: MethodDefId, ordinal: u32) -> TypeParamRef {
        let name = &self.method_def(def).type_params[ordinal as usize];
        TypeParamRef::new(ParamOwner::Method(def), ordinal, Arc::clone(name))
    }

    /// `def` followed by each of its containing types, innermost first.
    pub fn self_and_containing(&self, def: TypeDefId) -> impl Iterator<Item = TypeDefId> + '_ {
        std::iter::successors(Some(def), |&id| self.type_def(id).containing)
    }

    /// The unconstructed form of a type: each type parameter applied to itself.
    pub fn type_definition(&self, def: TypeDefId) -> NamedTypeRef {
        let type_def = self.type_def(def);
        let type_args = (0..type_def.type_params.len())
            .map(|ordinal| TypeRef::TypeParam(self.type_param(def, ordinal_u32(ordinal))))
            .collect();
        NamedTypeRef {
            def,
            type_args,
            containing: type_def
                .containing
                .map(|outer| Box::new(self.type_definition(outer))),
        }
    }

    /// The unconstructed form of a method, inside its unconstructed containing type.
    pub fn method_definition(&self, def: MethodDefId) -> MethodRef {
        let method = self.method_def(def);
        let type_args = (0..method.type_params.len())
            .map(|ordinal| TypeRef::TypeParam(self.method_type_param(def, ordinal_u32(ordinal))))
            .collect();
        MethodRef::new(def, self.type_definition(method.containing), type_args)
    }

    /// Every type parameter a method's signature may legally mention:
    /// its own followed by those of each containing type, innermost first.
    pub fn type_params_in_scope(&self, def: MethodDefId) -> Vec<TypeParamRef> {
        let method = self.method_def(def);
        let own = (0..method.type_params.len())
            .map(|ordinal| self.method_type_param(def, ordinal_u32(ordinal)));
        let outer = self
            .self_and_containing(method.containing)
            .flat_map(|ty| {
                (0..self.type_def(ty).type_params.len())
                    .map(move |ordinal| self.type_param(ty, ordinal_u32(ordinal)))
            });
        own.chain(outer).collect()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "generic arity is bounded far below u32::MAX"
)]
#[inline]
fn ordinal_u32(ordinal: usize) -> u32 {
    ordinal as u32
}

/// Incremental builder for a [`SymbolTable`].
///
/// Dereferences to the table under construction, so parameter and
/// definition lookups work while signatures are still being added.
#[derive(Clone, Debug, Default)]
pub struct SymbolTableBuilder {
    table: SymbolTable,
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, def: TypeDef) -> TypeDefId {
        if let Some(outer) = def.containing {
            debug_assert!(outer.index() < self.table.types.len(), "containing type must exist");
        }
        let id = TypeDefId::from_raw(ordinal_u32(self.table.types.len()));
        self.table.types.push(def);
        id
    }

    /// Top-level class in `namespace`.
    pub fn class(&mut self, namespace: &str, name: &str, type_params: &[&str]) -> TypeDefId {
        self.add_type(TypeDef {
            name: name.into(),
            namespace: namespace.into(),
            containing: None,
            type_params: type_params.iter().map(|&p| Arc::from(p)).collect(),
            kind: TypeDefKind::Class,
            keyword: None,
        })
    }

    /// Class nested inside `containing`.
    pub fn nested_class(
        &mut self,
        containing: TypeDefId,
        name: &str,
        type_params: &[&str],
    ) -> TypeDefId {
        let namespace = Arc::clone(&self.table.type_def(containing).namespace);
        self.add_type(TypeDef {
            name: name.into(),
            namespace,
            containing: Some(containing),
            type_params: type_params.iter().map(|&p| Arc::from(p)).collect(),
            kind: TypeDefKind::Class,
            keyword: None,
        })
    }

    /// Top-level delegate type.
    pub fn delegate(&mut self, namespace: &str, name: &str, type_params: &[&str]) -> TypeDefId {
        self.add_type(TypeDef {
            name: name.into(),
            namespace: namespace.into(),
            containing: None,
            type_params: type_params.iter().map(|&p| Arc::from(p)).collect(),
            kind: TypeDefKind::Delegate,
            keyword: None,
        })
    }

    /// Special type rendered by its language keyword.
    pub fn special(
        &mut self,
        namespace: &str,
        name: &str,
        keyword: &'static str,
        kind: TypeDefKind,
    ) -> TypeDefId {
        self.add_type(TypeDef {
            name: name.into(),
            namespace: namespace.into(),
            containing: None,
            type_params: Vec::new(),
            kind,
            keyword: Some(keyword),
        })
    }

    pub fn add_method(&mut self, def: MethodDef) -> MethodDefId {
        debug_assert!(def.containing.index() < self.table.types.len(), "containing type must exist");
        let id = MethodDefId::from_raw(ordinal_u32(self.table.methods.len()));
        self.table.methods.push(def);
        id
    }

    /// Method with an empty `void()` signature; see [`Self::set_signature`].
    pub fn method(
        &mut self,
        containing: TypeDefId,
        name: &str,
        type_params: &[&str],
        flags: MethodFlags,
    ) -> MethodDefId {
        self.add_method(MethodDef {
            name: name.into(),
            containing,
            type_params: type_params.iter().map(|&p| Arc::from(p)).collect(),
            params: Vec::new(),
            return_type: None,
            flags,
        })
    }

    /// Replace a method's parameter and return types.
    ///
    /// Separate from [`Self::method`] because a generic method's signature
    /// refers to its own type parameters, which need its id.
    pub fn set_signature(
        &mut self,
        def: MethodDefId,
        params: Vec<TypeRef>,
        return_type: Option<TypeRef>,
    ) {
        let method = &mut self.table.methods[def.index()];
        method.params = params;
        method.return_type = return_type;
    }

    pub fn build(self) -> SymbolTable {
        self.table
    }
}

impl Deref for SymbolTableBuilder {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}
