//! Concreteness and type-parameter dependency analyses.
//!
//! Both walk the same structure: array element types, pointer pointee
//! types, type arguments, containing-type chains, and the member types of
//! anonymous types. They differ only in what a type parameter means:
//!
//! - [`FullyConcrete`]: any type parameter makes the reference open.
//! - [`TypeParamUsage`]: only parameters in the set of interest count.
//!
//! Symbols outside the type/method domain trap (see
//! [`SymbolVisitor::visit_other`]).

use delcache_ir::{
    AliasRef, AnonymousType, MethodRef, NamedTypeRef, Symbol, SymbolVisitor, TypeParamRef, TypeRef,
};

/// Answers "does this reference mention no open type parameter anywhere?"
#[derive(Copy, Clone, Debug, Default)]
pub struct FullyConcrete;

impl SymbolVisitor for FullyConcrete {
    type Output = bool;

    fn visit_named(&mut self, named: &NamedTypeRef) -> bool {
        named.type_args.iter().all(|arg| self.visit_type(arg))
            && named
                .containing
                .as_deref()
                .map_or(true, |outer| self.visit_named(outer))
    }

    fn visit_type_param(&mut self, _: &TypeParamRef) -> bool {
        false
    }

    fn visit_array(&mut self, element: &TypeRef) -> bool {
        self.visit_type(element)
    }

    // Pointee types cannot be generic in source, but metadata can say otherwise.
    fn visit_pointer(&mut self, pointee: &TypeRef) -> bool {
        self.visit_type(pointee)
    }

    fn visit_dynamic(&mut self) -> bool {
        true
    }

    fn visit_anonymous(&mut self, anon: &AnonymousType) -> bool {
        anon.member_types().all(|ty| self.visit_type(ty))
    }

    fn visit_method(&mut self, method: &MethodRef) -> bool {
        method.type_args.iter().all(|arg| self.visit_type(arg))
            && self.visit_named(&method.containing)
    }

    fn visit_alias(&mut self, _: &AliasRef) -> bool {
        true
    }
}

/// Answers "does this reference mention any parameter in `params`?"
#[derive(Copy, Clone, Debug)]
pub struct TypeParamUsage<'a> {
    params: &'a [TypeParamRef],
}

impl<'a> TypeParamUsage<'a> {
    pub fn new(params: &'a [TypeParamRef]) -> Self {
        TypeParamUsage { params }
    }
}

impl SymbolVisitor for TypeParamUsage<'_> {
    type Output = bool;

    fn visit_named(&mut self, named: &NamedTypeRef) -> bool {
        named.type_args.iter().any(|arg| self.visit_type(arg))
            || named
                .containing
                .as_deref()
                .is_some_and(|outer| self.visit_named(outer))
    }

    fn visit_type_param(&mut self, param: &TypeParamRef) -> bool {
        self.params.contains(param)
    }

    fn visit_array(&mut self, element: &TypeRef) -> bool {
        self.visit_type(element)
    }

    fn visit_pointer(&mut self, pointee: &TypeRef) -> bool {
        self.visit_type(pointee)
    }

    fn visit_dynamic(&mut self) -> bool {
        false
    }

    fn visit_anonymous(&mut self, anon: &AnonymousType) -> bool {
        anon.member_types().any(|ty| self.visit_type(ty))
    }

    fn visit_method(&mut self, method: &MethodRef) -> bool {
        method.type_args.iter().any(|arg| self.visit_type(arg))
            || self.visit_named(&method.containing)
    }

    fn visit_alias(&mut self, _: &AliasRef) -> bool {
        false
    }
}

/// `true` iff no open type parameter appears anywhere in `symbol`.
///
/// # Panics
/// Panics if `symbol` is not a type, method, or alias reference.
pub fn is_fully_concrete<'a>(symbol: impl Into<Symbol<'a>>) -> bool {
    FullyConcrete.visit(symbol.into())
}

/// `true` iff `symbol` mentions any of `params`.
///
/// # Panics
/// Panics if `symbol` is not a type, method, or alias reference.
pub fn depends_on_type_params<'a>(symbol: impl Into<Symbol<'a>>, params: &[TypeParamRef]) -> bool {
    if params.is_empty() {
        return false;
    }
    TypeParamUsage::new(params).visit(symbol.into())
}
