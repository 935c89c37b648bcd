//! Closed dispatch over the symbol kinds a delegate conversion can mention.
//!
//! Analyses over conversion operands are written as [`SymbolVisitor`]
//! implementations. The default [`SymbolVisitor::visit`] dispatches on the
//! [`Symbol`] variant; [`SymbolVisitor::visit_type`] dispatches further on
//! the [`TypeRef`] variant. Kinds that cannot legally occur in a type or
//! method position ([`SymbolKind`]) trap in [`SymbolVisitor::visit_other`].

use std::fmt;
use std::sync::Arc;

use crate::stack::ensure_sufficient_stack;
use crate::types::{AnonymousType, MethodRef, NamedTypeRef, TypeParamRef, TypeRef};

/// A `using` alias naming a type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AliasRef {
    pub name: Arc<str>,
    pub target: TypeRef,
}

/// Symbol kinds that never appear where a type or method reference is expected.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Namespace,
    Assembly,
    Module,
    Field,
    Property,
    Event,
    Parameter,
    Local,
    RangeVariable,
    Label,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Assembly => "assembly",
            SymbolKind::Module => "module",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
            SymbolKind::Event => "event",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Local => "local",
            SymbolKind::RangeVariable => "range variable",
            SymbolKind::Label => "label",
        };
        f.write_str(name)
    }
}

/// A borrowed reference to any symbol a visitor may be handed.
#[derive(Copy, Clone, Debug)]
pub enum Symbol<'a> {
    Type(&'a TypeRef),
    Method(&'a MethodRef),
    Alias(&'a AliasRef),
    Other(SymbolKind),
}

impl<'a> From<&'a TypeRef> for Symbol<'a> {
    fn from(ty: &'a TypeRef) -> Self {
        Symbol::Type(ty)
    }
}

impl<'a> From<&'a MethodRef> for Symbol<'a> {
    fn from(method: &'a MethodRef) -> Self {
        Symbol::Method(method)
    }
}

impl<'a> From<&'a AliasRef> for Symbol<'a> {
    fn from(alias: &'a AliasRef) -> Self {
        Symbol::Alias(alias)
    }
}

/// Structural recursion over type and method references.
///
/// Implementors supply one method per reachable reference kind. The
/// dispatching methods grow the stack as needed, so arbitrarily nested
/// references are safe to visit.
///
/// # Example
///
/// ```text
/// struct CountParams(usize);
///
/// impl SymbolVisitor for CountParams {
///     type Output = ();
///     fn visit_type_param(&mut self, _: &TypeParamRef) { self.0 += 1; }
///     // ... remaining kinds recurse ...
/// }
/// ```
pub trait SymbolVisitor {
    type Output;

    /// Dispatch on the symbol kind.
    fn visit(&mut self, symbol: Symbol<'_>) -> Self::Output {
        match symbol {
            Symbol::Type(ty) => self.visit_type(ty),
            Symbol::Method(method) => ensure_sufficient_stack(|| self.visit_method(method)),
            Symbol::Alias(alias) => self.visit_alias(alias),
            Symbol::Other(kind) => self.visit_other(kind),
        }
    }

    /// Dispatch on the type reference kind.
    fn visit_type(&mut self, ty: &TypeRef) -> Self::Output {
        ensure_sufficient_stack(|| match ty {
            TypeRef::Named(named) => self.visit_named(named),
            TypeRef::TypeParam(param) => self.visit_type_param(param),
            TypeRef::Array { element, .. } => self.visit_array(element),
            TypeRef::Pointer(pointee) => self.visit_pointer(pointee),
            TypeRef::Dynamic => self.visit_dynamic(),
            TypeRef::Anonymous(anon) => self.visit_anonymous(anon),
        })
    }

    fn visit_named(&mut self, named: &NamedTypeRef) -> Self::Output;

    fn visit_type_param(&mut self, param: &TypeParamRef) -> Self::Output;

    fn visit_array(&mut self, element: &TypeRef) -> Self::Output;

    fn visit_pointer(&mut self, pointee: &TypeRef) -> Self::Output;

    fn visit_dynamic(&mut self) -> Self::Output;

    fn visit_anonymous(&mut self, anon: &AnonymousType) -> Self::Output;

    fn visit_method(&mut self, method: &MethodRef) -> Self::Output;

    fn visit_alias(&mut self, alias: &AliasRef) -> Self::Output;

    /// Symbols outside the type/method domain are a caller defect.
    fn visit_other(&mut self, kind: SymbolKind) -> Self::Output {
        unreachable!("a {kind} cannot appear in a type or method reference position")
    }
}
