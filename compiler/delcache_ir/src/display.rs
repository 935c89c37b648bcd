//! Deterministic signature text.
//!
//! Cache containers and fields are ordered by the text produced here, so the
//! output must depend only on the reference itself: no ids, no addresses,
//! no hashing order. Compare results with `str::cmp` (byte-wise ordinal).

use crate::stack::ensure_sufficient_stack;
use crate::substitute::Substitution;
use crate::symbols::SymbolTable;
use crate::types::{MethodRef, NamedTypeRef, TypeRef};

/// How much of a symbol to render.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DisplayFormat {
    /// `global::Ns.Outer<T>.Inner.M<U>`
    FullyQualified,
    /// `void global::Ns.C.M<U>(int, U[])`, with parameter and return types
    /// after substitution of the method's type arguments.
    MethodSortKey,
}

impl SymbolTable {
    /// Render a type. Types render identically under both formats.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    /// Render a method reference.
    pub fn display_method(&self, method: &MethodRef, format: DisplayFormat) -> String {
        let mut out = String::new();
        let def = self.method_def(method.def);

        let subst = match format {
            DisplayFormat::FullyQualified => None,
            DisplayFormat::MethodSortKey => Some(Substitution::for_method(self, method)),
        };

        if let Some(subst) = &subst {
            match &def.return_type {
                Some(ret) => self.write_type(&mut out, &ret.substitute(subst)),
                None => out.push_str("void"),
            }
            out.push(' ');
        }

        self.write_named(&mut out, &method.containing);
        out.push('.');
        out.push_str(&def.name);
        self.write_type_args(&mut out, &method.type_args);

        if let Some(subst) = &subst {
            out.push('(');
            for (i, param) in def.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_type(&mut out, &param.substitute(subst));
            }
            out.push(')');
        }
        out
    }

    fn write_type(&self, out: &mut String, ty: &TypeRef) {
        ensure_sufficient_stack(|| match ty {
            TypeRef::Named(named) => self.write_named(out, named),
            TypeRef::TypeParam(param) => out.push_str(&param.name),
            TypeRef::Array { element, rank } => {
                self.write_type(out, element);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            TypeRef::Pointer(pointee) => {
                self.write_type(out, pointee);
                out.push('*');
            }
            TypeRef::Dynamic => out.push_str("dynamic"),
            TypeRef::Anonymous(anon) => {
                out.push_str("<anonymous type: ");
                for (i, member) in anon.members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, &member.ty);
                    out.push(' ');
                    out.push_str(&member.name);
                }
                out.push('>');
            }
        });
    }

    fn write_named(&self, out: &mut String, named: &NamedTypeRef) {
        let def = self.type_def(named.def);
        if let (Some(keyword), true) = (def.keyword, named.type_args.is_empty()) {
            out.push_str(keyword);
            return;
        }

        match &named.containing {
            Some(outer) => {
                self.write_named(out, outer);
                out.push('.');
            }
            None => {
                out.push_str("global::");
                if !def.namespace.is_empty() {
                    out.push_str(&def.namespace);
                    out.push('.');
                }
            }
        }
        out.push_str(&def.name);
        self.write_type_args(out, &named.type_args);
    }

    fn write_type_args(&self, out: &mut String, args: &[TypeRef]) {
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, arg);
        }
        out.push('>');
    }
}
