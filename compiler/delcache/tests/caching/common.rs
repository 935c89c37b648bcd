//! A synthetic program with many cacheable targets.

use std::sync::Arc;

use delcache::{ModuleOptions, OutputKind};
use delcache_ir::{
    MethodDefId, MethodFlags, MethodRef, NamedTypeRef, SymbolTable, TypeDefId, TypeDefKind,
    TypeRef,
};

/// ```text
/// namespace System { struct Int32; delegate void Action(); delegate TResult Func<TResult>(); }
/// namespace App {
///     static class Statics { static void M000(); ... }
///     class Box<T> { static U Make000<U>(); ... }
/// }
/// ```
pub struct Program {
    pub symbols: Arc<SymbolTable>,
    pub int: TypeDefId,
    pub action: TypeDefId,
    pub func: TypeDefId,
    pub statics: TypeDefId,
    pub boxed: TypeDefId,
    pub concrete_methods: Vec<MethodDefId>,
    pub generic_methods: Vec<MethodDefId>,
}

impl Program {
    pub fn new(count: usize) -> Self {
        delcache::init_tracing();

        let mut b = SymbolTable::builder();
        let int = b.special("System", "Int32", "int", TypeDefKind::Struct);
        let action = b.delegate("System", "Action", &[]);
        let func = b.delegate("System", "Func", &["TResult"]);

        let statics = b.class("App", "Statics", &[]);
        let concrete_methods = (0..count)
            .map(|i| b.method(statics, &format!("M{i:03}"), &[], MethodFlags::STATIC))
            .collect();

        let boxed = b.class("App", "Box", &["T"]);
        let generic_methods = (0..count)
            .map(|i| {
                let method = b.method(boxed, &format!("Make{i:03}"), &["U"], MethodFlags::STATIC);
                let u = TypeRef::TypeParam(b.method_type_param(method, 0));
                b.set_signature(method, Vec::new(), Some(u));
                method
            })
            .collect();

        Program {
            symbols: Arc::new(b.build()),
            int,
            action,
            func,
            statics,
            boxed,
            concrete_methods,
            generic_methods,
        }
    }

    pub fn int(&self) -> TypeRef {
        TypeRef::named(self.int)
    }

    pub fn action(&self) -> TypeRef {
        TypeRef::named(self.action)
    }

    pub fn func(&self, result: TypeRef) -> TypeRef {
        TypeRef::generic(self.func, vec![result])
    }

    /// `Box`'s own `T`, as seen inside `Box<T>`.
    pub fn box_param(&self) -> TypeRef {
        TypeRef::TypeParam(self.symbols.type_param(self.boxed, 0))
    }

    /// `Statics.M{i}`
    pub fn concrete(&self, i: usize) -> MethodRef {
        MethodRef::new(
            self.concrete_methods[i],
            NamedTypeRef::new(self.statics, Vec::new()),
            Vec::new(),
        )
    }

    /// `Box<t>.Make{i}<u>`
    pub fn generic(&self, i: usize, t: TypeRef, u: TypeRef) -> MethodRef {
        MethodRef::new(
            self.generic_methods[i],
            NamedTypeRef::new(self.boxed, vec![t]),
            vec![u],
        )
    }
}

pub fn dll() -> ModuleOptions {
    ModuleOptions::new(OutputKind::DynamicallyLinkedLibrary, "App.dll")
}
