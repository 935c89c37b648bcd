//! Shared symbol fixtures for unit tests.

use std::sync::Arc;

use delcache_ir::{
    MethodDefId, MethodFlags, MethodRef, NamedTypeRef, SymbolTable, TypeDefId, TypeDefKind,
    TypeRef,
};

/// A small program:
///
/// ```text
/// namespace System { struct Int32; class String; class Object;
///                    delegate void Action(); delegate TResult Func<TResult>();
///                    delegate TResult Func<T, TResult>(T arg); }
/// namespace App {
///     class C {
///         static void M(); static void N(); void Instance();
///         static void Outer<T>() { static void Local<V>(T t) { } }
///     }
///     class G<T> {
///         static U M<U>();
///         class Nested<V> { static void Run<W>(V v); }
///     }
/// }
/// ```
pub(crate) struct Corpus {
    pub symbols: Arc<SymbolTable>,
    pub int: TypeDefId,
    pub string: TypeDefId,
    pub action: TypeDefId,
    pub func1: TypeDefId,
    pub c: TypeDefId,
    pub g: TypeDefId,
    pub nested: TypeDefId,
    pub c_m: MethodDefId,
    pub c_n: MethodDefId,
    pub c_instance: MethodDefId,
    pub c_outer: MethodDefId,
    pub c_local: MethodDefId,
    pub g_m: MethodDefId,
    pub nested_run: MethodDefId,
}

impl Corpus {
    pub fn new() -> Self {
        let mut b = SymbolTable::builder();
        let int = b.special("System", "Int32", "int", TypeDefKind::Struct);
        let string = b.special("System", "String", "string", TypeDefKind::Class);
        b.special("System", "Object", "object", TypeDefKind::Class);
        let action = b.delegate("System", "Action", &[]);
        let func1 = b.delegate("System", "Func", &["TResult"]);
        b.delegate("System", "Func", &["T", "TResult"]);

        let c = b.class("App", "C", &[]);
        let c_m = b.method(c, "M", &[], MethodFlags::STATIC);
        let c_n = b.method(c, "N", &[], MethodFlags::STATIC);
        let c_instance = b.method(c, "Instance", &[], MethodFlags::empty());
        let c_outer = b.method(c, "Outer", &["T"], MethodFlags::STATIC);
        let c_local = b.method(
            c,
            "<Outer>g__Local|0_0",
            &["V"],
            MethodFlags::STATIC | MethodFlags::LOCAL_FUNCTION,
        );
        let outer_t = TypeRef::TypeParam(b.method_type_param(c_outer, 0));
        b.set_signature(c_local, vec![outer_t], None);

        let g = b.class("App", "G", &["T"]);
        let g_m = b.method(g, "M", &["U"], MethodFlags::STATIC);
        let u = TypeRef::TypeParam(b.method_type_param(g_m, 0));
        b.set_signature(g_m, Vec::new(), Some(u));

        let nested = b.nested_class(g, "Nested", &["V"]);
        let nested_run = b.method(nested, "Run", &["W"], MethodFlags::STATIC);
        let v = TypeRef::TypeParam(b.type_param(nested, 0));
        b.set_signature(nested_run, vec![v], None);

        Corpus {
            symbols: Arc::new(b.build()),
            int,
            string,
            action,
            func1,
            c,
            g,
            nested,
            c_m,
            c_n,
            c_instance,
            c_outer,
            c_local,
            g_m,
            nested_run,
        }
    }

    pub fn int(&self) -> TypeRef {
        TypeRef::named(self.int)
    }

    pub fn string(&self) -> TypeRef {
        TypeRef::named(self.string)
    }

    pub fn action(&self) -> TypeRef {
        TypeRef::named(self.action)
    }

    pub fn func(&self, result: TypeRef) -> TypeRef {
        TypeRef::generic(self.func1, vec![result])
    }

    /// A method of the non-generic class `App.C`.
    pub fn on_c(&self, method: MethodDefId, type_args: Vec<TypeRef>) -> MethodRef {
        MethodRef::new(method, NamedTypeRef::new(self.c, Vec::new()), type_args)
    }

    /// `G<t>.M<u>`
    pub fn g_m(&self, t: TypeRef, u: TypeRef) -> MethodRef {
        MethodRef::new(self.g_m, NamedTypeRef::new(self.g, vec![t]), vec![u])
    }

    /// `G<t>.Nested<v>.Run<w>`
    pub fn nested_run(&self, t: TypeRef, v: TypeRef, w: TypeRef) -> MethodRef {
        let containing =
            NamedTypeRef::new(self.nested, vec![v]).nested_in(NamedTypeRef::new(self.g, vec![t]));
        MethodRef::new(self.nested_run, containing, vec![w])
    }
}
