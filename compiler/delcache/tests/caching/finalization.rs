//! Deterministic naming and the finalize contract.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rayon::prelude::*;

use delcache::{
    CacheContainer, CacheSite, ContainerKind, DelegateCacheManager, DelegateConversion,
    EmitBaseline, LoweringContext, NameSlot, SynthesizedAttribute,
};

use crate::common::{dll, Program};

#[test]
fn indices_follow_sort_order_not_creation_order() {
    let program = Program::new(100);
    let manager = DelegateCacheManager::new(program.symbols.clone());

    (0..100).into_par_iter().rev().for_each(|i| {
        manager.obtain_generic_container(program.generic_methods[i]);
    });
    let caches = manager.finalize(&EmitBaseline::new(&dll()));

    assert_eq!(caches.len(), 100);
    for (i, container) in caches.iter().enumerate() {
        assert_eq!(container.index as usize, i);
        assert_eq!(container.name, format!("<>DelegateCache_{i}"));
        assert_eq!(container.target, Some(program.generic_methods[i]));
        assert_eq!(container.fields.len(), 1);
        assert_eq!(container.attributes, [SynthesizedAttribute::CompilerGenerated]);
    }
}

#[test]
fn generic_container_arity_covers_method_and_containing_type() {
    let program = Program::new(1);
    let manager = DelegateCacheManager::new(program.symbols.clone());

    // Inside `Box<T>`: `Func<int> f = Box<T>.Make000<int>;`
    let conversion = DelegateConversion::new(
        program.func(program.int()),
        program.generic(0, program.box_param(), program.int()),
    )
    .with_context(LoweringContext {
        type_params_in_scope: vec![program.symbols.type_param(program.boxed, 0)],
        ..LoweringContext::default()
    });

    let CacheSite::Generic {
        container,
        field_type,
    } = manager.obtain_cache_site(&conversion)
    else {
        panic!("open conversion should use a generic container");
    };

    assert_eq!(container.container().arity(), 3);
    assert_eq!(
        container.type_args(),
        [program.func(program.int()), program.int(), program.box_param()]
    );
    assert_eq!(field_type, program.func(program.int()));
}

#[test]
fn concrete_targets_share_one_module_scoped_container() {
    let program = Program::new(2);
    let manager = DelegateCacheManager::new(program.symbols.clone());

    let m = DelegateConversion::new(program.action(), program.concrete(0));
    let n = DelegateConversion::new(program.action(), program.concrete(1));
    let (m, n) = (manager.obtain_cache_site(&m), manager.obtain_cache_site(&n));
    assert_eq!(m.container_id(), n.container_id());

    let caches = manager.finalize(&EmitBaseline::new(&dll()));
    assert_eq!(caches.len(), 1);
    let container = &caches.containers[0];
    assert_eq!(container.kind, ContainerKind::ModuleScoped);
    assert_eq!(container.name, "<>ModuleDelegateCache_0");
    let fields: Vec<_> = container.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, ["<M000>Delegate_0", "<M001>Delegate_1"]);
    assert_eq!(
        m.field().unwrap().name(),
        NameSlot::Assigned("<M000>Delegate_0".to_string())
    );
}

#[test]
#[should_panic(expected = "already finalized")]
fn finalizing_twice_is_fatal() {
    let program = Program::new(1);
    let manager = DelegateCacheManager::new(program.symbols.clone());
    manager.obtain_generic_container(program.generic_methods[0]);
    let baseline = EmitBaseline::new(&dll());

    manager.finalize(&baseline);
    manager.finalize(&baseline);
}

#[test]
#[should_panic(expected = "is frozen; no fields can be added")]
fn adding_a_field_after_finalization_is_fatal() {
    let program = Program::new(2);
    let manager = DelegateCacheManager::new(program.symbols.clone());
    let container =
        CacheContainer::ModuleScoped(manager.obtain_module_scoped_container(&program.action()));
    manager.obtain_cache_field(&container, &program.concrete(0));
    manager.finalize(&EmitBaseline::new(&dll()));

    manager.obtain_cache_field(&container, &program.concrete(1));
}

#[test]
fn finalized_containers_stay_reachable() {
    let program = Program::new(3);
    let manager = DelegateCacheManager::new(program.symbols.clone());
    let before = manager.obtain_generic_container(program.generic_methods[2]);
    manager.finalize(&EmitBaseline::new(&dll()));

    let after = manager.obtain_generic_container(program.generic_methods[2]);
    assert!(Arc::ptr_eq(&before, &after));
    assert!(after.name().is_assigned());
}
