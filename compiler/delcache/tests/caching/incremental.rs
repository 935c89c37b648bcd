//! Naming stability across generations and submissions.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use delcache::{DelegateCacheManager, EmitBaseline, FinalizedCaches};

use crate::common::{dll, Program};

fn names(caches: &FinalizedCaches) -> Vec<String> {
    caches.iter().map(|c| c.name.clone()).collect()
}

#[test]
fn generations_keep_shipped_names_and_append_new_ones() {
    let program = Program::new(4);
    let symbols = program.symbols.clone();

    let gen0 = DelegateCacheManager::new(symbols.clone());
    gen0.obtain_generic_container(program.generic_methods[1]);
    gen0.obtain_generic_container(program.generic_methods[3]);
    let shipped0 = gen0.finalize(&EmitBaseline::new(&dll()));
    assert_eq!(names(&shipped0), ["<>DelegateCache_0", "<>DelegateCache_1"]);

    let gen1 = DelegateCacheManager::new(symbols.clone());
    gen1.obtain_generic_container(program.generic_methods[0]);
    let baseline = EmitBaseline::from_previous(&dll().with_generation(1), &shipped0);
    let shipped1 = gen1.finalize(&baseline);
    assert_eq!(
        names(&shipped1),
        ["<>DelegateCache_2#1", "<>DelegateCache_0", "<>DelegateCache_1"]
    );

    let gen2 = DelegateCacheManager::new(symbols);
    gen2.obtain_generic_container(program.generic_methods[2]);
    let baseline = EmitBaseline::from_previous(&dll().with_generation(2), &shipped1);
    let shipped2 = gen2.finalize(&baseline);
    assert_eq!(
        names(&shipped2),
        [
            "<>DelegateCache_2#1",
            "<>DelegateCache_0",
            "<>DelegateCache_3#2",
            "<>DelegateCache_1",
        ]
    );
    let indices: Vec<_> = shipped2.iter().map(|c| c.index).collect();
    assert_eq!(indices, [2, 0, 3, 1]);
}

#[test]
fn submission_chain_reuses_containers_of_earlier_submissions() {
    let program = Program::new(3);
    let symbols = program.symbols.clone();

    let first = Arc::new(DelegateCacheManager::new(symbols.clone()));
    let shared = first.obtain_generic_container(program.generic_methods[0]);
    let caches = first.finalize(&EmitBaseline::new(&dll().with_submission_slot(0)));
    assert_eq!(names(&caches), ["<>DelegateCache_0_S0"]);

    let second = Arc::new(DelegateCacheManager::for_submission(
        symbols.clone(),
        Arc::clone(&first),
    ));
    let reused = second.obtain_generic_container(program.generic_methods[0]);
    assert!(Arc::ptr_eq(&shared, &reused));
    second.obtain_generic_container(program.generic_methods[1]);
    let caches = second.finalize(&EmitBaseline::new(&dll().with_submission_slot(1)));
    assert_eq!(names(&caches), ["<>DelegateCache_0_S1"]);

    let third = DelegateCacheManager::for_submission(symbols, second);
    third.obtain_generic_container(program.generic_methods[2]);
    assert_eq!(third.containers().len(), 3);
    let caches = third.finalize(&EmitBaseline::new(&dll().with_submission_slot(2)));
    assert_eq!(names(&caches), ["<>DelegateCache_0_S2"]);

    // Nothing was renamed along the way.
    assert_eq!(
        shared.name().as_assigned().map(|n| n.name.clone()),
        Some("<>DelegateCache_0_S0".to_string())
    );
}
