//! Get-or-create under contention.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rayon::prelude::*;

use delcache::{lower_conversions, CacheStrategy, DelegateCacheManager, DelegateConversion};

use crate::common::Program;

#[test]
fn one_generic_container_per_target_under_contention() {
    let program = Program::new(100);
    let manager = DelegateCacheManager::new(program.symbols.clone());

    // Every target requested 16 times, interleaved across the pool.
    let requests: Vec<usize> = (0..1600).map(|n| (n * 37) % 100).collect();
    let obtained: Vec<_> = requests
        .par_iter()
        .map(|&i| (i, manager.obtain_generic_container(program.generic_methods[i])))
        .collect();

    let mut winners = vec![None; 100];
    for (i, container) in obtained {
        let winner = winners[i].get_or_insert_with(|| Arc::clone(&container));
        assert!(Arc::ptr_eq(winner, &container), "target {i} saw two containers");
    }
    assert_eq!(manager.containers().len(), 100);
}

#[test]
fn module_scoped_fields_are_created_once_per_target() {
    let program = Program::new(50);
    let manager = DelegateCacheManager::new(program.symbols.clone());

    let conversions: Vec<_> = (0..1000)
        .map(|n| DelegateConversion::new(program.action(), program.concrete(n % 50)))
        .collect();
    let sites = lower_conversions(&manager, &conversions);

    assert!(sites
        .iter()
        .all(|site| site.strategy() == CacheStrategy::ModuleScoped));
    let container_ids: Vec<_> = sites.iter().map(|site| site.container_id()).collect();
    assert!(container_ids.windows(2).all(|pair| pair[0] == pair[1]));

    let containers = manager.containers();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].fields().len(), 50);

    // Same target, same field, wherever it was requested from.
    for (n, site) in sites.iter().enumerate().skip(50) {
        let first = sites[n % 50].field().unwrap();
        assert!(Arc::ptr_eq(first, site.field().unwrap()));
    }
}
