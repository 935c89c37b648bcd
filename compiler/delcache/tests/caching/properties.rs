//! Finalized output depends only on what was created, never on the order.

use proptest::prelude::*;

use delcache::{
    lower_conversions, DelegateCacheManager, DelegateConversion, EmitBaseline, FinalizedCaches,
};

use crate::common::{dll, Program};

const TARGETS: usize = 12;

/// Mixed conversions: each index yields a module-scoped one and an open
/// generic one.
fn conversions(program: &Program, order: &[usize]) -> Vec<DelegateConversion> {
    order
        .iter()
        .flat_map(|&i| {
            [
                DelegateConversion::new(program.action(), program.concrete(i)),
                DelegateConversion::new(
                    program.func(program.box_param()),
                    program.generic(i, program.int(), program.box_param()),
                ),
            ]
        })
        .collect()
}

fn finalize_in(program: &Program, order: &[usize]) -> FinalizedCaches {
    let manager = DelegateCacheManager::new(program.symbols.clone());
    lower_conversions(&manager, &conversions(program, order));
    manager.finalize(&EmitBaseline::new(&dll()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn creation_order_does_not_affect_names(
        order in Just((0..TARGETS).collect::<Vec<_>>()).prop_shuffle(),
        repeats in 1usize..4,
    ) {
        let program = Program::new(TARGETS);
        let sorted: Vec<_> = (0..TARGETS).collect();
        let expected = finalize_in(&program, &sorted);

        let shuffled: Vec<_> = std::iter::repeat(order).take(repeats).flatten().collect();
        let actual = finalize_in(&program, &shuffled);

        prop_assert_eq!(actual.len(), TARGETS + 1);
        prop_assert_eq!(actual, expected);
    }
}
