//! Generated names for synthesized cache symbols.
//!
//! Every generated name contains `<` or `>` so it can never collide with a
//! name a user can write.
//!
//! | Symbol | Shape |
//! |--------|-------|
//! | generic container | `<module>DelegateCache_{index}[_S{slot}][#{generation}]` |
//! | module-scoped container | `<module>ModuleDelegateCache_{index}[_S{slot}][#{generation}]` |
//! | cache field | `<{method}>Delegate_{position}` |
//! | container type parameter | `T{ordinal}` |

use std::fmt::Write;

/// Name of a generic (per-target-method) container.
pub fn generic_container_name(
    module_id: &str,
    index: u32,
    generation: u32,
    submission_slot: Option<u32>,
) -> String {
    container_name("DelegateCache", module_id, index, generation, submission_slot)
}

/// Name of a module-scoped (per-delegate-type) container.
pub fn module_scoped_container_name(
    module_id: &str,
    index: u32,
    generation: u32,
    submission_slot: Option<u32>,
) -> String {
    container_name("ModuleDelegateCache", module_id, index, generation, submission_slot)
}

/// Name of a cache field: the target method's name and the field's
/// position among its container's fields.
pub fn cache_field_name(target_method_name: &str, position: usize) -> String {
    format!("<{target_method_name}>Delegate_{position}")
}

/// Positional name of a container type parameter.
pub fn container_type_param_name(ordinal: u32) -> String {
    format!("T{ordinal}")
}

fn container_name(
    stem: &str,
    module_id: &str,
    index: u32,
    generation: u32,
    submission_slot: Option<u32>,
) -> String {
    let mut name = format!("<{module_id}>{stem}_{index}");
    if let Some(slot) = submission_slot {
        let _ = write!(name, "_S{slot}");
    }
    if generation > 0 {
        let _ = write!(name, "#{generation}");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_generation_has_no_suffix() {
        assert_eq!(generic_container_name("", 0, 0, None), "<>DelegateCache_0");
        assert_eq!(
            module_scoped_container_name("", 4, 0, None),
            "<>ModuleDelegateCache_4"
        );
    }

    #[test]
    fn module_slot_and_generation_all_appear() {
        assert_eq!(
            generic_container_name("Lib", 12, 3, Some(2)),
            "<Lib>DelegateCache_12_S2#3"
        );
    }

    #[test]
    fn field_and_type_param_names() {
        assert_eq!(cache_field_name("Parse", 1), "<Parse>Delegate_1");
        assert_eq!(container_type_param_name(7), "T7");
    }
}
