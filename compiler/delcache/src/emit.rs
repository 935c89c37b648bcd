//! The boundary between finalization and the metadata writer.
//!
//! Finalization reads module-level naming inputs through [`EmitModule`] and
//! hands back a [`FinalizedCaches`] describing every container to write.
//! [`EmitBaseline`] is the standard [`EmitModule`]: built from
//! [`ModuleOptions`] and, for incremental generations, the previous
//! generation's [`FinalizedCaches`].

use rustc_hash::FxHashMap;

use delcache_ir::MethodDefId;

use crate::container::{ContainerKind, ContainerName, SynthesizedAttribute};
use crate::options::ModuleOptions;

/// Naming inputs the emit stage supplies to finalization.
pub trait EmitModule {
    /// Token embedded in container names. Empty unless the output is a
    /// net-module.
    fn module_id(&self) -> &str;

    /// Incremental generation ordinal; 0 for a full build.
    fn generation(&self) -> u32;

    /// Interactive submission slot, if any.
    fn submission_slot(&self) -> Option<u32>;

    /// First index new containers may use.
    fn next_container_index(&self) -> u32;

    /// Name and index a previous generation gave the generic container
    /// for `target`.
    fn previous_container_name(&self, target: MethodDefId) -> Option<ContainerName>;

    /// Targets whose generic containers a previous generation emitted.
    fn previously_cached_targets(&self) -> Vec<MethodDefId>;
}

/// One cache field as it will be written.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalizedField {
    pub name: String,
    /// Display text of the field type.
    pub ty: String,
    pub sort_key: String,
}

/// One container as it will be written.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalizedContainer {
    pub kind: ContainerKind,
    pub name: String,
    pub index: u32,
    /// Target method of a generic container.
    pub target: Option<MethodDefId>,
    pub sort_key: String,
    pub type_params: Vec<String>,
    pub attributes: Vec<SynthesizedAttribute>,
    pub fields: Vec<FinalizedField>,
}

/// Every container a manager named, in finalization order: generic
/// containers by sort key, then module-scoped containers by sort key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalizedCaches {
    pub containers: Vec<FinalizedContainer>,
    /// One past every index reserved so far, including indices carried
    /// in from earlier generations that named nothing here.
    pub next_index: u32,
}

impl FinalizedCaches {
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinalizedContainer> {
        self.containers.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&FinalizedContainer> {
        self.containers.iter().find(|container| container.name == name)
    }

    /// First index a later generation may hand out.
    pub fn next_index(&self) -> u32 {
        self.containers
            .iter()
            .map(|container| container.index + 1)
            .fold(self.next_index, u32::max)
    }
}

/// [`EmitModule`] backed by module options and an optional previous
/// generation.
#[derive(Clone, Debug)]
pub struct EmitBaseline {
    module_id: String,
    generation: u32,
    submission_slot: Option<u32>,
    next_index: u32,
    previous: FxHashMap<MethodDefId, ContainerName>,
}

impl EmitBaseline {
    /// A baseline with no history.
    pub fn new(options: &ModuleOptions) -> Self {
        EmitBaseline {
            module_id: options.module_id(),
            generation: options.generation,
            submission_slot: options.submission_slot,
            next_index: 0,
            previous: FxHashMap::default(),
        }
    }

    /// A baseline continuing from `previous`: indices already shipped are
    /// reserved and generic containers keep their names.
    ///
    /// Module-scoped containers are not carried forward; their indices are
    /// still reserved.
    pub fn from_previous(options: &ModuleOptions, previous: &FinalizedCaches) -> Self {
        let mut baseline = Self::new(options);
        baseline.next_index = previous.next_index();
        for container in previous.iter() {
            if let Some(target) = container.target {
                baseline.previous.insert(
                    target,
                    ContainerName {
                        name: container.name.clone(),
                        index: container.index,
                    },
                );
            }
        }
        baseline
    }
}

impl EmitModule for EmitBaseline {
    fn module_id(&self) -> &str {
        &self.module_id
    }

    fn generation(&self) -> u32 {
        self.generation
    }

    fn submission_slot(&self) -> Option<u32> {
        self.submission_slot
    }

    fn next_container_index(&self) -> u32 {
        self.next_index
    }

    fn previous_container_name(&self, target: MethodDefId) -> Option<ContainerName> {
        self.previous.get(&target).cloned()
    }

    fn previously_cached_targets(&self) -> Vec<MethodDefId> {
        let mut targets: Vec<_> = self.previous.keys().copied().collect();
        targets.sort_unstable();
        targets
    }
}
