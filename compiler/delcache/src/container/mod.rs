//! Synthesized cache containers and their fields.
//!
//! A container is a static, internal, abstract+sealed class declared in the
//! global namespace whose only purpose is to host cache fields. There are
//! two variants with the same role:
//!
//! - [`GenericCacheContainer`]: one per target method definition. Its type
//!   parameters mirror the generic context of the conversion, so a single
//!   definition serves every instantiation. Exactly one field.
//! - [`ModuleScopedContainer`]: one per concrete delegate type. Non-generic;
//!   holds one field per distinct (fully concrete) target method.
//!
//! Both are created during parallel lowering, carry an immutable sort key
//! from birth, and receive their name and index once, serially, during
//! finalization.

mod field;
mod generic;
mod module_scoped;

pub use field::CacheField;
pub(crate) use generic::check_reference_arity;
pub use generic::{needed_arity, ConstructedContainer, GenericCacheContainer, DELEGATE_SLOT};
pub use module_scoped::ModuleScopedContainer;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use delcache_ir::ContainerId;

use crate::write_once::NameSlot;

/// Final name and metadata index of a container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerName {
    pub name: String,
    pub index: u32,
}

/// Which caching strategy a container implements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
    Generic,
    ModuleScoped,
}

/// Attributes the attribute-synthesis step attaches to a container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum SynthesizedAttribute {
    CompilerGenerated,
}

impl SynthesizedAttribute {
    /// Fully qualified name of the attribute type.
    pub const fn type_name(self) -> &'static str {
        match self {
            SynthesizedAttribute::CompilerGenerated => {
                "System.Runtime.CompilerServices.CompilerGeneratedAttribute"
            }
        }
    }
}

const CONTAINER_ATTRIBUTES: &[SynthesizedAttribute] = &[SynthesizedAttribute::CompilerGenerated];

/// Allocate a process-unique container id.
///
/// Container type parameters are owned by the container id, so ids must
/// stay unique across every manager in a submission chain.
fn next_container_id() -> ContainerId {
    static NEXT: AtomicU32 = AtomicU32::new(0);
    ContainerId::from_raw(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Either container variant.
#[derive(Clone, Debug)]
pub enum CacheContainer {
    Generic(Arc<GenericCacheContainer>),
    ModuleScoped(Arc<ModuleScopedContainer>),
}

impl CacheContainer {
    pub fn id(&self) -> ContainerId {
        match self {
            CacheContainer::Generic(c) => c.id(),
            CacheContainer::ModuleScoped(c) => c.id(),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            CacheContainer::Generic(_) => ContainerKind::Generic,
            CacheContainer::ModuleScoped(_) => ContainerKind::ModuleScoped,
        }
    }

    pub fn sort_key(&self) -> &str {
        match self {
            CacheContainer::Generic(c) => c.sort_key(),
            CacheContainer::ModuleScoped(c) => c.sort_key(),
        }
    }

    pub fn name(&self) -> NameSlot<ContainerName> {
        match self {
            CacheContainer::Generic(c) => c.name(),
            CacheContainer::ModuleScoped(c) => c.name(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            CacheContainer::Generic(c) => c.arity(),
            CacheContainer::ModuleScoped(_) => 0,
        }
    }

    /// Fields in final (sort key) order.
    pub fn fields(&self) -> Vec<Arc<CacheField>> {
        match self {
            CacheContainer::Generic(c) => vec![Arc::clone(c.field())],
            CacheContainer::ModuleScoped(c) => c.fields(),
        }
    }

    /// Attributes the attribute-synthesis step must attach.
    pub fn synthesized_attributes(&self) -> &'static [SynthesizedAttribute] {
        CONTAINER_ATTRIBUTES
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
