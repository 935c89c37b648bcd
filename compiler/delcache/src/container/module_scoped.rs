use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use delcache_ir::{ContainerId, DisplayFormat, MethodRef, SymbolTable, TypeRef};

use super::{
    next_container_id, CacheField, ContainerName, SynthesizedAttribute, CONTAINER_ATTRIBUTES,
};
use crate::error::CacheError;
use crate::manager::ManagerId;
use crate::names;
use crate::write_once::{NameSlot, WriteOnce};

/// A non-generic container serving one concrete delegate type.
///
/// Holds one field per distinct target method cached for that delegate
/// type anywhere in the module. Fields are added concurrently during
/// lowering and the set is frozen when the container is named.
#[derive(Debug)]
pub struct ModuleScopedContainer {
    id: ContainerId,
    owner: ManagerId,
    delegate_type: TypeRef,
    sort_key: String,
    fields: DashMap<MethodRef, Arc<CacheField>, FxBuildHasher>,
    frozen: AtomicBool,
    name: WriteOnce<ContainerName>,
}

impl ModuleScopedContainer {
    pub(crate) fn new(owner: ManagerId, symbols: &SymbolTable, delegate_type: TypeRef) -> Self {
        let id = next_container_id();
        let sort_key = symbols.display_type(&delegate_type);
        tracing::trace!(container = ?id, %sort_key, "created module-scoped cache container");
        ModuleScopedContainer {
            id,
            owner,
            delegate_type,
            sort_key,
            fields: DashMap::with_hasher(FxBuildHasher),
            frozen: AtomicBool::new(false),
            name: WriteOnce::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub(crate) fn owner(&self) -> ManagerId {
        self.owner
    }

    pub fn delegate_type(&self) -> &TypeRef {
        &self.delegate_type
    }

    /// Display text of the delegate type. Fixed at creation.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn name(&self) -> NameSlot<ContainerName> {
        self.name.get()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn synthesized_attributes(&self) -> &'static [SynthesizedAttribute] {
        CONTAINER_ATTRIBUTES
    }

    /// Fields ordered by sort key.
    pub fn fields(&self) -> Vec<Arc<CacheField>> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        fields.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        fields
    }

    /// Get or atomically create the field caching `target`.
    pub(crate) fn try_obtain_field(
        &self,
        symbols: &SymbolTable,
        target: &MethodRef,
    ) -> Result<Arc<CacheField>, CacheError> {
        if self.is_frozen() {
            return Err(CacheError::ContainerFrozen {
                container: self
                    .name()
                    .as_assigned()
                    .map_or_else(|| self.sort_key.clone(), |name| name.name.clone()),
            });
        }

        let entry = self.fields.entry(target.clone()).or_insert_with(|| {
            let sort_key = symbols.display_method(target, DisplayFormat::MethodSortKey);
            tracing::trace!(container = ?self.id, %sort_key, "created cache field");
            Arc::new(CacheField::new(
                self.id,
                self.delegate_type.clone(),
                Arc::clone(&symbols.method_def(target.def).name),
                sort_key,
            ))
        });
        Ok(Arc::clone(entry.value()))
    }

    /// Assign the container's name, freeze the field set, then name each
    /// field by its position in sort-key order.
    ///
    /// # Panics
    /// Panics if the container was already named.
    pub(crate) fn assign_names_and_freeze(&self, name: ContainerName) {
        if let Err(existing) = self.name.try_set(name) {
            panic!(
                "{}",
                CacheError::NameAlreadyAssigned {
                    symbol: format!("module-scoped cache container for `{}`", self.sort_key),
                    existing: existing.name,
                }
            );
        }
        self.frozen.store(true, Ordering::Release);
        for (position, field) in self.fields().iter().enumerate() {
            field.assign_name(names::cache_field_name(field.target_method_name(), position));
        }
    }
}
