//! The delegate cache manager.
//!
//! One manager exists per compilation (or per submission in an interactive
//! chain). During lowering it hands out containers and fields to any number
//! of threads; afterwards [`DelegateCacheManager::finalize`] names them in a
//! deterministic order.
//!
//! # Phases
//!
//! 1. **Creation** (parallel): `obtain_*` get-or-create through concurrent
//!    maps. At most one container exists per key no matter how many threads
//!    race for it. Nothing is named.
//! 2. **Finalization** (serial, once): containers owned by this manager are
//!    sorted by sort key and named; module-scoped containers freeze.
//!
//! The caller guarantees no `obtain_*` call overlaps finalization.
//!
//! # Chains
//!
//! A submission's generic-container map is seeded, on first use, from the
//! nearest ancestor whose map is non-empty, so unchanged targets keep the
//! containers an earlier submission already emitted. Inherited containers
//! are skipped at finalization by an ownership check.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use delcache_ir::{MethodDefId, MethodRef, SymbolTable, TypeRef};

use crate::analysis::is_fully_concrete;
use crate::container::{
    check_reference_arity, CacheContainer, CacheField, ContainerName, GenericCacheContainer,
    ModuleScopedContainer,
};
use crate::emit::{EmitModule, FinalizedCaches, FinalizedContainer, FinalizedField};
use crate::error::CacheError;
use crate::lower::{CacheSite, CacheStrategy, DelegateConversion};
use crate::names;

/// Identity of a manager, used for container ownership.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ManagerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type GenericMap = DashMap<MethodDefId, Arc<GenericCacheContainer>, FxBuildHasher>;
type ModuleScopedMap = DashMap<TypeRef, Arc<ModuleScopedContainer>, FxBuildHasher>;

/// Registry of every cache container in one compilation.
#[derive(Debug)]
pub struct DelegateCacheManager {
    id: ManagerId,
    symbols: Arc<SymbolTable>,
    previous: Option<Arc<DelegateCacheManager>>,
    generic: OnceLock<GenericMap>,
    module_scoped: ModuleScopedMap,
    finalized: AtomicBool,
}

impl DelegateCacheManager {
    /// A manager for a standalone compilation.
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self::with_previous(symbols, None)
    }

    /// A manager for a submission that follows `previous` in an
    /// interactive chain.
    pub fn for_submission(symbols: Arc<SymbolTable>, previous: Arc<DelegateCacheManager>) -> Self {
        Self::with_previous(symbols, Some(previous))
    }

    fn with_previous(
        symbols: Arc<SymbolTable>,
        previous: Option<Arc<DelegateCacheManager>>,
    ) -> Self {
        let id = ManagerId::next();
        tracing::debug!(
            manager = ?id,
            chained = previous.is_some(),
            "created delegate cache manager"
        );
        DelegateCacheManager {
            id,
            symbols,
            previous,
            generic: OnceLock::new(),
            module_scoped: DashMap::with_hasher(FxBuildHasher),
            finalized: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }

    fn generic_map(&self) -> &GenericMap {
        self.generic.get_or_init(|| self.seed_generic_map())
    }

    fn seed_generic_map(&self) -> GenericMap {
        let inherited = std::iter::successors(self.previous.as_deref(), |m| m.previous.as_deref())
            .find_map(|ancestor| ancestor.generic.get().filter(|map| !map.is_empty()));
        match inherited {
            Some(map) => {
                tracing::debug!(
                    manager = ?self.id,
                    inherited = map.len(),
                    "seeded generic cache containers"
                );
                map.clone()
            }
            None => DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Get or atomically create the generic container for `target`.
    pub fn obtain_generic_container(&self, target: MethodDefId) -> Arc<GenericCacheContainer> {
        let map = self.generic_map();
        if let Some(existing) = map.get(&target) {
            return Arc::clone(existing.value());
        }
        let entry = map.entry(target).or_insert_with(|| {
            Arc::new(GenericCacheContainer::new(self.id, &self.symbols, target))
        });
        Arc::clone(entry.value())
    }

    /// Get or atomically create the module-scoped container for a concrete
    /// delegate type.
    pub fn obtain_module_scoped_container(
        &self,
        delegate_type: &TypeRef,
    ) -> Arc<ModuleScopedContainer> {
        debug_assert!(
            is_fully_concrete(delegate_type),
            "module-scoped containers serve only fully concrete delegate types"
        );
        if let Some(existing) = self.module_scoped.get(delegate_type) {
            return Arc::clone(existing.value());
        }
        let entry = self.module_scoped.entry(delegate_type.clone()).or_insert_with(|| {
            Arc::new(ModuleScopedContainer::new(
                self.id,
                &self.symbols,
                delegate_type.clone(),
            ))
        });
        Arc::clone(entry.value())
    }

    /// The field caching `target` in `container`.
    ///
    /// A generic container has exactly one field. A module-scoped container
    /// creates the field on first request.
    ///
    /// # Panics
    /// Panics if a module-scoped container is already frozen.
    pub fn obtain_cache_field(
        &self,
        container: &CacheContainer,
        target: &MethodRef,
    ) -> Arc<CacheField> {
        self.try_obtain_cache_field(container, target)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`Self::obtain_cache_field`].
    pub fn try_obtain_cache_field(
        &self,
        container: &CacheContainer,
        target: &MethodRef,
    ) -> Result<Arc<CacheField>, CacheError> {
        match container {
            CacheContainer::Generic(generic) => {
                debug_assert_eq!(
                    generic.target(),
                    target.def,
                    "field requested for another target"
                );
                Ok(Arc::clone(generic.field()))
            }
            CacheContainer::ModuleScoped(module_scoped) => {
                module_scoped.try_obtain_field(&self.symbols, target)
            }
        }
    }

    /// Choose a strategy for `conversion` and acquire the container and
    /// field it reads.
    ///
    /// # Panics
    /// Panics on a contract violation; see [`Self::try_obtain_cache_site`].
    pub fn obtain_cache_site(&self, conversion: &DelegateConversion) -> CacheSite {
        self.try_obtain_cache_site(conversion)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`Self::obtain_cache_site`]. Fails if the target
    /// reference supplies the wrong number of type arguments at any level,
    /// or if the module-scoped container is already frozen.
    pub fn try_obtain_cache_site(
        &self,
        conversion: &DelegateConversion,
    ) -> Result<CacheSite, CacheError> {
        check_reference_arity(&self.symbols, &conversion.delegate_type, &conversion.target)?;
        match CacheStrategy::select(&self.symbols, conversion) {
            CacheStrategy::Uncached(reason) => Ok(CacheSite::Uncached(reason)),
            CacheStrategy::ModuleScoped => {
                let container = self.obtain_module_scoped_container(&conversion.delegate_type);
                let field = container.try_obtain_field(&self.symbols, &conversion.target)?;
                Ok(CacheSite::ModuleScoped { container, field })
            }
            CacheStrategy::Generic => {
                let container = self.obtain_generic_container(conversion.target.def);
                let constructed =
                    container.try_construct(&conversion.delegate_type, &conversion.target)?;
                Ok(CacheSite::Generic {
                    field_type: constructed.field_type(),
                    container: constructed,
                })
            }
        }
    }

    /// Name every container this manager owns and freeze module-scoped
    /// containers.
    ///
    /// # Panics
    /// Panics if called twice or if a container was already named.
    pub fn finalize(&self, module: &dyn EmitModule) -> FinalizedCaches {
        self.try_finalize(module).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`Self::finalize`].
    #[tracing::instrument(level = "debug", skip_all, fields(
        manager = ?self.id,
        module = module.module_id(),
        generation = module.generation(),
    ))]
    pub fn try_finalize(&self, module: &dyn EmitModule) -> Result<FinalizedCaches, CacheError> {
        if self.finalized.swap(true, Ordering::AcqRel) {
            return Err(CacheError::AlreadyFinalized);
        }

        for target in module.previously_cached_targets() {
            self.obtain_generic_container(target);
        }

        let module_id = module.module_id();
        let generation = module.generation();
        let slot = module.submission_slot();
        let mut next_index = module.next_container_index();
        let mut allocate = || {
            let index = next_index;
            next_index += 1;
            index
        };

        let generic = self.owned_generic_containers();
        for container in &generic {
            let name = match module.previous_container_name(container.target()) {
                Some(previous) => {
                    tracing::debug!(
                        name = %previous.name,
                        index = previous.index,
                        "reusing container name"
                    );
                    previous
                }
                None => {
                    let index = allocate();
                    ContainerName {
                        name: names::generic_container_name(module_id, index, generation, slot),
                        index,
                    }
                }
            };
            container.assign_name(name);
        }

        let module_scoped = self.owned_module_scoped_containers();
        for container in &module_scoped {
            let index = allocate();
            container.assign_names_and_freeze(ContainerName {
                name: names::module_scoped_container_name(module_id, index, generation, slot),
                index,
            });
        }

        tracing::debug!(
            generic = generic.len(),
            module_scoped = module_scoped.len(),
            "finalized delegate caches"
        );

        let containers = generic
            .into_iter()
            .map(CacheContainer::Generic)
            .chain(module_scoped.into_iter().map(CacheContainer::ModuleScoped))
            .filter_map(|container| self.describe(&container))
            .collect();
        Ok(FinalizedCaches {
            containers,
            next_index,
        })
    }

    /// Generic containers created by this manager, by sort key.
    fn owned_generic_containers(&self) -> Vec<Arc<GenericCacheContainer>> {
        let mut owned: Vec<_> = self
            .generic_map()
            .iter()
            .filter(|entry| entry.value().owner() == self.id)
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        owned.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        owned
    }

    /// Module-scoped containers by sort key.
    fn owned_module_scoped_containers(&self) -> Vec<Arc<ModuleScopedContainer>> {
        let mut owned: Vec<_> = self
            .module_scoped
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        debug_assert!(owned.iter().all(|container| container.owner() == self.id));
        owned.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        owned
    }

    /// Every container visible to this manager, including inherited ones.
    pub fn containers(&self) -> Vec<CacheContainer> {
        let generic = self
            .generic_map()
            .iter()
            .map(|entry| CacheContainer::Generic(Arc::clone(entry.value())));
        let module_scoped = self
            .module_scoped
            .iter()
            .map(|entry| CacheContainer::ModuleScoped(Arc::clone(entry.value())));
        let mut all: Vec<_> = generic.chain(module_scoped).collect();
        all.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        all
    }

    /// Snapshot of a named container for the emit stage.
    fn describe(&self, container: &CacheContainer) -> Option<FinalizedContainer> {
        let name = container.name().as_assigned()?.clone();
        let (target, type_params) = match container {
            CacheContainer::Generic(generic) => (
                Some(generic.target()),
                generic.type_params().iter().map(|param| param.name.to_string()).collect(),
            ),
            CacheContainer::ModuleScoped(_) => (None, Vec::new()),
        };
        let fields = container
            .fields()
            .iter()
            .map(|field| FinalizedField {
                name: field.name().as_assigned().cloned().unwrap_or_default(),
                ty: self.symbols.display_type(field.ty()),
                sort_key: field.sort_key().to_owned(),
            })
            .collect();
        Some(FinalizedContainer {
            kind: container.kind(),
            name: name.name,
            index: name.index,
            target,
            sort_key: container.sort_key().to_owned(),
            type_params,
            attributes: container.synthesized_attributes().to_vec(),
            fields,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
