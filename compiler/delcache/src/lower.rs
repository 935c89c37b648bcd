//! Strategy selection for delegate conversions and the parallel driver.
//!
//! A method-group conversion to a delegate type may be cached in one of two
//! container variants, or not at all:
//!
//! | Condition | Strategy |
//! |-----------|----------|
//! | instance target, expression tree, or static constructor | uncached |
//! | delegate type and target fully concrete | module-scoped |
//! | local function capturing outer type parameters | uncached |
//! | otherwise | generic |

use std::sync::Arc;

use rayon::prelude::*;

use delcache_ir::{ContainerId, MethodFlags, MethodRef, SymbolTable, TypeParamRef, TypeRef};

use crate::analysis::{depends_on_type_params, is_fully_concrete};
use crate::container::{CacheField, ConstructedContainer, ModuleScopedContainer};
use crate::manager::DelegateCacheManager;

/// What surrounds a conversion site.
#[derive(Clone, Debug, Default)]
pub struct LoweringContext {
    /// Type parameters of the enclosing method and its containing types.
    pub type_params_in_scope: Vec<TypeParamRef>,
    pub in_expression_tree: bool,
    pub in_static_constructor: bool,
}

/// A method-group conversion discovered while lowering a method body.
#[derive(Clone, Debug)]
pub struct DelegateConversion {
    pub delegate_type: TypeRef,
    pub target: MethodRef,
    pub context: LoweringContext,
}

impl DelegateConversion {
    pub fn new(delegate_type: TypeRef, target: MethodRef) -> Self {
        DelegateConversion {
            delegate_type,
            target,
            context: LoweringContext::default(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: LoweringContext) -> Self {
        self.context = context;
        self
    }
}

/// Why a conversion allocates a fresh delegate every time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UncachedReason {
    /// The delegate would capture a receiver.
    InstanceTarget,
    /// The conversion is quoted, not executed.
    ExpressionTree,
    /// Static constructors run once; caching buys nothing.
    StaticConstructor,
    /// The target's signature mentions type parameters a container cannot
    /// carry.
    CapturedTypeParameters,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheStrategy {
    Uncached(UncachedReason),
    Generic,
    ModuleScoped,
}

impl CacheStrategy {
    pub fn select(symbols: &SymbolTable, conversion: &DelegateConversion) -> Self {
        let target = symbols.method_def(conversion.target.def);
        let context = &conversion.context;

        if !target.is_static() {
            return CacheStrategy::Uncached(UncachedReason::InstanceTarget);
        }
        if context.in_expression_tree {
            return CacheStrategy::Uncached(UncachedReason::ExpressionTree);
        }
        if context.in_static_constructor {
            return CacheStrategy::Uncached(UncachedReason::StaticConstructor);
        }
        if is_fully_concrete(&conversion.delegate_type) && is_fully_concrete(&conversion.target) {
            return CacheStrategy::ModuleScoped;
        }
        if target.flags.contains(MethodFlags::LOCAL_FUNCTION)
            && captures_outer_type_params(symbols, conversion)
        {
            return CacheStrategy::Uncached(UncachedReason::CapturedTypeParameters);
        }
        CacheStrategy::Generic
    }
}

/// Whether the target's declared signature mentions an in-scope type
/// parameter that belongs neither to the target nor to its containing
/// types. A generic container only forwards the latter.
fn captures_outer_type_params(symbols: &SymbolTable, conversion: &DelegateConversion) -> bool {
    let own = symbols.type_params_in_scope(conversion.target.def);
    let captured: Vec<TypeParamRef> = conversion
        .context
        .type_params_in_scope
        .iter()
        .filter(|param| !own.contains(param))
        .cloned()
        .collect();
    if captured.is_empty() {
        return false;
    }
    let target = symbols.method_def(conversion.target.def);
    target
        .params
        .iter()
        .chain(&target.return_type)
        .any(|ty| depends_on_type_params(ty, &captured))
}

/// Where a lowered conversion reads its cached delegate from.
#[derive(Clone, Debug)]
pub enum CacheSite {
    Uncached(UncachedReason),
    Generic {
        container: ConstructedContainer,
        /// The field's type in this instantiation.
        field_type: TypeRef,
    },
    ModuleScoped {
        container: Arc<ModuleScopedContainer>,
        field: Arc<CacheField>,
    },
}

impl CacheSite {
    pub fn strategy(&self) -> CacheStrategy {
        match self {
            CacheSite::Uncached(reason) => CacheStrategy::Uncached(*reason),
            CacheSite::Generic { .. } => CacheStrategy::Generic,
            CacheSite::ModuleScoped { .. } => CacheStrategy::ModuleScoped,
        }
    }

    pub fn container_id(&self) -> Option<ContainerId> {
        match self {
            CacheSite::Uncached(_) => None,
            CacheSite::Generic { container, .. } => Some(container.container().id()),
            CacheSite::ModuleScoped { container, .. } => Some(container.id()),
        }
    }

    pub fn field(&self) -> Option<&Arc<CacheField>> {
        match self {
            CacheSite::Uncached(_) => None,
            CacheSite::Generic { container, .. } => Some(container.container().field()),
            CacheSite::ModuleScoped { field, .. } => Some(field),
        }
    }
}

/// Acquire a cache site for every conversion, in parallel. Results are in
/// input order.
///
/// # Panics
/// Panics if a conversion violates a container contract.
#[tracing::instrument(level = "debug", skip_all, fields(count = conversions.len()))]
pub fn lower_conversions(
    manager: &DelegateCacheManager,
    conversions: &[DelegateConversion],
) -> Vec<CacheSite> {
    conversions
        .par_iter()
        .map(|conversion| manager.obtain_cache_site(conversion))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
