//! Delegate cache containers for method-group conversions.
//!
//! Lowering turns a static method-group conversion into a read of a static
//! field that holds a lazily created delegate. This crate owns the
//! synthesized types that declare those fields:
//!
//! - [`analysis`]: concreteness and type-parameter dependency checks that
//!   pick a caching strategy.
//! - [`container`]: the generic (per target method) and module-scoped (per
//!   delegate type) container variants and their fields.
//! - [`manager`]: concurrent get-or-create during lowering, then serial,
//!   deterministic naming at finalization.
//! - [`lower`]: strategy selection and a parallel driver.
//! - [`emit`]: the interface to the metadata writer.
//!
//! Symbols come from `delcache_ir`.

pub mod analysis;
pub mod container;
mod error;
pub mod emit;
pub mod lower;
pub mod manager;
pub mod names;
mod options;
mod write_once;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use analysis::{depends_on_type_params, is_fully_concrete};
pub use container::{
    CacheContainer, CacheField, ConstructedContainer, ContainerKind, ContainerName,
    GenericCacheContainer, ModuleScopedContainer, SynthesizedAttribute,
};
pub use emit::{EmitBaseline, EmitModule, FinalizedCaches, FinalizedContainer, FinalizedField};
pub use error::CacheError;
pub use lower::{
    lower_conversions, CacheSite, CacheStrategy, DelegateConversion, LoweringContext,
    UncachedReason,
};
pub use manager::{DelegateCacheManager, ManagerId};
pub use options::{ModuleOptions, OutputKind};
pub use write_once::NameSlot;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
