use std::sync::Arc;

use delcache_ir::{ContainerId, TypeRef};

use crate::error::CacheError;
use crate::write_once::{NameSlot, WriteOnce};

/// A public static field holding one cached delegate instance.
///
/// In a generic container the field's type is the container's delegate type
/// parameter; in a module-scoped container it is the concrete delegate type.
#[derive(Debug)]
pub struct CacheField {
    container: ContainerId,
    ty: TypeRef,
    target_method_name: Arc<str>,
    sort_key: String,
    name: WriteOnce<String>,
}

impl CacheField {
    pub(crate) fn new(
        container: ContainerId,
        ty: TypeRef,
        target_method_name: Arc<str>,
        sort_key: String,
    ) -> Self {
        CacheField {
            container,
            ty,
            target_method_name,
            sort_key,
            name: WriteOnce::new(),
        }
    }

    /// The container declaring this field.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn target_method_name(&self) -> &str {
        &self.target_method_name
    }

    /// Sort key text of the target method. Fields within a container are
    /// named in ascending ordinal order of this key.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn name(&self) -> NameSlot<String> {
        self.name.get()
    }

    pub(crate) fn try_assign_name(&self, name: String) -> Result<(), CacheError> {
        self.name
            .try_set(name)
            .map_err(|existing| CacheError::NameAlreadyAssigned {
                symbol: format!("cache field for `{}`", self.sort_key),
                existing,
            })
    }

    /// # Panics
    /// Panics if the field was already named.
    pub(crate) fn assign_name(&self, name: String) {
        self.try_assign_name(name)
            .unwrap_or_else(|err| panic!("{err}"));
    }
}
