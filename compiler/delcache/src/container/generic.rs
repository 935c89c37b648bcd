use std::sync::Arc;

use delcache_ir::{
    ContainerId, DisplayFormat, MethodDefId, MethodRef, ParamOwner, Substitution, SymbolTable,
    TypeParamRef, TypeRef,
};

use super::{
    next_container_id, CacheField, ContainerName, SynthesizedAttribute, CONTAINER_ATTRIBUTES,
};
use crate::error::CacheError;
use crate::manager::ManagerId;
use crate::names;
use crate::write_once::{NameSlot, WriteOnce};

/// Position of the delegate type among a generic container's type
/// parameters. The cache field is typed by this parameter.
pub const DELEGATE_SLOT: usize = 0;

/// Number of type parameters a generic container for `target` declares:
/// one for the delegate type, then one per type parameter in scope of the
/// target (its own, then each containing type's, innermost first).
pub fn needed_arity(symbols: &SymbolTable, target: MethodDefId) -> usize {
    1 + symbols.type_params_in_scope(target).len()
}

/// Reject a method reference whose type arguments do not line up with the
/// declarations of the method and each of its containing types.
pub(crate) fn check_reference_arity(
    symbols: &SymbolTable,
    delegate_type: &TypeRef,
    target: &MethodRef,
) -> Result<(), CacheError> {
    let method = symbols.method_def(target.def);
    let mut declared = symbols.self_and_containing(method.containing);
    let mut supplied = target.containing.self_and_containing();
    let mut matches = target.type_args.len() == method.arity();
    while matches {
        match (declared.next(), supplied.next()) {
            (Some(def), Some(ty)) => {
                matches = ty.def == def && ty.type_args.len() == symbols.type_def(def).arity();
            }
            (None, None) => break,
            _ => matches = false,
        }
    }
    if matches {
        return Ok(());
    }
    Err(CacheError::ArityMismatch {
        expected: needed_arity(symbols, target.def),
        found: GenericCacheContainer::type_arguments_from_conversion(delegate_type, target).len(),
    })
}

/// A per-target-method container with a single cache field.
///
/// The container is generic over the delegate type and every type
/// parameter in scope of the target method, so one definition serves every
/// instantiation of the target. Use [`GenericCacheContainer::construct`] to
/// obtain the instantiation for a particular conversion.
#[derive(Debug)]
pub struct GenericCacheContainer {
    id: ContainerId,
    owner: ManagerId,
    target: MethodDefId,
    sort_key: String,
    type_params: Vec<TypeParamRef>,
    field: Arc<CacheField>,
    name: WriteOnce<ContainerName>,
}

impl GenericCacheContainer {
    pub(crate) fn new(owner: ManagerId, symbols: &SymbolTable, target: MethodDefId) -> Self {
        let id = next_container_id();
        let type_params: Vec<TypeParamRef> = (0u32..)
            .take(needed_arity(symbols, target))
            .map(|ordinal| {
                TypeParamRef::new(
                    ParamOwner::Container(id),
                    ordinal,
                    names::container_type_param_name(ordinal),
                )
            })
            .collect();

        let definition = symbols.method_definition(target);
        let sort_key = symbols.display_method(&definition, DisplayFormat::MethodSortKey);
        let field = CacheField::new(
            id,
            TypeRef::TypeParam(type_params[DELEGATE_SLOT].clone()),
            Arc::clone(&symbols.method_def(target).name),
            sort_key.clone(),
        );

        tracing::trace!(
            container = ?id,
            %sort_key,
            arity = type_params.len(),
            "created generic cache container"
        );

        GenericCacheContainer {
            id,
            owner,
            target,
            sort_key,
            type_params,
            field: Arc::new(field),
            name: WriteOnce::new(),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub(crate) fn owner(&self) -> ManagerId {
        self.owner
    }

    /// The target method definition this container caches.
    pub fn target(&self) -> MethodDefId {
        self.target
    }

    /// Sort key text of the target method definition. Fixed at creation.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// `T0..T{arity-1}`, owned by this container.
    pub fn type_params(&self) -> &[TypeParamRef] {
        &self.type_params
    }

    /// The parameter standing for the delegate type.
    pub fn delegate_type_param(&self) -> &TypeParamRef {
        &self.type_params[DELEGATE_SLOT]
    }

    /// The single cache field, typed by [`Self::delegate_type_param`].
    pub fn field(&self) -> &Arc<CacheField> {
        &self.field
    }

    pub fn name(&self) -> NameSlot<ContainerName> {
        self.name.get()
    }

    pub fn synthesized_attributes(&self) -> &'static [SynthesizedAttribute] {
        CONTAINER_ATTRIBUTES
    }

    /// Type arguments that instantiate a container for this conversion:
    /// the delegate type, the target's method type arguments, then the
    /// type arguments of each containing type, innermost first.
    pub fn type_arguments_from_conversion(
        delegate_type: &TypeRef,
        target: &MethodRef,
    ) -> Vec<TypeRef> {
        let mut args = vec![delegate_type.clone()];
        args.extend(target.type_args.iter().cloned());
        for ty in target.containing.self_and_containing() {
            args.extend(ty.type_args.iter().cloned());
        }
        args
    }

    /// Instantiate this container for a conversion of `target` to
    /// `delegate_type`.
    ///
    /// # Panics
    /// Panics if the conversion supplies a different number of type
    /// arguments than the container declares.
    pub fn construct(
        self: &Arc<Self>,
        delegate_type: &TypeRef,
        target: &MethodRef,
    ) -> ConstructedContainer {
        self.try_construct(delegate_type, target)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible form of [`Self::construct`].
    pub fn try_construct(
        self: &Arc<Self>,
        delegate_type: &TypeRef,
        target: &MethodRef,
    ) -> Result<ConstructedContainer, CacheError> {
        debug_assert_eq!(
            target.def, self.target,
            "conversion target does not match container"
        );
        let type_args = Self::type_arguments_from_conversion(delegate_type, target);
        if type_args.len() != self.arity() {
            return Err(CacheError::ArityMismatch {
                expected: self.arity(),
                found: type_args.len(),
            });
        }
        Ok(ConstructedContainer {
            container: Arc::clone(self),
            type_args,
        })
    }

    /// Assign the final name and index. Also names the field.
    ///
    /// # Panics
    /// Panics if the container was already named.
    pub(crate) fn assign_name(&self, name: ContainerName) {
        if let Err(existing) = self.name.try_set(name) {
            panic!(
                "{}",
                CacheError::NameAlreadyAssigned {
                    symbol: format!("generic cache container for `{}`", self.sort_key),
                    existing: existing.name,
                }
            );
        }
        self.field
            .assign_name(names::cache_field_name(self.field.target_method_name(), 0));
    }
}

/// A generic container applied to the type arguments of one conversion.
#[derive(Clone, Debug)]
pub struct ConstructedContainer {
    container: Arc<GenericCacheContainer>,
    type_args: Vec<TypeRef>,
}

impl ConstructedContainer {
    pub fn container(&self) -> &Arc<GenericCacheContainer> {
        &self.container
    }

    pub fn type_args(&self) -> &[TypeRef] {
        &self.type_args
    }

    /// Maps each container parameter to its argument.
    pub fn substitution(&self) -> Substitution {
        Substitution::from_pairs(self.container.type_params(), &self.type_args)
    }

    /// Type of the cache field in this instantiation: the delegate type.
    pub fn field_type(&self) -> TypeRef {
        self.container.field().ty().substitute(&self.substitution())
    }
}
