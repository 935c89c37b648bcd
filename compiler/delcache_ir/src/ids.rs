//! Dense identifiers for definitions and synthesized containers.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw u32 value.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Position in the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

define_id!(
    /// Index of a [`TypeDef`](crate::TypeDef) in a [`SymbolTable`](crate::SymbolTable).
    TypeDefId,
    "TypeDefId"
);

define_id!(
    /// Index of a [`MethodDef`](crate::MethodDef) in a [`SymbolTable`](crate::SymbolTable).
    ///
    /// This is the canonical (definition) identity of a method: every
    /// instantiation of a generic method shares it.
    MethodDefId,
    "MethodDefId"
);

define_id!(
    /// Identity of a synthesized cache container.
    ///
    /// Allocated by the cache subsystem; appears here only because container
    /// type parameters are owned by it.
    ContainerId,
    "ContainerId"
);

const _: () = assert!(std::mem::size_of::<MethodDefId>() == 4);
