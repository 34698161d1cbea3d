//! Type-safe generational identifiers for scene nodes, native objects and subscriptions.
//! All IDs use u64 = index (low 32 bits) | generation (high 32 bits). Index 0 = nil.
//! IDs are created by their owning arena/bridge; slot reuse bumps generation so stale IDs are invalid.

use std::fmt;
use std::hash::Hash;

pub const fn string_to_u64(s: &str) -> u64 {
    let mut hash: u64 = 0xA0761D6478BD642F;
    let bytes = s.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0xE7037ED1A0B428DB);
        hash = mix64(hash);
        i += 1;
    }

    mix64(hash ^ (bytes.len() as u64))
}

pub const fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;
    x
}

// u64 layout: low 32 = index (0 = nil, 1.. = slot), high 32 = generation.
macro_rules! define_generational_id {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(pub u64);

        impl $type_name {
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self::from_parts(id, 0)
            }

            #[inline]
            pub const fn nil() -> Self {
                Self(0)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                (self.0 & 0xFFFF_FFFF) as u32
            }

            #[inline]
            pub const fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }

            #[inline]
            pub const fn from_parts(index: u32, generation: u32) -> Self {
                Self((index as u64) | ((generation as u64) << 32))
            }

            #[inline]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn from_u64(value: u64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn is_nil(self) -> bool {
                self.0 == 0
            }
        }

        impl Default for $type_name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($type_name), "({}:{})"),
                    self.index(),
                    self.generation()
                )
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.index(), self.generation())
            }
        }
    };
}

define_generational_id!(
    NodeID,
    "Node ID: allocated by NodeArena. Index + generation."
);
define_generational_id!(
    ObjectID,
    "Native object ID: allocated by the native bridge. Index + generation."
);
define_generational_id!(
    SubscriptionID,
    "Modified-notification subscription, allocated by the native bridge."
);
define_generational_id!(
    ListenerID,
    "Data event listener, allocated by a representation's event hub."
);

/// Stable identity of a declarative node among its siblings.
///
/// Hosts usually derive keys from strings (`"volume"`, `"reader-0"`); the same string always
/// yields the same key, so re-evaluating a description reuses the node it reconciled last pass.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    pub const fn from_string(s: &str) -> Self {
        Self(string_to_u64(s))
    }

    pub const fn from_index(index: u64) -> Self {
        Self(mix64(index ^ 0x5EED_0000_0000_0000))
    }

    pub fn to_string(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({:016x})", self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}
