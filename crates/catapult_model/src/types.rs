//! Primitive types shared by the entity models.

use std::fmt;

/// Chain height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Height(pub u64);

impl Height {
    /// Creates a new height.
    #[must_use]
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// Returns the raw height value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height:{}", self.0)
    }
}

/// Finalization epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FinalizationEpoch(pub u32);

impl FinalizationEpoch {
    /// Creates a new epoch.
    #[must_use]
    pub const fn new(epoch: u32) -> Self {
        Self(epoch)
    }

    /// Returns the raw epoch value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Finalization point within an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FinalizationPoint(pub u32);

impl FinalizationPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(point: u32) -> Self {
        Self(point)
    }

    /// Returns the raw point value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Finalization round, ordered by epoch then point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FinalizationRound {
    /// Epoch of the round.
    pub epoch: FinalizationEpoch,
    /// Point of the round.
    pub point: FinalizationPoint,
}

impl FinalizationRound {
    /// Creates a new round.
    #[must_use]
    pub const fn new(epoch: u32, point: u32) -> Self {
        Self {
            epoch: FinalizationEpoch(epoch),
            point: FinalizationPoint(point),
        }
    }
}

impl fmt::Display for FinalizationRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.epoch.0, self.point.0)
    }
}

/// Transaction type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityType(pub u16);

impl EntityType {
    /// Creates a new entity type.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw type value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Network identifier byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NetworkType(pub u8);

/// Fee amount in atomic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub u64);

/// Network timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

macro_rules! byte_array {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; $size]);

        impl $name {
            /// Size in bytes.
            pub const SIZE: usize = $size;

            /// Creates a value from raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Creates a value with every byte set to `byte`.
            #[must_use]
            pub const fn filled(byte: u8) -> Self {
                Self([byte; $size])
            }

            /// Returns the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0; $size])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in self.0 {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

byte_array!(
    /// 256-bit hash.
    Hash256,
    32
);

byte_array!(
    /// Ed25519 public key.
    Key,
    32
);

byte_array!(
    /// Ed25519 signature.
    Signature,
    64
);

byte_array!(
    /// Voting tree signature: root key, root signature, bottom key, bottom signature.
    TreeSignature,
    192
);
