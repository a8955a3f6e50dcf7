//! Typed arguments for the mapping operations.
//!
//! Bit values match Linux so raw syscall arguments convert with
//! `from_bits_retain`; unknown bits survive the conversion and are rejected
//! by the operation itself.

use crate::error::Error;

bitflags::bitflags! {
    /// Requested page protection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Prot: i32 {
        const READ = 0x1;
        const WRITE = 0x2;
        /// Never granted; linear memory is not executable.
        const EXEC = 0x4;
    }
}

bitflags::bitflags! {
    /// Mapping mode flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MapFlags: i32 {
        /// Not supported.
        const SHARED = 0x01;
        /// Required.
        const PRIVATE = 0x02;
        /// Place the mapping exactly at the hint address.
        const FIXED = 0x10;
        /// Required; there is no file backing.
        const ANONYMOUS = 0x20;
    }
}

bitflags::bitflags! {
    /// Flags accepted by `remap`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RemapFlags: i32 {
        /// Allow the mapping to move when it cannot grow in place.
        const MAYMOVE = 0x1;
        /// Not supported.
        const FIXED = 0x2;
    }
}

/// Advisory hints. All are accepted and none has any effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Advice {
    Normal = 0,
    Random = 1,
    Sequential = 2,
    WillNeed = 3,
    DontNeed = 4,
}

impl TryFrom<i32> for Advice {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Random),
            2 => Ok(Self::Sequential),
            3 => Ok(Self::WillNeed),
            4 => Ok(Self::DontNeed),
            _ => Err(Error::InvalidArgument),
        }
    }
}
