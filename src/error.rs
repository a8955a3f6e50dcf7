//! Error vocabulary shared by every mapping operation.

/// Linux errno values used at the syscall boundary.
pub mod errno {
    pub const ENOMEM: i32 = 12;
    pub const EINVAL: i32 = 22;
    pub const ENOSYS: i32 = 38;
    pub const EOPNOTSUPP: i32 = 95;
}

/// Why a mapping operation was refused.
///
/// Every operation validates completely before touching the bitmap or
/// growing memory, so an `Err` always means nothing changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Misaligned or out-of-range address, zero length, unknown flag or
    /// advice, or a range that is not currently mapped.
    #[error("invalid argument")]
    InvalidArgument,
    /// No free run is large enough, the request exceeds the address space,
    /// or the host refused to grow linear memory.
    #[error("out of memory")]
    OutOfMemory,
    /// Shared, file-backed or executable mappings, or a fixed-address remap.
    #[error("operation not supported")]
    NotSupported,
}

impl Error {
    /// Positive errno for this error.
    pub const fn errno(self) -> i32 {
        match self {
            Self::InvalidArgument => errno::EINVAL,
            Self::OutOfMemory => errno::ENOMEM,
            Self::NotSupported => errno::EOPNOTSUPP,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
