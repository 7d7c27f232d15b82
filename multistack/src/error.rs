//! multistack's error types
//!
//! Errors are plain values: a kind describing what went wrong, and the lane the failed operation was
//! addressed to, if there was one. Both are `Copy`, so errors can be freely returned, compared and
//! stored by callers.

pub type Result<T> = core::result::Result<T, Error>;

/// Shorthand for building multistack error structure.
///
/// The kind is given without specifying the type, as if `ErrorKind` variants were imported.
/// Optional second argument is the lane the error concerns.
#[macro_export]
macro_rules! mserr {
    ($kind:ident, $lane:expr) => {
        $crate::error::Error {
            kind: $crate::error::ErrorKind::$kind,
            lane: Some($lane),
        }
    };
    ($kind:ident) => {
        $crate::error::Error {
            kind: $crate::error::ErrorKind::$kind,
            lane: None,
        }
    };
}

macro_rules! ienum {
    (
        $(#[$meta:meta])*
        pub enum $ident:ident {
            $($(#[$vmeta:meta])* $variant:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[non_exhaustive]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $ident {
            $($(#[$vmeta])* $variant),*
        }

        impl From<u8> for $ident {
            fn from(val: u8) -> Self {
                $(
                    if val == $ident::$variant as u8 {
                        return $ident::$variant;
                    }
                )*
                $ident::Other
            }
        }

        impl $ident {
            pub const fn to_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }

        impl AsRef<str> for $ident {
            fn as_ref(&self) -> &str {
                self.to_str()
            }
        }

        impl core::fmt::Display for $ident {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    };
}

ienum! {
    /// Kind of failure reported by a store operation.
    pub enum ErrorKind {
        /// Store was constructed with zero lanes or zero total capacity.
        InvalidArgument,
        /// Lane index is outside `0..num_lanes`.
        InvalidLaneIndex,
        /// Pop or peek on a lane with no elements.
        EmptyStack,
        /// Every slot of the store is occupied, repacking can not free any.
        StoreExhausted,
        /// Lane bookkeeping does not add up. Indicates a bug in the store itself.
        CapacityInvariantViolated,
        Other,
    }
}

/// multistack's error type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Error {
    pub kind: ErrorKind,
    pub lane: Option<usize>,
}

impl Error {
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind, lane: None }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Attach the lane the error concerns.
    pub const fn with_lane(self, lane: usize) -> Self {
        Self {
            lane: Some(lane),
            ..self
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.lane {
            Some(lane) => write!(f, "{} on lane {}", self.kind, lane),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
