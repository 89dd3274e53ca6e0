use std::num::{NonZeroU64, NonZeroUsize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Declares a counter newtype that rejects zero, for worker counts, request
/// budgets and histogram sizes.
macro_rules! positive_newtype {
    ($name:ident, $inner:ty, $raw:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name($inner);

        impl $name {
            #[must_use]
            pub const fn get(self) -> $raw {
                self.0.get()
            }
        }

        impl TryFrom<$raw> for $name {
            type Error = ValidationError;

            fn try_from(value: $raw) -> Result<Self, Self::Error> {
                <$inner>::new(value)
                    .map(Self)
                    .ok_or(ValidationError::ValueTooSmall { min: 1 })
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.trim()
                    .parse::<$raw>()
                    .map_err(|err| ValidationError::InvalidNumber { source: err })
                    .and_then(Self::try_from)
            }
        }
    };
}

positive_newtype!(PositiveU64, NonZeroU64, u64);
positive_newtype!(PositiveUsize, NonZeroUsize, usize);
