//! Typed stage frames.
//!
//! Each pipeline stage consumes the frame type produced by the previous stage
//! and returns the next one, so stages cannot be skipped or reordered:
//!
//! `LoadedFrame` -> `ImputedFrame` -> `EncodedFrame` -> `StandardizedFrame`
//!
//! Frames are only constructed inside the crate, after the stage that
//! guarantees their invariants has run.

use polars::prelude::*;

macro_rules! stage_frame {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(DataFrame);

        impl $name {
            pub(crate) fn new(df: DataFrame) -> Self {
                Self(df)
            }

            /// Borrow the underlying table.
            pub fn as_df(&self) -> &DataFrame {
                &self.0
            }

            /// Take ownership of the underlying table.
            pub fn into_inner(self) -> DataFrame {
                self.0
            }
        }

        impl AsRef<DataFrame> for $name {
            fn as_ref(&self) -> &DataFrame {
                &self.0
            }
        }
    };
}

stage_frame!(
    /// Freshly loaded table with every Titanic column cast to its canonical dtype.
    LoadedFrame
);

stage_frame!(
    /// Table in which `Age`, `Embarked` and `Cabin` have no missing values.
    ImputedFrame
);

stage_frame!(
    /// Table in which `Sex`, `Embarked`, `Cabin` and `Ticket` are integer codes.
    EncodedFrame
);

stage_frame!(
    /// Encoded table with the `<Name>_standardized` columns appended.
    StandardizedFrame
);
