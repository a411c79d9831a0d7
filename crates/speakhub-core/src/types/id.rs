//! Newtype wrappers around `i64` for all domain entity identifiers.
//!
//! The backend hands out numeric identifiers, so the wrappers are integer
//! based. Using distinct types prevents accidentally passing a `CourseId`
//! where an `ExerciseId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create an identifier from a raw integer.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Return the inner integer value.
            pub fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifies a user account.
    UserId
}

define_id! {
    /// Identifies a course.
    CourseId
}

define_id! {
    /// Identifies an exercise within a course.
    ExerciseId
}

define_id! {
    /// Identifies a submission made by a student.
    SubmissionId
}
