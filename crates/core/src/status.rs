//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and its label is the
//! wire spelling used in JSON bodies and path segments.

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> $crate::status::StatusId {
                self as $crate::status::StatusId
            }

            /// Resolve a database status ID. Returns `None` for unknown IDs.
            pub fn from_id(id: $crate::status::StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Wire label, e.g. `"PENDING"`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Case-insensitive label lookup.
            pub fn parse(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|s| s.as_str().eq_ignore_ascii_case(label))
            }

            /// Comma-separated list of labels for error messages.
            pub fn labels() -> String {
                Self::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl From<$name> for $crate::status::StatusId {
            fn from(value: $name) -> Self {
                value as $crate::status::StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| {
                    $crate::error::CoreError::BadInput(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        stringify!($name),
                        Self::labels()
                    ))
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use define_status_enum;

define_status_enum! {
    /// Availability of a physical asset. Cached projection of
    /// "an ACTIVE borrowing references this asset".
    AssetStatus {
        Available = 1 => "Available",
        Borrowed = 2 => "Borrowed",
    }
}

define_status_enum! {
    /// Borrowing request lifecycle.
    BorrowingStatus {
        Pending = 1 => "PENDING",
        Active = 2 => "ACTIVE",
        Rejected = 3 => "REJECTED",
        Returned = 4 => "RETURNED",
    }
}

define_status_enum! {
    /// Ownership audit lifecycle.
    AuditStatus {
        Pending = 1 => "PENDING",
        Verified = 2 => "VERIFIED",
        Rejected = 3 => "REJECTED",
    }
}

define_status_enum! {
    /// Service/repair ticket lifecycle.
    ServiceRequestStatus {
        Pending = 1 => "Pending",
        Transit = 2 => "Transit",
        Completed = 3 => "Completed",
    }
}

/// Resolve a raw status ID read from storage, failing loudly on drift between
/// the lookup tables and this crate.
pub fn decode<T>(
    id: StatusId,
    from_id: fn(StatusId) -> Option<T>,
    kind: &'static str,
) -> Result<T, CoreError> {
    from_id(id).ok_or_else(|| CoreError::Internal(format!("Unknown {kind} status id {id}")))
}
