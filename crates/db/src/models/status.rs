//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up the variant for a database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( x if x == $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Dress instance lifecycle status (`dress_instance_statuses`).
    DressInstanceStatus {
        Available = 1,
        Reserved = 2,
        Rented = 3,
        Maintenance = 4,
    }
}

impl From<DressInstanceStatus> for bridal_core::rental::InstanceStatus {
    fn from(value: DressInstanceStatus) -> Self {
        match value {
            DressInstanceStatus::Available => Self::Available,
            DressInstanceStatus::Reserved => Self::Reserved,
            DressInstanceStatus::Rented => Self::Rented,
            DressInstanceStatus::Maintenance => Self::Maintenance,
        }
    }
}
