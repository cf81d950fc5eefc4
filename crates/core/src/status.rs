//! Status helper enums mapping to SMALLINT codes shared with worker nodes.
//!
//! The discriminants are wire values: they appear both in the `tasks`
//! table and in the registry hashes workers write, so they must never be
//! renumbered.

/// Status code type matching SMALLINT in the database.
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
            /// Return the wire status code.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its wire code.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
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
    /// Task lifecycle status.
    ///
    /// A freshly created task and a mid-execution task share the Running
    /// code; the two are distinguished only by whether any progress has
    /// been observed yet.
    TaskStatus {
        Running = 1,
        Stopped = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Worker node liveness state as recorded in the registry hash.
    NodeState {
        Online = 1,
        Unregistered = 2,
        Offline = 3,
    }
}

define_status_enum! {
    /// Where a task's target set comes from.
    ///
    /// The four prior-result-set kinds select by stored id list when the
    /// task carries one, otherwise by its saved search filter.
    TargetSource {
        General = 1,
        Project = 2,
        Asset = 3,
        RootDomain = 4,
        Subdomain = 5,
        UrlScan = 6,
    }
}

impl NodeState {
    /// Parse the state field of a registry hash ("1" / "2" / "3").
    pub fn from_field(value: &str) -> Option<Self> {
        value.parse::<StatusId>().ok().and_then(Self::from_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_ids_match_wire_codes() {
        assert_eq!(TaskStatus::Running.id(), 1);
        assert_eq!(TaskStatus::Stopped.id(), 2);
        assert_eq!(TaskStatus::Completed.id(), 3);
    }

    #[test]
    fn node_state_roundtrips_through_code() {
        for state in [NodeState::Online, NodeState::Unregistered, NodeState::Offline] {
            assert_eq!(NodeState::from_id(state.id()), Some(state));
        }
        assert_eq!(NodeState::from_id(0), None);
    }

    #[test]
    fn node_state_parses_hash_field() {
        assert_eq!(NodeState::from_field("1"), Some(NodeState::Online));
        assert_eq!(NodeState::from_field("3"), Some(NodeState::Offline));
        assert_eq!(NodeState::from_field("offline"), None);
    }
}
