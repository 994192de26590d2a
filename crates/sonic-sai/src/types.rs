//! Type-safe SAI object IDs and BST addressing types.
//!
//! Object IDs are strongly typed so a switch ID can never be passed where a
//! port handle (gport) is expected. Operator-facing port numbers, CoS queue
//! indices and BST stat identifiers get their own newtypes as well.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

/// Marker trait for SAI object kinds.
pub trait SaiObjectKind: Send + Sync + 'static {
    /// Returns the SAI object type name for debugging.
    fn type_name() -> &'static str;
}

/// A type-safe SAI object ID.
///
/// # Examples
///
/// ```
/// use sonic_sai::PortOid;
///
/// let gport = PortOid::from_raw(0x1000000000003).unwrap();
/// assert!(gport.is_valid());
/// assert!(PortOid::from_raw(0).is_none());
/// ```
#[derive(Clone, Copy)]
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// The null object ID (SAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self {
        raw: 0,
        _marker: PhantomData,
    };

    /// Creates a new object ID from a raw value.
    ///
    /// Returns `None` if the raw value is 0 (null object ID).
    pub fn from_raw(raw: RawSaiObjectId) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self {
                raw,
                _marker: PhantomData,
            })
        }
    }

    /// Creates a new object ID from a raw value, including null.
    pub const fn from_raw_unchecked(raw: RawSaiObjectId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the raw object ID value.
    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }

    /// Returns true if this is a null object ID.
    pub const fn is_null(&self) -> bool {
        self.raw == 0
    }

    /// Returns true if this is a valid (non-null) object ID.
    pub const fn is_valid(&self) -> bool {
        self.raw != 0
    }
}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:016x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> Default for SaiObjectId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

macro_rules! define_object_kind {
    ($name:ident, $type_name:literal, $oid_alias:ident) => {
        #[doc = concat!("Marker type for SAI ", $type_name, " objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            fn type_name() -> &'static str {
                $type_name
            }
        }

        #[doc = concat!("Type alias for ", $type_name, " object IDs.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(SwitchKind, "Switch", SwitchOid);
define_object_kind!(PortKind, "Port", PortOid);

/// Operator-facing logical port number (front-panel numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortNumber(u32);

impl PortNumber {
    pub const fn new(port: u32) -> Self {
        PortNumber(port)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of class-of-service queues per port.
pub const NUM_COS_QUEUES: usize = 8;

/// Class-of-service queue index, `0..NUM_COS_QUEUES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CosQueue(u8);

impl CosQueue {
    /// Returns the queue with the given index, or `None` if out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < NUM_COS_QUEUES).then_some(CosQueue(index as u8))
    }

    /// All queues of a port in ascending order.
    pub fn all() -> impl Iterator<Item = CosQueue> {
        (0..NUM_COS_QUEUES as u8).map(CosQueue)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CosQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IEEE 802.1Q VLAN identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VlanId(u16);

impl VlanId {
    /// Highest assignable VLAN ID.
    pub const MAX: u16 = 4094;

    /// Returns the VLAN ID, or `None` if outside `1..=4094`.
    pub fn new(id: u16) -> Option<Self> {
        (1..=Self::MAX).contains(&id).then_some(VlanId(id))
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of BST stat ids tracked per queue.
pub const NUM_BST_STATS: usize = 4;

/// Buffer statistics tracking counter identifiers.
///
/// Queue counters are egress occupancy, priority group counters are ingress
/// occupancy split between the shared pool and the headroom pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BstStatId {
    /// Unicast queue occupancy.
    Ucast,
    /// Multicast queue occupancy.
    Mcast,
    /// Priority group shared pool occupancy.
    PriGroupShared,
    /// Priority group headroom occupancy.
    PriGroupHeadroom,
}

impl BstStatId {
    /// Every stat id the device tracks, in bank order.
    pub const ALL: [BstStatId; NUM_BST_STATS] = [
        BstStatId::Ucast,
        BstStatId::Mcast,
        BstStatId::PriGroupShared,
        BstStatId::PriGroupHeadroom,
    ];

    /// Position of this stat in the device counter bank.
    pub const fn bank_index(self) -> usize {
        match self {
            BstStatId::Ucast => 0,
            BstStatId::Mcast => 1,
            BstStatId::PriGroupShared => 2,
            BstStatId::PriGroupHeadroom => 3,
        }
    }

    /// Corresponding SAI watermark stat name.
    pub fn sai_stat_name(&self) -> &'static str {
        match self {
            BstStatId::Ucast | BstStatId::Mcast => "SAI_QUEUE_STAT_SHARED_WATERMARK_BYTES",
            BstStatId::PriGroupShared => "SAI_INGRESS_PRIORITY_GROUP_STAT_SHARED_WATERMARK_BYTES",
            BstStatId::PriGroupHeadroom => {
                "SAI_INGRESS_PRIORITY_GROUP_STAT_XOFF_ROOM_WATERMARK_BYTES"
            }
        }
    }
}
