use core::fmt;
use core::num::NonZeroU32;

/// 1-based index of a node or link, unique within its class.
///
/// The toolkit numbers entities from 1, so the index is stored as-is in a
/// `NonZeroU32`; `Option<EntityIndex>` stays the size of a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityIndex(NonZeroU32);

impl EntityIndex {
    /// Wrap a 1-based index. Returns `None` for 0.
    pub fn new(index: u32) -> Option<Self> {
        NonZeroU32::new(index).map(Self)
    }

    /// The 1-based index value.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Zero-based position, for indexing into per-entity vectors.
    pub fn position(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// All indices `1..=count`, in order.
    pub fn range(count: usize) -> impl Iterator<Item = EntityIndex> + Clone {
        (1..=count as u32).filter_map(Self::new)
    }
}

impl fmt::Debug for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityIndex({})", self.get())
    }
}

impl fmt::Display for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
