use std::fmt;

use crate::NodeKind;

const SIZE: usize = 1;

/// Compact set of [`NodeKind`]s.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KindSet {
    bits: [u64; SIZE],
}

impl KindSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn from_kind(kind: NodeKind) -> Self {
        let kind = kind as u16;

        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(
            slot_index < Self::EMPTY.bits.len(),
            "Index out of bounds. Increase the size of the bitset array."
        );

        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = mask;

        Self { bits }
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn new<const N: usize>(kinds: [NodeKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(&Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn with(self, kind: NodeKind) -> Self {
        self.union(&Self::from_kind(kind))
    }

    pub const fn contains(&self, kind: NodeKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        self.bits[slot_index] & mask != 0
    }

    pub const fn is_empty(&self) -> bool {
        let mut i = 0;
        while i < self.bits.len() {
            if self.bits[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeKind> + '_ {
        NodeKind::ALL.iter().copied().filter(|&kind| self.contains(kind))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.name())?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::KindSet;
    use crate::NodeKind;

    #[test]
    fn membership() {
        const OPS: KindSet = KindSet::new([NodeKind::BinaryOperator, NodeKind::UnexposedStmt]);
        assert!(OPS.contains(NodeKind::BinaryOperator));
        assert!(OPS.contains(NodeKind::UnexposedStmt));
        assert!(!OPS.contains(NodeKind::UnaryOperator));
        assert!(KindSet::EMPTY.is_empty());
        assert_eq!(OPS.to_string(), "{BinaryOperator, UnexposedStmt}");
    }
}
