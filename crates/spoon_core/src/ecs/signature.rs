//! Component signatures
//!
//! A signature is a fixed-width bit-vector: bit `k` is set when an entity holds
//! (or a system requires) the component type registered at slot `k`. The width
//! is `MAX_COMPONENTS`; raising it only grows the backing word array.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Maximum number of distinct component types a world can register.
pub const MAX_COMPONENTS: usize = 32;

/// Slot assigned to a component type at registration time.
pub type ComponentSlot = u32;

const WORD_BITS: usize = u64::BITS as usize;
const SIGNATURE_WORDS: usize = MAX_COMPONENTS.div_ceil(WORD_BITS);

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    words: [u64; SIGNATURE_WORDS],
}

impl Signature {
    pub const EMPTY: Signature = Signature {
        words: [0; SIGNATURE_WORDS],
    };

    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Builder form of [`Signature::set`].
    #[must_use]
    pub fn with(mut self, slot: ComponentSlot) -> Self {
        self.set(slot);
        self
    }

    pub fn set(&mut self, slot: ComponentSlot) {
        let (word, bit) = locate(slot);
        self.words[word] |= bit;
    }

    pub fn clear(&mut self, slot: ComponentSlot) {
        let (word, bit) = locate(slot);
        self.words[word] &= !bit;
    }

    pub fn contains(&self, slot: ComponentSlot) -> bool {
        let (word, bit) = locate(slot);
        self.words[word] & bit != 0
    }

    /// Superset test used for system membership: `(self & required) == required`.
    pub fn contains_all(&self, required: &Signature) -> bool {
        (*self & *required) == *required
    }

    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Slots set in this signature, ascending.
    pub fn slots(&self) -> impl Iterator<Item = ComponentSlot> + '_ {
        (0..MAX_COMPONENTS as ComponentSlot).filter(move |&slot| self.contains(slot))
    }
}

#[inline]
fn locate(slot: ComponentSlot) -> (usize, u64) {
    let slot = slot as usize;
    assert!(
        slot < MAX_COMPONENTS,
        "component slot {slot} exceeds signature width {MAX_COMPONENTS}"
    );
    (slot / WORD_BITS, 1u64 << (slot % WORD_BITS))
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(mut self, rhs: Signature) -> Signature {
        for (lhs, rhs) in self.words.iter_mut().zip(rhs.words) {
            *lhs &= rhs;
        }
        self
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(mut self, rhs: Signature) -> Signature {
        for (lhs, rhs) in self.words.iter_mut().zip(rhs.words) {
            *lhs |= rhs;
        }
        self
    }
}

impl FromIterator<ComponentSlot> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentSlot>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.slots()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superset_match() {
        let entity: Signature = [0, 2, 5].into_iter().collect();
        let required = Signature::new().with(0).with(5);

        assert!(entity.contains_all(&required));
        assert!(!required.contains_all(&entity));
        assert!(entity.contains_all(&Signature::EMPTY));
    }

    #[test]
    fn set_and_clear() {
        let mut sig = Signature::new();
        sig.set(31);
        assert!(sig.contains(31));
        assert_eq!(sig.count(), 1);

        sig.clear(31);
        assert!(sig.is_empty());
    }

    #[test]
    #[should_panic(expected = "exceeds signature width")]
    fn slot_past_width_panics() {
        Signature::new().set(MAX_COMPONENTS as ComponentSlot);
    }
}
