use super::texture::TextureId;

/// Batch-local mapping from texture slot to texture.
///
/// Slot 0 always holds the white texture. Slots `1..len()` hold the textures
/// referenced by the current batch in first-seen order.
#[derive(Debug)]
pub(super) struct TextureSlots {
    slots: Vec<TextureId>,
    capacity: usize,
}

impl TextureSlots {
    pub(super) fn new(white: TextureId, capacity: usize) -> Self {
        debug_assert!(capacity >= 2, "slot table needs room beyond the white texture");
        let mut slots = Vec::with_capacity(capacity);
        slots.push(white);
        Self { slots, capacity }
    }

    /// Slot already holding `id`, if any. First match wins.
    #[inline]
    pub(super) fn find(&self, id: TextureId) -> Option<u32> {
        self.slots.iter().position(|&s| s == id).map(|i| i as u32)
    }

    #[inline]
    pub(super) fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Binds `id` to the next free slot and returns that slot.
    ///
    /// Callers flush before this is reached with a full table.
    pub(super) fn bind(&mut self, id: TextureId) -> u32 {
        debug_assert!(!self.is_full(), "texture slot table overflow");
        self.slots.push(id);
        (self.slots.len() - 1) as u32
    }

    /// Occupied slots, slot 0 first.
    #[inline]
    pub(super) fn occupied(&self) -> &[TextureId] {
        &self.slots
    }

    /// Drops every slot except the white texture.
    #[inline]
    pub(super) fn reset(&mut self) {
        self.slots.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: TextureId = TextureId::from_raw(0);

    fn tex(n: u32) -> TextureId {
        TextureId::from_raw(100 + n)
    }

    #[test]
    fn white_texture_is_slot_zero() {
        let slots = TextureSlots::new(WHITE, 4);
        assert_eq!(slots.occupied(), &[WHITE]);
        assert_eq!(slots.find(WHITE), Some(0));
    }

    #[test]
    fn bind_assigns_first_seen_order() {
        let mut slots = TextureSlots::new(WHITE, 4);
        assert_eq!(slots.bind(tex(7)), 1);
        assert_eq!(slots.bind(tex(3)), 2);
        assert_eq!(slots.find(tex(3)), Some(2));
        assert_eq!(slots.find(tex(7)), Some(1));
        assert_eq!(slots.find(tex(9)), None);
    }

    #[test]
    fn full_when_capacity_reached() {
        let mut slots = TextureSlots::new(WHITE, 3);
        slots.bind(tex(1));
        assert!(!slots.is_full());
        slots.bind(tex(2));
        assert!(slots.is_full());
    }

    #[test]
    fn reset_keeps_only_white() {
        let mut slots = TextureSlots::new(WHITE, 3);
        slots.bind(tex(1));
        slots.bind(tex(2));
        slots.reset();
        assert_eq!(slots.occupied(), &[WHITE]);
        assert_eq!(slots.bind(tex(2)), 1);
    }
}
