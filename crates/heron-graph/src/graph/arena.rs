//! Slot storage for graph entities.

#[derive(Debug, Clone)]
pub(in crate::graph) struct Arena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(in crate::graph) fn next_index(&self) -> u32 {
        u32::try_from(self.slots.len()).unwrap_or(u32::MAX)
    }

    pub(in crate::graph) fn push(&mut self, value: T) -> u32 {
        let ix = self.next_index();
        self.slots.push(Some(value));
        self.live += 1;
        ix
    }

    pub(in crate::graph) fn get(&self, ix: u32) -> Option<&T> {
        self.slots.get(ix as usize).and_then(Option::as_ref)
    }

    pub(in crate::graph) fn get_mut(&mut self, ix: u32) -> Option<&mut T> {
        self.slots.get_mut(ix as usize).and_then(Option::as_mut)
    }

    pub(in crate::graph) fn remove(&mut self, ix: u32) -> Option<T> {
        let out = self.slots.get_mut(ix as usize).and_then(Option::take);
        if out.is_some() {
            self.live -= 1;
        }
        out
    }

    pub(in crate::graph) fn len(&self) -> usize {
        self.live
    }

    pub(in crate::graph) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(in crate::graph) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}
