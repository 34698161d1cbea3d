/// Per-scope "a render is owed" flag.
///
/// Any number of `track(true)` calls between two `consume_and_reset` calls collapse into one
/// pending render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirtyAccumulator {
    modified: bool,
}

impl DirtyAccumulator {
    #[inline]
    pub const fn new() -> Self {
        Self { modified: false }
    }

    #[inline]
    pub fn track(&mut self, changed: bool) {
        self.modified |= changed;
    }

    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn consume_and_reset(&mut self) -> bool {
        std::mem::take(&mut self.modified)
    }
}
