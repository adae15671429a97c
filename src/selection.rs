use crate::region::RegionId;

/// At most one selected region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection(Option<RegionId>);

impl Selection {
    pub fn select(&mut self, id: RegionId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<RegionId> {
        self.0
    }

    pub fn is(&self, id: RegionId) -> bool {
        self.0 == Some(id)
    }
}

/// One step of list reordering, as offered next to each list entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Up,
    Down,
}

impl Shift {
    /// Destination index for moving the entry at `index`, if it can move.
    pub fn target(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Shift::Up => index.checked_sub(1),
            Shift::Down => (index + 1 < len).then_some(index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FieldRect;
    use crate::region::{FieldType, RegionList};

    #[test]
    fn select_replaces_and_clear_empties() {
        let mut regions = RegionList::new();
        let a = regions.add("a", FieldType::Image, FieldRect::default());
        let b = regions.add("b", FieldType::Stamp, FieldRect::default());
        let mut selection = Selection::default();
        selection.select(a);
        selection.select(b);
        assert!(selection.is(b));
        assert!(!selection.is(a));

        selection.clear();
        assert_eq!(selection.get(), None);
    }

    #[test]
    fn shift_stays_in_bounds() {
        assert_eq!(Shift::Up.target(0, 3), None);
        assert_eq!(Shift::Up.target(2, 3), Some(1));
        assert_eq!(Shift::Down.target(2, 3), None);
        assert_eq!(Shift::Down.target(0, 3), Some(1));
    }
}
