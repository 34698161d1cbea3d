use prism_bridge::{ArrayExtent, DataRange, NativeBridge};
use prism_ids::ObjectID;

/// Where a representation's color data range comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorDataRange {
    /// Follow the first component of the bound scalar array.
    #[default]
    Auto,
    Fixed(DataRange),
}

/// Cached auto range of a representation's scalars.
///
/// The range is recomputed only when the observed array changes identity or extent, or after
/// [`DataRangeObserver::invalidate`].
#[derive(Debug, Default)]
pub struct DataRangeObserver {
    cached: Option<(ObjectID, ArrayExtent, DataRange)>,
    stale: bool,
    recomputations: u32,
}

impl DataRangeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective range for `mode`. `get_array` is only consulted in auto mode.
    pub fn resolve<B, F>(&mut self, mode: ColorDataRange, bridge: &B, get_array: F) -> DataRange
    where
        B: NativeBridge + ?Sized,
        F: FnOnce(&B) -> Option<ObjectID>,
    {
        match mode {
            ColorDataRange::Fixed(range) => range,
            ColorDataRange::Auto => {
                let array = get_array(bridge);
                self.observe(bridge, array)
            }
        }
    }

    fn observe<B: NativeBridge + ?Sized>(&mut self, bridge: &B, array: Option<ObjectID>) -> DataRange {
        let Some((array, extent)) = array.and_then(|a| bridge.array_extent(a).map(|e| (a, e)))
        else {
            self.cached = None;
            self.stale = false;
            return DataRange::EMPTY;
        };

        if !self.stale {
            if let Some((held, held_extent, range)) = self.cached {
                if held == array && held_extent == extent {
                    return range;
                }
            }
        }

        let range = bridge.array_range(array, 0).unwrap_or(DataRange::EMPTY);
        self.recomputations += 1;
        log::trace!("range of {array} is [{}, {}]", range.min, range.max);
        self.cached = Some((array, extent, range));
        self.stale = false;
        range
    }

    /// Forces the next auto resolve to recompute even for the same array.
    #[inline]
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Last resolved range without touching the bridge.
    pub fn current(&self, mode: ColorDataRange) -> DataRange {
        match mode {
            ColorDataRange::Fixed(range) => range,
            ColorDataRange::Auto => self
                .cached
                .map(|(_, _, range)| range)
                .unwrap_or(DataRange::EMPTY),
        }
    }

    #[inline]
    pub fn observed_array(&self) -> Option<ObjectID> {
        self.cached.map(|(array, _, _)| array)
    }

    #[inline]
    pub fn recomputations(&self) -> u32 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_headless::HeadlessBridge;

    #[test]
    fn no_array_means_empty_range() {
        let bridge = HeadlessBridge::new();
        let mut observer = DataRangeObserver::new();
        let range = observer.resolve(ColorDataRange::Auto, &bridge, |_| None);
        assert!(range.is_empty());
        assert_eq!(observer.recomputations(), 0);
    }

    #[test]
    fn all_zero_data_is_a_real_range() {
        let mut bridge = HeadlessBridge::new();
        let array = bridge.create_array(vec![0.0, 0.0, 0.0], 1);
        let mut observer = DataRangeObserver::new();
        let range = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));
        assert_eq!(range, DataRange::new(0.0, 0.0));
        assert!(!range.is_empty());
        assert_eq!(observer.recomputations(), 1);
    }

    #[test]
    fn fixed_range_ignores_data() {
        let mut bridge = HeadlessBridge::new();
        let array = bridge.create_array(vec![0.0, 10.0], 1);
        let mut observer = DataRangeObserver::new();
        let fixed = DataRange::new(1.0, 2.0);
        let range = observer.resolve(ColorDataRange::Fixed(fixed), &bridge, |_| Some(array));
        assert_eq!(range, fixed);
        assert_eq!(observer.recomputations(), 0);
    }

    #[test]
    fn swapping_arrays_recomputes_once() {
        let mut bridge = HeadlessBridge::new();
        let a = bridge.create_array(vec![0.0, 5.0, 10.0], 1);
        let b = bridge.create_array(vec![-5.0, 20.0], 1);
        let mut observer = DataRangeObserver::new();

        let first = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(a));
        assert_eq!(first, DataRange::new(0.0, 10.0));

        let second = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(b));
        assert_eq!(second, DataRange::new(-5.0, 20.0));
        assert_eq!(observer.recomputations(), 2);

        observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(b));
        observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(b));
        assert_eq!(observer.recomputations(), 2);
        assert_eq!(observer.observed_array(), Some(b));
    }

    #[test]
    fn invalidate_picks_up_in_place_edits() {
        let mut bridge = HeadlessBridge::new();
        let array = bridge.create_array(vec![0.0, 1.0], 1);
        let mut observer = DataRangeObserver::new();
        observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));

        bridge.replace_array_values(array, vec![3.0, 4.0]);
        let cached = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));
        assert_eq!(cached, DataRange::new(0.0, 1.0));

        observer.invalidate();
        let fresh = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));
        assert_eq!(fresh, DataRange::new(3.0, 4.0));
        assert_eq!(observer.current(ColorDataRange::Auto), fresh);
    }

    #[test]
    fn resized_array_recomputes() {
        let mut bridge = HeadlessBridge::new();
        let array = bridge.create_array(vec![0.0, 1.0], 1);
        let mut observer = DataRangeObserver::new();
        observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));
        bridge.replace_array_values(array, vec![0.0, 1.0, 9.0]);
        let range = observer.resolve(ColorDataRange::Auto, &bridge, |_| Some(array));
        assert_eq!(range, DataRange::new(0.0, 9.0));
        assert_eq!(observer.recomputations(), 2);
    }
}
