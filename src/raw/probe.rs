// A linear probe sequence.
//
// The sequence starts at a key's ideal slot and walks forward one bucket at a
// time, wrapping around at the end of the table. `distance` is the probe
// distance of the record being carried to `i`, which insertion may swap out
// for a displaced resident midway.
pub struct Probe {
    // The current index in the probe sequence.
    pub i: usize,
    // The current length of the probe sequence.
    pub distance: usize,
    // The length of the table.
    capacity: usize,
}

impl Probe {
    // Initialize the probe sequence at the given ideal slot.
    #[inline]
    pub fn start(ideal: usize, capacity: usize) -> Probe {
        debug_assert!(ideal < capacity);
        Probe {
            i: ideal,
            distance: 0,
            capacity,
        }
    }

    // Increment the probe sequence.
    #[inline]
    pub fn next(&mut self) {
        self.distance += 1;
        self.i += 1;

        if self.i == self.capacity {
            self.i = 0;
        }
    }
}

// The maximum number of slots a lookup must visit.
//
// Every occupied bucket sits at most `max_distance` slots past its ideal
// slot, so `max_distance + 1` slots cover the whole probe sequence. The scan
// never needs to revisit a slot, hence the cap at the table length.
#[inline]
pub fn limit(max_distance: usize, capacity: usize) -> usize {
    max_distance.saturating_add(1).min(capacity)
}

#[test]
fn wraps() {
    let mut probe = Probe::start(2, 3);
    probe.next();
    assert_eq!((probe.i, probe.distance), (0, 1));
    probe.next();
    assert_eq!((probe.i, probe.distance), (1, 2));
    assert_eq!(limit(0, 3), 1);
    assert_eq!(limit(7, 3), 3);
}
