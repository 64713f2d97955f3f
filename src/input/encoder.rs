//! Rotary encoder quadrature decoding
//!
//! Two lines (A, B) are sampled together into a 2-bit state. Each change of
//! state is looked up in a 16-entry transition table keyed by
//! `(previous << 2) | current`; valid Gray-code steps move the raw count by one,
//! everything else (no change, or both lines flipping at once) counts as zero.
//! Raw counts are folded into mechanical detents and handed out as deltas.

use std::time::Duration;

/// Sampled state of the two quadrature lines (`A << 1 | B`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineState(u8);

impl LineState {
    pub fn from_lines(a: bool, b: bool) -> Self {
        Self(((a as u8) << 1) | b as u8)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Transition code for moving from `self` to `next`
    #[inline]
    pub fn transition_to(self, next: LineState) -> u8 {
        (self.0 << 2) | next.0
    }
}

/// Movement per transition code, indexed by `(prev << 2) | curr`.
///
/// Forward steps run 00 → 01 → 11 → 10 → 00, backward steps the reverse.
pub const TRANSITION_TABLE: [i8; 16] = [
    // prev=00: 00, 01, 10, 11
    0, 1, -1, 0,
    // prev=01: 00, 01, 10, 11
    -1, 0, 0, 1,
    // prev=10: 00, 01, 10, 11
    1, 0, 0, -1,
    // prev=11: 00, 01, 10, 11
    0, -1, 1, 0,
];

/// Movement for a transition code (-1, 0 or +1)
#[inline]
pub fn movement(code: u8) -> i8 {
    TRANSITION_TABLE[(code & 0x0f) as usize]
}

/// Default raw pulses per mechanical click
pub const DEFAULT_PULSES_PER_DETENT: i32 = 4;

/// Default minimum spacing between accepted state changes
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Debounced quadrature decoder producing detent deltas
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    last_state: LineState,
    raw_pos: i32,
    detent_pos: i32,
    pending: i32,
    pulses_per_detent: i32,
    min_interval: Duration,
    /// Time of the last accepted state change (None until the first one)
    last_update: Option<Duration>,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_PULSES_PER_DETENT, DEFAULT_MIN_INTERVAL)
    }
}

impl QuadratureDecoder {
    /// Create a decoder resting at line state `00`.
    ///
    /// `pulses_per_detent` is clamped to at least 1.
    pub fn new(pulses_per_detent: i32, min_interval: Duration) -> Self {
        Self::with_initial_state(LineState::default(), pulses_per_detent, min_interval)
    }

    /// Create a decoder that starts from an already-sampled line state
    pub fn with_initial_state(
        initial: LineState,
        pulses_per_detent: i32,
        min_interval: Duration,
    ) -> Self {
        Self {
            last_state: initial,
            raw_pos: 0,
            detent_pos: 0,
            pending: 0,
            pulses_per_detent: pulses_per_detent.max(1),
            min_interval,
            last_update: None,
        }
    }

    /// Feed one sample of both lines taken at `now`.
    ///
    /// Returns true when a detent boundary was crossed.
    pub fn sample(&mut self, a: bool, b: bool, now: Duration) -> bool {
        let too_soon = self
            .last_update
            .is_some_and(|last| now.saturating_sub(last) < self.min_interval);
        if too_soon {
            return false;
        }

        let current = LineState::from_lines(a, b);
        if current == self.last_state {
            return false;
        }

        let step = movement(self.last_state.transition_to(current));

        // Invalid transitions still move the reference state
        self.last_state = current;
        self.last_update = Some(now);

        if step == 0 {
            log::trace!("Ignoring invalid quadrature transition to {:02b}", current.bits());
            return false;
        }

        self.raw_pos += step as i32;
        let detent = self.raw_pos.div_euclid(self.pulses_per_detent);
        if detent != self.detent_pos {
            self.pending += detent - self.detent_pos;
            self.detent_pos = detent;
            return true;
        }
        false
    }

    /// Take the accumulated detent movement since the last call
    pub fn consume_delta(&mut self) -> i32 {
        std::mem::take(&mut self.pending)
    }

    /// Absolute detent position
    pub fn position(&self) -> i32 {
        self.detent_pos
    }

    /// Zero the position and drop any pending movement
    pub fn reset(&mut self) {
        self.raw_pos = 0;
        self.detent_pos = 0;
        self.pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FORWARD: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];
    const BACKWARD: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];

    /// Feed `steps` transitions 2ms apart, returning the final timestamp
    fn turn(dec: &mut QuadratureDecoder, seq: &[(bool, bool); 4], steps: usize, start_ms: u64) -> u64 {
        let mut t = start_ms;
        for i in 0..steps {
            let (a, b) = seq[i % 4];
            dec.sample(a, b, Duration::from_millis(t));
            t += 2;
        }
        t
    }

    #[test]
    fn test_transition_table_shape() {
        let zeros = TRANSITION_TABLE.iter().filter(|&&m| m == 0).count();
        let fwd = TRANSITION_TABLE.iter().filter(|&&m| m == 1).count();
        let back = TRANSITION_TABLE.iter().filter(|&&m| m == -1).count();
        assert_eq!((zeros, fwd, back), (8, 4, 4));

        for code in [0b0001, 0b0111, 0b1110, 0b1000] {
            assert_eq!(movement(code), 1, "code {code:04b}");
        }
        for code in [0b0010, 0b1011, 0b1101, 0b0100] {
            assert_eq!(movement(code), -1, "code {code:04b}");
        }
        // Unchanged states and double flips
        for code in [0b0000, 0b0101, 0b1010, 0b1111, 0b0011, 0b1100, 0b0110, 0b1001] {
            assert_eq!(movement(code), 0, "code {code:04b}");
        }
    }

    #[test]
    fn test_full_detent_forward_and_back() {
        let mut dec = QuadratureDecoder::default();
        let t = turn(&mut dec, &FORWARD, 4, 0);
        assert_eq!(dec.consume_delta(), 1);
        assert_eq!(dec.consume_delta(), 0);

        turn(&mut dec, &BACKWARD, 4, t);
        assert_eq!(dec.consume_delta(), -1);
        assert_eq!(dec.position(), 0);
    }

    #[test]
    fn test_partial_detent_reports_nothing() {
        let mut dec = QuadratureDecoder::default();
        turn(&mut dec, &FORWARD, 3, 0);
        assert_eq!(dec.consume_delta(), 0);
        assert_eq!(dec.position(), 0);
    }

    #[test]
    fn test_sample_reports_detent_crossing() {
        let mut dec = QuadratureDecoder::default();
        assert!(!dec.sample(false, true, Duration::from_millis(0)));
        assert!(!dec.sample(true, true, Duration::from_millis(2)));
        assert!(!dec.sample(true, false, Duration::from_millis(4)));
        assert!(dec.sample(false, false, Duration::from_millis(6)));
    }

    #[test]
    fn test_bounce_inside_min_interval_is_ignored() {
        let mut dec = QuadratureDecoder::default();
        dec.sample(false, true, Duration::from_micros(0));
        // Arrives 0.5ms later, dropped entirely
        dec.sample(true, true, Duration::from_micros(500));
        // State reference is still 01, so 01 -> 11 counts once accepted
        dec.sample(true, true, Duration::from_micros(1500));
        dec.sample(true, false, Duration::from_micros(3000));
        dec.sample(false, false, Duration::from_micros(4500));
        assert_eq!(dec.consume_delta(), 1);
    }

    #[test]
    fn test_invalid_transition_updates_state_without_counting() {
        let mut dec = QuadratureDecoder::default();
        // 00 -> 11 is a double flip
        dec.sample(true, true, Duration::from_millis(0));
        // 11 -> 10 is now a valid forward step from the new reference
        dec.sample(true, false, Duration::from_millis(2));
        dec.sample(false, false, Duration::from_millis(4));
        dec.sample(false, true, Duration::from_millis(6));
        dec.sample(true, true, Duration::from_millis(8));
        assert_eq!(dec.consume_delta(), 1);
    }

    #[test]
    fn test_negative_raw_counts_floor() {
        let mut dec = QuadratureDecoder::default();
        // One backward pulse already floors to detent -1
        dec.sample(true, false, Duration::from_millis(0));
        assert_eq!(dec.position(), -1);
        assert_eq!(dec.consume_delta(), -1);
    }

    #[test]
    fn test_reset() {
        let mut dec = QuadratureDecoder::default();
        turn(&mut dec, &FORWARD, 8, 0);
        dec.reset();
        assert_eq!(dec.position(), 0);
        assert_eq!(dec.consume_delta(), 0);
    }

    proptest! {
        #[test]
        fn prop_forward_steps_yield_floor_of_detents(n in 0usize..200, ppd in 1i32..8) {
            let mut dec = QuadratureDecoder::new(ppd, DEFAULT_MIN_INTERVAL);
            turn(&mut dec, &FORWARD, n, 0);
            prop_assert_eq!(dec.consume_delta(), n as i32 / ppd);
            prop_assert_eq!(dec.consume_delta(), 0);
        }

        #[test]
        fn prop_noise_never_exceeds_valid_steps(samples in proptest::collection::vec(any::<(bool, bool)>(), 0..300)) {
            let mut dec = QuadratureDecoder::new(1, DEFAULT_MIN_INTERVAL);
            let mut prev = LineState::default();
            let mut expected = 0i32;
            for (i, (a, b)) in samples.iter().enumerate() {
                let cur = LineState::from_lines(*a, *b);
                expected += movement(prev.transition_to(cur)) as i32;
                prev = cur;
                dec.sample(*a, *b, Duration::from_millis(i as u64 * 2));
            }
            prop_assert_eq!(dec.consume_delta(), expected);
        }
    }
}
