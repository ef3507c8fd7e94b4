//! Traffic signals
//!
//! Every signalled intersection runs its own Green -> Yellow -> Red cycle.
//! Intersections without a signal are uncontrolled and always admit traffic.

use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

use super::error::{SimError, SimResult};
use super::road_network::SimRoadNetwork;
use super::types::{IntersectionId, Tick};

/// Phase of a signal's repeating cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalPhase {
    Green,
    Yellow,
    Red,
}

impl SignalPhase {
    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            SignalPhase::Green => SignalPhase::Yellow,
            SignalPhase::Yellow => SignalPhase::Red,
            SignalPhase::Red => SignalPhase::Green,
        }
    }
}

/// Which phases let a vehicle enter an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryPolicy {
    /// Wait at yellow or red
    #[default]
    GreenOnly,
    /// Only red stops traffic
    GreenOrYellow,
}

impl EntryPolicy {
    pub fn admits(self, phase: SignalPhase) -> bool {
        match self {
            EntryPolicy::GreenOnly => phase == SignalPhase::Green,
            EntryPolicy::GreenOrYellow => phase != SignalPhase::Red,
        }
    }
}

/// How many ticks each phase lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    green: u32,
    yellow: u32,
    red: u32,
}

impl PhaseDurations {
    pub fn new(green: u32, yellow: u32, red: u32) -> SimResult<Self> {
        if green == 0 || yellow == 0 || red == 0 {
            return Err(SimError::InvalidPhaseDuration);
        }
        Ok(Self { green, yellow, red })
    }

    pub fn of(&self, phase: SignalPhase) -> u32 {
        match phase {
            SignalPhase::Green => self.green,
            SignalPhase::Yellow => self.yellow,
            SignalPhase::Red => self.red,
        }
    }

    /// Length of one full cycle
    pub fn cycle_length(&self) -> u64 {
        u64::from(self.green) + u64::from(self.yellow) + u64::from(self.red)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            green: 3,
            yellow: 1,
            red: 2,
        }
    }
}

fn tick_to_signed(tick: Tick) -> i64 {
    i64::try_from(tick).unwrap_or(i64::MAX)
}

/// State of a single intersection's signal
///
/// The entry tick is signed so a signal can be constructed part-way through
/// a phase that began before tick 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalState {
    phase: SignalPhase,
    phase_entered_at: i64,
    durations: PhaseDurations,
}

impl SignalState {
    /// Signal entering Green at tick 0
    pub fn new(durations: PhaseDurations) -> Self {
        Self::starting_in(SignalPhase::Green, durations, 0)
    }

    pub fn starting_in(phase: SignalPhase, durations: PhaseDurations, entered_at: i64) -> Self {
        Self {
            phase,
            phase_entered_at: entered_at,
            durations,
        }
    }

    /// Signal whose cycle started `offset` ticks before tick 0
    pub fn with_offset(durations: PhaseDurations, offset: u64) -> Self {
        let offset = offset % durations.cycle_length();
        let mut phase = SignalPhase::Green;
        // Walk forward from the cycle start until the phase covering tick 0
        let mut entered_at = -tick_to_signed(offset);
        while -entered_at >= i64::from(durations.of(phase)) {
            entered_at += i64::from(durations.of(phase));
            phase = phase.next();
        }
        Self::starting_in(phase, durations, entered_at)
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    pub fn phase_entered_at(&self) -> i64 {
        self.phase_entered_at
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// Moves to the next phase once the current one has run its course.
    /// Returns whether a transition happened.
    pub fn advance(&mut self, tick: Tick) -> bool {
        let now = tick_to_signed(tick);
        let elapsed = now.saturating_sub(self.phase_entered_at);
        if elapsed >= i64::from(self.durations.of(self.phase)) {
            self.phase = self.phase.next();
            self.phase_entered_at = now;
            true
        } else {
            false
        }
    }
}

/// All signals in the town
#[derive(Debug, Clone, Default)]
pub struct SignalController {
    signals: BTreeMap<IntersectionId, SignalState>,
    policy: EntryPolicy,
}

impl SignalController {
    /// Controller with no signals installed
    pub fn new(policy: EntryPolicy) -> Self {
        Self {
            signals: BTreeMap::new(),
            policy,
        }
    }

    /// Installs a signal at every intersection of the network, each with a
    /// random offset into its cycle so neighbours do not switch together.
    pub fn install_everywhere<R>(
        &mut self,
        network: &SimRoadNetwork,
        durations: PhaseDurations,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        for intersection in network.intersections() {
            let offset = rng.random_range(0..durations.cycle_length());
            self.install(intersection, SignalState::with_offset(durations, offset));
        }
    }

    /// Installs or replaces the signal at one intersection
    pub fn install(&mut self, intersection: IntersectionId, state: SignalState) {
        self.signals.insert(intersection, state);
    }

    /// Removes the signal, leaving the intersection uncontrolled
    pub fn remove(&mut self, intersection: IntersectionId) -> Option<SignalState> {
        self.signals.remove(&intersection)
    }

    pub fn policy(&self) -> EntryPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: EntryPolicy) {
        self.policy = policy;
    }

    /// Steps every signal to `tick`
    pub fn advance(&mut self, tick: Tick) {
        for (intersection, signal) in self.signals.iter_mut() {
            if signal.advance(tick) {
                debug!(
                    "Signal at {} switched to {:?} at tick {}",
                    intersection,
                    signal.phase(),
                    tick
                );
            }
        }
    }

    /// Whether a vehicle may drive into `intersection` this tick
    pub fn may_enter(&self, intersection: IntersectionId) -> bool {
        self.signals
            .get(&intersection)
            .map_or(true, |signal| self.policy.admits(signal.phase()))
    }

    /// Current phase, or `None` for an uncontrolled intersection
    pub fn phase(&self, intersection: IntersectionId) -> Option<SignalPhase> {
        self.signals.get(&intersection).map(SignalState::phase)
    }

    pub fn signal(&self, intersection: IntersectionId) -> Option<&SignalState> {
        self.signals.get(&intersection)
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }
}
