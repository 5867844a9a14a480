use euchre_core::model::player::SeatPosition;

/// Minimum hand score to call, and to call alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub normal: f64,
    pub loner: f64,
}

impl Threshold {
    pub const fn new(normal: f64, loner: f64) -> Self {
        Self { normal, loner }
    }

    /// How far `score` clears (or misses) the calling threshold.
    pub fn margin(&self, score: f64) -> f64 {
        score - self.normal
    }

    pub fn calls(&self, score: f64) -> bool {
        score >= self.normal
    }

    pub fn goes_alone(&self, score: f64) -> bool {
        score >= self.loner
    }
}

/// Round-2 thresholds for one seat, split by the kind of suit named.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTwoThresholds {
    /// Same colour as the turned-down card.
    pub next: Threshold,
    pub reverse: Threshold,
}

/// Round-1 thresholds indexed by [`SeatPosition::index`].
pub const ROUND_ONE_THRESHOLDS: [Threshold; 4] = [
    Threshold::new(0.33, 0.51),
    Threshold::new(0.225, 0.451),
    Threshold::new(0.355, 0.525),
    Threshold::new(0.26, 0.47),
];

/// Round-2 thresholds indexed by [`SeatPosition::index`].
pub const ROUND_TWO_THRESHOLDS: [RoundTwoThresholds; 4] = [
    RoundTwoThresholds {
        next: Threshold::new(0.2, 0.45),
        reverse: Threshold::new(0.315, 0.48),
    },
    RoundTwoThresholds {
        next: Threshold::new(0.315, 0.48),
        reverse: Threshold::new(0.2, 0.45),
    },
    RoundTwoThresholds {
        next: Threshold::new(0.23, 0.465),
        reverse: Threshold::new(0.305, 0.485),
    },
    RoundTwoThresholds {
        next: Threshold::new(0.35, 0.46),
        reverse: Threshold::new(0.3, 0.45),
    },
];

/// Trump card values used by the evaluator.
pub const RIGHT_BOWER_VALUE: f64 = 1.0;
pub const LEFT_BOWER_VALUE: f64 = 0.9;
pub const ACE_TRUMP_VALUE: f64 = 0.8;
pub const KING_TRUMP_VALUE: f64 = 0.7;
pub const QUEEN_TRUMP_VALUE: f64 = 0.6;
pub const TEN_TRUMP_VALUE: f64 = 0.575;
pub const NINE_TRUMP_VALUE: f64 = 0.55;

/// Divisor that maps the trump sum into `[0, 1]`.
pub const TRUMP_NORMALIZER: f64 = (RIGHT_BOWER_VALUE
    + LEFT_BOWER_VALUE
    + ACE_TRUMP_VALUE
    + KING_TRUMP_VALUE
    + QUEEN_TRUMP_VALUE)
    * 1.7;

pub const BOTH_BOWERS_BONUS: f64 = 0.15;

pub const ACE_NORMALIZER: f64 = 2.9;
/// Off-ace value when its suit is the trump suit's colour partner.
pub const VULNERABLE_ACE_VALUE: f64 = 0.9;
pub const ACE_TRUMP_SUPPORT_BONUS: f64 = 1.2;
pub const ACE_SINGLE_SUIT_BONUS: f64 = 1.1;

/// Tunable weights and thresholds for calling decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Weight of the trump sub-score (default: 0.7)
    pub trump_weight: f64,

    /// Weight of the off-ace sub-score (default: 0.2)
    pub aces_weight: f64,

    /// Weight of the void sub-score (default: 0.1)
    pub voids_weight: f64,

    pub round_one: [Threshold; 4],
    pub round_two: [RoundTwoThresholds; 4],
}

impl BotParams {
    pub fn round_one(&self, position: SeatPosition) -> Threshold {
        self.round_one[position.index()]
    }

    pub fn round_two(&self, position: SeatPosition) -> RoundTwoThresholds {
        self.round_two[position.index()]
    }
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            trump_weight: 0.7,
            aces_weight: 0.2,
            voids_weight: 0.1,
            round_one: ROUND_ONE_THRESHOLDS,
            round_two: ROUND_TWO_THRESHOLDS,
        }
    }
}

/// Multiplier on the trump sum by number of trump held.
pub fn trump_count_multiplier(count: usize) -> f64 {
    match count {
        3 => 1.4,
        4 => 1.6,
        5 => 1.8,
        _ => 1.0,
    }
}

/// Discount on an off-ace by the length of its suit.
pub fn ace_length_multiplier(suit_len: usize) -> f64 {
    match suit_len {
        0 | 1 => 1.0,
        2 => 0.9,
        3 => 0.7,
        _ => 0.5,
    }
}
