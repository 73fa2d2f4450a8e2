use serde::Serialize;

/// Puzzle event a session practices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
pub enum EventKind {
    #[strum(serialize = "2x2")]
    TwoByTwo,
    #[strum(serialize = "3x3")]
    ThreeByThree,
    #[strum(serialize = "3x3 blindfolded")]
    ThreeBlind,
    #[strum(serialize = "3x3 fewest moves")]
    FewestMoves,
    #[strum(serialize = "3x3 with feet")]
    Feet,
    #[strum(serialize = "3x3 multi-blind")]
    MultiBlind,
    #[strum(serialize = "3x3 multi-blind (old style)")]
    MultiBlindOld,
    #[strum(serialize = "3x3 one-handed")]
    OneHanded,
    #[strum(serialize = "4x4")]
    FourByFour,
    #[strum(serialize = "4x4 blindfolded")]
    FourBlind,
    #[strum(serialize = "5x5")]
    FiveByFive,
    #[strum(serialize = "5x5 blindfolded")]
    FiveBlind,
    #[strum(serialize = "6x6")]
    SixBySix,
    #[strum(serialize = "7x7")]
    SevenBySeven,
    #[strum(serialize = "Clock")]
    Clock,
    #[strum(serialize = "Megaminx")]
    Megaminx,
    #[strum(serialize = "Pyraminx")]
    Pyraminx,
    #[strum(serialize = "Skewb")]
    Skewb,
    #[strum(serialize = "Square-1")]
    SquareOne,
    #[strum(serialize = "Magic")]
    Magic,
    #[strum(serialize = "Master Magic")]
    MasterMagic,
}

const NAME_KEYWORDS: [&str; 11] = [
    "222", "333", "444", "555", "666", "777", "clock", "minx", "pyram", "skewb", "sq1",
];

// Last-layer and subset trainers all scramble a 3x3.
const THREE_BY_THREE_SUBSETS: [&str; 9] = [
    "corners", "edges", "ll", "oll", "pll", "lse", "cmll", "zbll", "coll",
];

impl EventKind {
    /// Event for a csTimer scramble type code such as `"333oh"`, `"444wca"` or `"mgmp"`.
    pub fn from_scramble_type(code: &str) -> Option<Self> {
        let s = code.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }

        let kind = if s.starts_with("222") || s == "2x2x2" {
            EventKind::TwoByTwo
        } else if s.contains("333bf") || s.contains("3bf") || s == "bld" {
            EventKind::ThreeBlind
        } else if s.contains("333fm") || s == "fmc" {
            EventKind::FewestMoves
        } else if s.contains("333ft") || s == "feet" {
            EventKind::Feet
        } else if s.contains("333mbf") || s == "mbld" {
            EventKind::MultiBlind
        } else if s.contains("333mbo") {
            EventKind::MultiBlindOld
        } else if s.contains("333oh") || s == "oh" {
            EventKind::OneHanded
        } else if s.starts_with("333") || s == "3x3x3" {
            EventKind::ThreeByThree
        } else if s.contains("444bf") || s == "4bld" {
            EventKind::FourBlind
        } else if s.starts_with("444") || s == "4x4x4" {
            EventKind::FourByFour
        } else if s.contains("555bf") || s == "5bld" {
            EventKind::FiveBlind
        } else if s.starts_with("555") || s == "5x5x5" {
            EventKind::FiveByFive
        } else if s.starts_with("666") || s == "6x6x6" {
            EventKind::SixBySix
        } else if s.starts_with("777") || s == "7x7x7" {
            EventKind::SevenBySeven
        } else if s.contains("clk") || s == "clock" {
            EventKind::Clock
        } else if s.contains("mgm") || s.contains("minx") || s.starts_with("mls") {
            EventKind::Megaminx
        } else if s.contains("pyr") {
            EventKind::Pyraminx
        } else if s.contains("skewb") || s.contains("skb") {
            EventKind::Skewb
        } else if s.contains("sq1") || s.contains("sq-1") || s == "square-1" {
            EventKind::SquareOne
        } else if s == "magic" {
            EventKind::Magic
        } else if s == "mmagic" || s.contains("master") {
            EventKind::MasterMagic
        } else if THREE_BY_THREE_SUBSETS.iter().any(|k| s.contains(k)) {
            EventKind::ThreeByThree
        } else {
            return None;
        };
        Some(kind)
    }

    /// Scramble type first, then the session name, then keywords inside the
    /// name; anything unrecognised is treated as 3x3.
    pub fn classify(scramble_type: &str, session_name: &str) -> Self {
        if let Some(kind) = Self::from_scramble_type(scramble_type) {
            return kind;
        }

        let name = session_name.trim().to_lowercase();
        if let Some(kind) = Self::from_scramble_type(&name) {
            return kind;
        }

        NAME_KEYWORDS
            .iter()
            .find(|k| name.contains(*k))
            .and_then(|k| Self::from_scramble_type(k))
            .unwrap_or(EventKind::ThreeByThree)
    }
}
