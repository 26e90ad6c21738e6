//! Cardinal directions and their slot indices.
//!
//! A cardinal direction in `M` homogeneous coordinates has exactly one `±1`
//! among the first `M-1` entries and a zero homogeneous entry. Slots are
//! numbered `2·axis` for the positive and `2·axis + 1` for the negative
//! direction along `axis`, which is what the weighted sum below produces:
//! with per-axis weights `1 + 4·axis` (homogeneous weight 0),
//! `slot = |w·d - 1| / 2`.

use nalgebra::SVector;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Direction vector in homogeneous coordinates (last entry 0 for cardinals).
pub type Dir<const M: usize> = SVector<i64, M>;

/// Index of a cardinal direction at a vertex, in `0..slot_count::<M>()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub usize);

impl Slot {
    /// Geometric axis this slot moves along.
    #[inline]
    pub fn axis(self) -> usize {
        self.0 / 2
    }
    /// `+1` for even slots, `-1` for odd ones.
    #[inline]
    pub fn sign(self) -> i64 {
        if self.0 % 2 == 0 {
            1
        } else {
            -1
        }
    }
    #[inline]
    pub fn opposite(self) -> Slot {
        Slot(self.0 ^ 1)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of slots per vertex, `2·(M-1)`.
#[inline]
pub const fn slot_count<const M: usize>() -> usize {
    2 * (M - 1)
}

#[inline]
fn axis_weight<const M: usize>(axis: usize) -> i64 {
    if axis + 1 == M {
        0
    } else {
        1 + 4 * axis as i64
    }
}

/// True iff `d` is one of the `2·(M-1)` canonical cardinal directions.
pub fn is_cardinal<const M: usize>(d: &Dir<M>) -> bool {
    if M < 2 || d[M - 1] != 0 {
        return false;
    }
    let mut nonzero = 0;
    for i in 0..M - 1 {
        match d[i] {
            0 => {}
            1 | -1 => nonzero += 1,
            _ => return false,
        }
    }
    nonzero == 1
}

/// Slot of a cardinal direction, or `None` if `d` is not cardinal.
pub fn try_slot_of<const M: usize>(d: &Dir<M>) -> Option<Slot> {
    if !is_cardinal(d) {
        return None;
    }
    let weighted: i64 = (0..M).map(|i| axis_weight::<M>(i) * d[i]).sum();
    Some(Slot(((weighted - 1).abs() / 2) as usize))
}

/// Slot of a cardinal direction.
///
/// Pre: `d` is cardinal. Anything else is a caller bug and panics.
pub fn slot_of<const M: usize>(d: &Dir<M>) -> Slot {
    match try_slot_of(d) {
        Some(slot) => slot,
        None => panic!(
            "slot_of: {:?} is not a cardinal direction of dimension {}",
            d.as_slice(),
            M
        ),
    }
}

/// Unit direction along `axis`, negated if `negative`.
pub fn unit<const M: usize>(axis: usize, negative: bool) -> Dir<M> {
    assert!(
        axis + 1 < M,
        "unit: axis {axis} is not a geometric axis of dimension {M}"
    );
    let mut d = Dir::<M>::zeros();
    d[axis] = if negative { -1 } else { 1 };
    d
}

/// Inverse of [`slot_of`].
pub fn direction_of<const M: usize>(slot: Slot) -> Dir<M> {
    assert!(
        slot.0 < slot_count::<M>(),
        "direction_of: slot {slot} out of range for dimension {M}"
    );
    unit(slot.axis(), slot.sign() < 0)
}

#[inline]
pub fn opposite(slot: Slot) -> Slot {
    slot.opposite()
}

/// All cardinal directions in slot order.
pub fn cardinals<const M: usize>() -> impl Iterator<Item = Dir<M>> {
    (0..slot_count::<M>()).map(|s| direction_of(Slot(s)))
}

/// `count` uniformly drawn cardinal directions.
pub fn random_directions<const M: usize, R: Rng>(rng: &mut R, count: usize) -> Vec<Dir<M>> {
    (0..count)
        .map(|_| direction_of(Slot(rng.gen_range(0..slot_count::<M>()))))
        .collect()
}

/// The four directions of a square mesh (m = 3), in slot order.
///
/// `South` is `+y`, matching screen coordinates where `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinal {
    East,
    West,
    South,
    North,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::East,
        Cardinal::West,
        Cardinal::South,
        Cardinal::North,
    ];

    #[inline]
    pub fn slot(self) -> Slot {
        Slot(self as usize)
    }

    pub fn from_slot(slot: Slot) -> Option<Cardinal> {
        Self::ALL.get(slot.0).copied()
    }

    #[inline]
    pub fn dir(self) -> Dir<3> {
        direction_of(self.slot())
    }

    #[inline]
    pub fn opposite(self) -> Cardinal {
        Self::ALL[self.slot().opposite().0]
    }

    /// Two-character arrow, e.g. `->` for east and `\/` for south.
    pub fn arrow(self) -> &'static str {
        match self {
            Cardinal::East => "->",
            Cardinal::West => "<-",
            Cardinal::South => "\\/",
            Cardinal::North => "/\\",
        }
    }

    fn from_word(word: &str) -> Option<Cardinal> {
        match word.to_ascii_lowercase().as_str() {
            "e" | "east" | "->" => Some(Cardinal::East),
            "w" | "west" | "<-" => Some(Cardinal::West),
            "s" | "south" | "\\/" => Some(Cardinal::South),
            "n" | "north" | "/\\" => Some(Cardinal::North),
            _ => None,
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

/// Unrecognised direction token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction {0:?} (expected one of e/w/s/n, east/west/south/north)")]
pub struct ParseCardinalError(pub String);

impl FromStr for Cardinal {
    type Err = ParseCardinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cardinal::from_word(s.trim()).ok_or_else(|| ParseCardinalError(s.to_string()))
    }
}

/// Parse a move list such as `"e,s,w,n"`, `"east south"` or `"eswn"`.
///
/// Tokens are separated by commas or whitespace; a token that is not a word
/// is read letter by letter.
pub fn parse_moves(s: &str) -> Result<Vec<Cardinal>, ParseCardinalError> {
    let mut out = Vec::new();
    for token in s.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        if let Some(c) = Cardinal::from_word(token) {
            out.push(c);
            continue;
        }
        for ch in token.chars() {
            let mut buf = [0u8; 4];
            out.push(ch.encode_utf8(&mut buf).parse::<Cardinal>()?);
        }
    }
    Ok(out)
}
