//! Per-tick scrambling of the button label.
//!
//! Each tick every glyph gets a new color and either swaps to a look-alike
//! character (`E` -> `3`, `o` -> `0`, ...) or flips its case.

use rand::seq::SliceRandom;
use rand::Rng;

/// Characters that stand in for each other while scrambling.
static FAMILIES: [&[char]; 5] = [
    &['I', 'i', '1', '!'],
    &['A', 'a', '@', '4'],
    &['E', 'e', '3'],
    &['G', 'g', '9'],
    &['O', 'o', '0'],
];

const HUES: [u16; 2] = [86, 180];
const LIGHTNESS: [u8; 2] = [70, 100];

/// Look-alike family of `ch`, if it has one.
pub fn family_of(ch: char) -> Option<&'static [char]> {
    FAMILIES.iter().copied().find(|family| family.contains(&ch))
}

/// Pick the next character for a glyph.
///
/// Family members are replaced by a uniformly chosen member of the same
/// family (possibly themselves). Anything else is upper- or lower-cased
/// with equal chance.
pub fn scramble_char<R: Rng + ?Sized>(ch: char, rng: &mut R) -> char {
    if let Some(family) = family_of(ch) {
        return *family.choose(rng).unwrap_or(&ch);
    }
    let flipped = if rng.gen_bool(0.5) {
        ch.to_lowercase().next()
    } else {
        ch.to_uppercase().next()
    };
    flipped.unwrap_or(ch)
}

/// Fully saturated HSL color used for a scrambled glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphColor {
    pub hue: u16,
    pub lightness: u8,
}

impl GlyphColor {
    /// Pick one of the two hues and one of the two lightness levels.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hue: HUES[rng.gen_range(0..HUES.len())],
            lightness: LIGHTNESS[rng.gen_range(0..LIGHTNESS.len())],
        }
    }

    /// Returns a CSS `hsl(h, 100%, l%)` string.
    pub fn css(&self) -> String {
        format!("hsl({}, 100%, {}%)", self.hue, self.lightness)
    }
}

/// A single character of the label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    /// `None` until the first tick
    pub color: Option<GlyphColor>,
}

impl Glyph {
    pub fn new(ch: char) -> Self {
        Self { ch, color: None }
    }

    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.color = Some(GlyphColor::random(rng));
        self.ch = scramble_char(self.ch, rng);
    }
}

/// The scrambled label, one [`Glyph`] per character.
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use rand_text_core::GlyphText;
///
/// let mut label = GlyphText::new("I'm feeling random");
/// let mut rng = StdRng::seed_from_u64(7);
/// label.scramble(&mut rng);
///
/// assert_eq!(label.len(), 18);
/// assert_eq!(label.text().chars().nth(1), Some('\''));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphText {
    glyphs: Vec<Glyph>,
}

impl GlyphText {
    pub fn new(label: &str) -> Self {
        Self { glyphs: label.chars().map(Glyph::new).collect() }
    }

    /// Re-randomize every glyph.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for glyph in &mut self.glyphs {
            glyph.scramble(rng);
        }
    }

    /// Current characters as a string.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
