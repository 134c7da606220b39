/// Bitmap font descriptor.
///
/// `data` holds `height` rows per glyph, glyphs stored consecutively from
/// the space character (code 32). Bit 15 of a row is the leftmost pixel;
/// `width` pixels are read from each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    pub width: u8,
    pub height: u8,
    pub data: &'a [u16],
}

impl<'a> Font<'a> {
    /// Code of the first glyph in the table.
    pub const FIRST_CHAR: u32 = 32;

    pub const fn new(width: u8, height: u8, data: &'a [u16]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of glyphs in the table.
    pub fn glyph_count(&self) -> usize {
        match self.height {
            0 => 0,
            h => self.data.len() / usize::from(h),
        }
    }

    /// Rows of the glyph for `ch`, or `None` if the table does not cover it.
    pub fn glyph(&self, ch: char) -> Option<&'a [u16]> {
        let index = (ch as u32).checked_sub(Self::FIRST_CHAR)?;
        let index = usize::try_from(index).ok()?;
        if index >= self.glyph_count() {
            return None;
        }
        let h = usize::from(self.height);
        self.data.get(index * h..(index + 1) * h)
    }

    /// Returns `true` if `ch` has a glyph.
    pub fn supports(&self, ch: char) -> bool {
        self.glyph(ch).is_some()
    }
}

/// Error returned by text drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// The font has no glyph for this character. Nothing was drawn.
    UnsupportedCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [u16; 6] = [0x8000, 0x4000, 0xC000, 0x0000, 0xFFFF, 0x0001];

    #[test]
    fn glyph_lookup() {
        let font = Font::new(2, 2, &DATA);
        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.glyph(' '), Some(&DATA[0..2]));
        assert_eq!(font.glyph('"'), Some(&DATA[4..6]));
    }

    #[test]
    fn characters_outside_table() {
        let font = Font::new(2, 2, &DATA);
        assert_eq!(font.glyph('#'), None);
        assert_eq!(font.glyph('\n'), None);
        assert_eq!(font.glyph('é'), None);
        assert!(!font.supports('\u{1F600}'));
    }

    #[test]
    fn zero_height_font_has_no_glyphs() {
        let font = Font::new(8, 0, &DATA);
        assert_eq!(font.glyph_count(), 0);
        assert_eq!(font.glyph(' '), None);
    }
}
