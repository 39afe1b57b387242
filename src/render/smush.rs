use bitflags::bitflags;

bitflags! {
    /// Layout capability bits, in the exact encoding used by the `Old_Layout`
    /// and `Full_Layout` font header fields.
    ///
    /// Kept as a plain bitset for wire compatibility with existing fonts; the
    /// named constants are the documented capability set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SmushMode: u32 {
        /// Two equal sub-characters smush into one (but not hardblanks).
        const EQUAL = 1;
        /// An underscore is absorbed by any of `|/\[]{}()<>`.
        const LOWLINE = 2;
        /// Class hierarchy `|`, `/\`, `[]`, `{}`, `()`, `<>`; a sub-character
        /// from an earlier class is replaced by one from a later class.
        const HIERARCHY = 4;
        /// Opposite bracket pairs (`[]`, `{}`, `()`) collapse to `|`.
        const PAIR = 8;
        /// `/` + `\` → `|`, `\` + `/` → `Y`, `>` + `<` → `X`, in that order
        /// only.
        const BIGX = 16;
        /// Two hardblanks merge into a single hardblank.
        const HARDBLANK = 32;
        /// Kerning: glyphs are moved together until they touch.
        const KERN = 64;
        /// Smushing: touching glyphs may additionally share one column.
        const SMUSH = 128;
    }
}

impl SmushMode {
    /// The bits selecting individual smushing rules.
    pub const RULES: Self = Self::EQUAL
        .union(Self::LOWLINE)
        .union(Self::HIERARCHY)
        .union(Self::PAIR)
        .union(Self::BIGX)
        .union(Self::HARDBLANK);

    /// Derives the effective layout from a font's header fields.
    ///
    /// A `Full_Layout` value is taken verbatim when present. Otherwise the
    /// legacy `Old_Layout` is translated: `-1` (or lower) means plain
    /// concatenation, `0` means kerning only, and any other value carries its
    /// low five rule bits with smushing enabled.
    #[must_use]
    pub fn from_layout(old_layout: i32, full_layout: Option<u32>) -> Self {
        match full_layout {
            Some(bits) => Self::from_bits_retain(bits),
            None => match old_layout {
                i32::MIN..=-1 => Self::empty(),
                0 => Self::KERN,
                bits => Self::from_bits_retain(bits as u32 & 31) | Self::SMUSH,
            },
        }
    }
}

/// The context needed to decide whether two overlapping sub-characters merge:
/// the effective mode, the font's hardblank, the print direction and the
/// widths of the two glyphs meeting at the boundary.
pub(crate) struct Smusher {
    pub mode: SmushMode,
    pub hardblank: u8,
    pub backward: bool,
    pub stretching: usize,
    pub prev_width: usize,
    pub cur_width: usize,
}

impl Smusher {
    /// Attempts to merge the trailing sub-character of the line with the
    /// leading sub-character of the incoming glyph, returning `None` when the
    /// two cannot share a column.
    pub fn smush(&self, left: u8, right: u8) -> Option<u8> {
        if left == b' ' {
            return Some(right);
        }
        if right == b' ' {
            return Some(left);
        }
        // Glyphs narrower than two columns never overlap.
        if self.prev_width < 2 || self.cur_width < 2 {
            return None;
        }
        if !self.mode.contains(SmushMode::SMUSH) {
            return None;
        }
        if self.stretching > 0 {
            return None;
        }
        if (self.mode & SmushMode::RULES).is_empty() {
            // Universal overlapping: the later glyph wins.
            return Some(if left == self.hardblank || right == self.hardblank {
                right
            } else if self.backward {
                left
            } else {
                right
            });
        }
        if left == self.hardblank && right == self.hardblank {
            return self
                .mode
                .contains(SmushMode::HARDBLANK)
                .then_some(left);
        }
        if self.mode.contains(SmushMode::EQUAL) && left == right {
            return Some(left);
        }
        if self.mode.contains(SmushMode::LOWLINE) {
            if let Some(c) = lowline(left, right).or_else(|| lowline(right, left)) {
                return Some(c);
            }
        }
        if self.mode.contains(SmushMode::HIERARCHY) {
            if let Some(c) = hierarchy(left, right) {
                return Some(c);
            }
        }
        if self.mode.contains(SmushMode::PAIR)
            && matches!(
                (left, right),
                (b'[', b']')
                    | (b']', b'[')
                    | (b'{', b'}')
                    | (b'}', b'{')
                    | (b'(', b')')
                    | (b')', b'(')
            )
        {
            return Some(b'|');
        }
        if self.mode.contains(SmushMode::BIGX) {
            match (left, right) {
                (b'/', b'\\') => return Some(b'|'),
                (b'\\', b'/') => return Some(b'Y'),
                (b'>', b'<') => return Some(b'X'),
                _ => {}
            }
        }
        None
    }
}

fn lowline(a: u8, b: u8) -> Option<u8> {
    (a == b'_' && class_rank(b).is_some()).then_some(b)
}

/// Position of `c` in the smushing hierarchy `|`, `/\`, `[]`, `{}`, `()`,
/// `<>`.
const fn class_rank(c: u8) -> Option<u8> {
    match c {
        b'|' => Some(1),
        b'/' | b'\\' => Some(2),
        b'[' | b']' => Some(3),
        b'{' | b'}' => Some(4),
        b'(' | b')' => Some(5),
        b'<' | b'>' => Some(6),
        _ => None,
    }
}

fn hierarchy(a: u8, b: u8) -> Option<u8> {
    let (rank_a, rank_b) = (class_rank(a)?, class_rank(b)?);
    match rank_a.cmp(&rank_b) {
        std::cmp::Ordering::Less => Some(b),
        std::cmp::Ordering::Greater => Some(a),
        std::cmp::Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{SmushMode, Smusher};

    fn smusher(mode: SmushMode) -> Smusher {
        Smusher {
            mode,
            hardblank: b'$',
            backward: false,
            stretching: 0,
            prev_width: 2,
            cur_width: 2,
        }
    }

    #[test]
    fn layout_derivation() {
        assert_eq!(SmushMode::from_layout(-1, None), SmushMode::empty());
        assert_eq!(SmushMode::from_layout(-3, None), SmushMode::empty());
        assert_eq!(SmushMode::from_layout(0, None), SmushMode::KERN);
        assert_eq!(
            SmushMode::from_layout(3, None),
            SmushMode::EQUAL | SmushMode::LOWLINE | SmushMode::SMUSH
        );
        // A full layout value wins over the legacy field, verbatim.
        assert_eq!(
            SmushMode::from_layout(-1, Some(191)),
            SmushMode::from_bits_retain(191)
        );
    }

    #[test]
    fn narrow_glyphs_never_combine() {
        let mut s = smusher(SmushMode::SMUSH | SmushMode::EQUAL);
        s.prev_width = 1;
        assert_eq!(s.smush(b'#', b'#'), None);
        assert_eq!(s.smush(b' ', b'#'), Some(b'#'));
    }

    #[test]
    fn kerning_only_never_combines() {
        let s = smusher(SmushMode::KERN);
        assert_eq!(s.smush(b'#', b'#'), None);
        assert_eq!(s.smush(b'#', b' '), Some(b'#'));
    }

    #[test]
    fn universal_overlap() {
        let s = smusher(SmushMode::SMUSH);
        assert_eq!(s.smush(b'a', b'b'), Some(b'b'));
        let mut s = smusher(SmushMode::SMUSH);
        s.backward = true;
        assert_eq!(s.smush(b'a', b'b'), Some(b'a'));
    }

    #[test]
    fn equal_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::EQUAL);
        assert_eq!(s.smush(b'#', b'#'), Some(b'#'));
        assert_eq!(s.smush(b'#', b'%'), None);
    }

    #[test]
    fn hardblank_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::HARDBLANK);
        assert_eq!(s.smush(b'$', b'$'), Some(b'$'));
        // Without the bit, two hardblanks never combine, even as equals.
        let s = smusher(SmushMode::SMUSH | SmushMode::EQUAL);
        assert_eq!(s.smush(b'$', b'$'), None);
    }

    #[test]
    fn lowline_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::LOWLINE);
        assert_eq!(s.smush(b'_', b'|'), Some(b'|'));
        assert_eq!(s.smush(b')', b'_'), Some(b')'));
        assert_eq!(s.smush(b'_', b'#'), None);
    }

    #[test]
    fn hierarchy_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::HIERARCHY);
        assert_eq!(s.smush(b'|', b'/'), Some(b'/'));
        assert_eq!(s.smush(b'>', b'['), Some(b'>'));
        // Same class, no winner.
        assert_eq!(s.smush(b'/', b'\\'), None);
    }

    #[test]
    fn pair_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::PAIR);
        assert_eq!(s.smush(b'[', b']'), Some(b'|'));
        assert_eq!(s.smush(b'}', b'{'), Some(b'|'));
        assert_eq!(s.smush(b'(', b')'), Some(b'|'));
        assert_eq!(s.smush(b'[', b'}'), None);
    }

    #[test]
    fn big_x_rule() {
        let s = smusher(SmushMode::SMUSH | SmushMode::BIGX);
        assert_eq!(s.smush(b'/', b'\\'), Some(b'|'));
        assert_eq!(s.smush(b'\\', b'/'), Some(b'Y'));
        assert_eq!(s.smush(b'>', b'<'), Some(b'X'));
        assert_eq!(s.smush(b'<', b'>'), None);
    }

    #[test]
    fn stretching_disables_combining() {
        let mut s = smusher(SmushMode::SMUSH | SmushMode::RULES);
        s.stretching = 2;
        assert_eq!(s.smush(b'#', b'#'), None);
        // Blanks still yield the other side.
        assert_eq!(s.smush(b' ', b'#'), Some(b'#'));
    }
}
