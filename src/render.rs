//! Rendering configuration and the line-composition engine.

mod smush;

use std::iter::repeat_n;
use std::mem;
use std::str;

use itertools::izip;
use thiserror::Error;

use crate::font::{FontDescriptor, Glyph, PrintDirection};

pub use smush::SmushMode;
use smush::Smusher;

/// The main rendering entry point.
///
/// Borrows an immutable [`FontDescriptor`] together with a [`RenderConfig`];
/// every call to [`render()`](Renderer::render) runs on its own transient
/// state, so one font (or one renderer) can serve any number of concurrent
/// renders.
///
/// The configuration methods are meant to be used in a builder pattern:
/// ```no_run
/// # use figtext::font::FontDescriptor;
/// # use figtext::render::{Justification, Renderer};
/// let font = FontDescriptor::load("fonts/standard.flf")?;
/// let banner = Renderer::new(&font)
///     .width(120)
///     .justification(Justification::Right)
///     .handle_paragraphs(true)
///     .render("Hello, world!");
/// # Ok::<(), figtext::font::FontError>(())
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct Renderer<'font> {
    font: &'font FontDescriptor,
    config: RenderConfig,
}

impl<'font> Renderer<'font> {
    /// Creates a renderer with the default configuration; layout, direction
    /// and justification all follow the font.
    pub fn new(font: &'font FontDescriptor) -> Self {
        Self {
            font,
            config: RenderConfig::default(),
        }
    }

    /// Creates a renderer from an existing configuration.
    pub fn with_config(font: &'font FontDescriptor, config: RenderConfig) -> Self {
        Self { font, config }
    }

    /// Sets the maximum output width. See [`RenderConfig::width`].
    pub fn width(mut self, width: usize) -> Self {
        self.config = self.config.width(width);
        self
    }

    /// Sets the smushing mode. See [`RenderConfig::smushing`].
    pub fn smushing(mut self, mode: i32) -> Self {
        self.config = self.config.smushing(mode);
        self
    }

    /// Sets an explicit layout bitmask. See [`RenderConfig::smush_mode`].
    pub fn smush_mode(mut self, mode: SmushMode, combine: SmushOverride) -> Self {
        self.config = self.config.smush_mode(mode, combine);
        self
    }

    /// Enables or disables paragraph reflow. See
    /// [`RenderConfig::handle_paragraphs`].
    pub fn handle_paragraphs(mut self, enabled: bool) -> Self {
        self.config = self.config.handle_paragraphs(enabled);
        self
    }

    /// Sets the justification. See [`RenderConfig::justification`].
    pub fn justification(mut self, justification: Justification) -> Self {
        self.config = self.config.justification(justification);
        self
    }

    /// Sets the composition direction. See [`RenderConfig::backward`].
    pub fn backward(mut self, backward: bool) -> Self {
        self.config = self.config.backward(backward);
        self
    }

    /// Sets inter-glyph stretching. See [`RenderConfig::stretching`].
    pub fn stretching(mut self, stretching: i32) -> Self {
        self.config = self.config.stretching(stretching);
        self
    }

    /// Renders the input text, producing one newline-terminated output row
    /// per font row of each composed line.
    ///
    /// Rendering is deterministic and side-effect-free: identical (font,
    /// configuration, text) inputs always produce byte-identical output.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let resolved = self.config.resolve(self.font);
        let mut composer = Composer {
            font: self.font,
            width: self.config.width,
            smush: resolved.smush,
            justification: resolved.justification,
            backward: resolved.backward,
            handle_paragraphs: self.config.handle_paragraphs,
            stretching: self.config.stretching,
            state: RenderState::new(self.font.height()),
        };
        composer.compose(text);
        String::from_utf8_lossy(&composer.state.output).into_owned()
    }

    /// Renders raw bytes, decoding them as UTF-8 first.
    ///
    /// # Errors
    /// [`EncodingError`] if the bytes are not valid UTF-8.
    pub fn render_bytes(&self, text: &[u8]) -> Result<String, EncodingError> {
        Ok(self.render(str::from_utf8(text)?))
    }
}

/// Resolved user options for a render.
///
/// Only explicitly set options are stored; anything left unset falls back to
/// the font's own defaults when the render starts. A configuration may be
/// reused across renders as long as it is not mutated while a render reads
/// it.
#[must_use]
#[derive(Debug, Clone)]
pub struct RenderConfig {
    width: usize,
    user_smush: SmushMode,
    smush_override: SmushOverride,
    handle_paragraphs: bool,
    justification: Option<Justification>,
    backward: Option<bool>,
    stretching: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            user_smush: SmushMode::empty(),
            smush_override: SmushOverride::Inherit,
            handle_paragraphs: false,
            justification: None,
            backward: None,
            stretching: 0,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum output width. Values below 1 are clamped up to 1.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Sets the smushing mode from a single signed value: anything below `-1`
    /// removes the override so the font default applies, `-1` selects kerning
    /// only, and values `>= 0` are taken as an explicit rule bitmask with
    /// smushing enabled.
    pub fn smushing(mut self, mode: i32) -> Self {
        if mode < -1 {
            self.smush_override = SmushOverride::Inherit;
        } else {
            self.user_smush = if mode == -1 {
                SmushMode::KERN
            } else {
                SmushMode::from_bits_retain(mode as u32 & 63) | SmushMode::SMUSH
            };
            self.smush_override = SmushOverride::UseUser;
        }
        self
    }

    /// Sets an explicit layout bitmask together with how it combines with the
    /// font's own layout.
    pub fn smush_mode(mut self, mode: SmushMode, combine: SmushOverride) -> Self {
        self.user_smush = mode;
        self.smush_override = combine;
        self
    }

    /// Enables paragraph reflow: a lone newline joins its paragraph as a
    /// single space, while consecutive newlines pass through as paragraph
    /// breaks.
    pub fn handle_paragraphs(mut self, enabled: bool) -> Self {
        self.handle_paragraphs = enabled;
        self
    }

    /// Sets the justification. When unset, it follows the font's print
    /// direction: left for left-to-right, right for right-to-left.
    pub fn justification(mut self, justification: Justification) -> Self {
        self.justification = Some(justification);
        self
    }

    /// Sets the composition direction. When unset, it follows the font's
    /// print direction.
    pub fn backward(mut self, backward: bool) -> Self {
        self.backward = Some(backward);
        self
    }

    /// Sets the number of blank columns inserted between glyphs. Stretching
    /// disables kerning and smushing; negative values are clamped to 0.
    pub fn stretching(mut self, stretching: i32) -> Self {
        self.stretching = stretching.max(0) as usize;
        self
    }

    fn resolve(&self, font: &FontDescriptor) -> Resolved {
        let font_smush = SmushMode::from_layout(font.old_layout(), font.full_layout());
        let smush = match self.smush_override {
            SmushOverride::Inherit => font_smush,
            SmushOverride::UseUser => self.user_smush,
            SmushOverride::ForceCombine => font_smush | self.user_smush,
        };
        let backward = self
            .backward
            .unwrap_or(font.print_direction() == PrintDirection::RightToLeft);
        let justification = self.justification.unwrap_or(match font.print_direction() {
            PrintDirection::LeftToRight => Justification::Left,
            PrintDirection::RightToLeft => Justification::Right,
        });
        Resolved {
            smush,
            justification,
            backward,
        }
    }
}

/// How a user-supplied layout bitmask combines with the font's default.
///
/// A single three-way tag rather than separate booleans, so precedence
/// resolution is a total function with no invalid combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmushOverride {
    /// Use the font's layout and ignore the user bitmask.
    #[default]
    Inherit,
    /// Use the user bitmask and ignore the font's layout.
    UseUser,
    /// Bitwise OR of the font layout and the user bitmask.
    ForceCombine,
}

/// Line justification within the configured width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    /// No leading padding.
    Left,
    /// Half of the unused width as leading padding, rounded down.
    Center,
    /// All of the unused width as leading padding.
    Right,
}

/// The input text is not valid UTF-8.
#[derive(Debug, Error)]
#[error("input text is not valid UTF-8")]
pub struct EncodingError(#[from] str::Utf8Error);

#[derive(Debug, Clone, Copy)]
struct Resolved {
    smush: SmushMode,
    justification: Justification,
    backward: bool,
}

/// Transient per-render state: created fresh for every render call and
/// discarded at the end, never stored on the long-lived renderer.
#[derive(Debug)]
struct RenderState {
    output: Vec<u8>,
    /// The in-progress line, one buffer per font row.
    line: Vec<Vec<u8>>,
    /// Composed length of the current line, measured on the first row.
    line_len: usize,
    /// The characters placed on the current line, for re-wrapping.
    chars: Vec<char>,
    /// Word-break state: 0 no pending break, 1 inside a word, 2 a space has
    /// been seen (line may split there), 3 inside a later word, -1 skip mode
    /// after an oversized glyph was force-emitted.
    word_break: i32,
    prev_width: usize,
    cur_width: usize,
}

impl RenderState {
    fn new(height: usize) -> Self {
        Self {
            output: Vec::new(),
            line: vec![Vec::new(); height],
            line_len: 0,
            chars: Vec::new(),
            word_break: 0,
            prev_width: 0,
            cur_width: 0,
        }
    }
}

struct Composer<'font> {
    font: &'font FontDescriptor,
    width: usize,
    smush: SmushMode,
    justification: Justification,
    backward: bool,
    handle_paragraphs: bool,
    stretching: usize,
    state: RenderState,
}

impl Composer<'_> {
    fn compose(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let mut last_was_eol = false;
        for (i, &raw) in chars.iter().enumerate() {
            let mut c = raw;
            if c == '\n' && self.handle_paragraphs && !last_was_eol {
                // A lone newline is a mid-paragraph join unless the next
                // character (or end of input) makes it a paragraph break.
                c = match chars.get(i + 1) {
                    Some(&next) if !is_space(next) => ' ',
                    _ => '\n',
                };
            }
            last_was_eol = is_space(c) && c != '\t' && c != ' ';
            if is_space(c) {
                c = if c == '\t' || c == ' ' { ' ' } else { '\n' };
            }
            let code = u32::from(c);
            if (code < 32 && c != '\n') || code == 127 {
                continue;
            }
            self.place(c);
        }
        if self.state.line_len != 0 {
            self.append_line();
        }
    }

    /// Runs the word-break state machine for one character, retrying the
    /// placement after a flush when the character did not fit.
    fn place(&mut self, c: char) {
        loop {
            if self.state.word_break == -1 {
                // Skip mode: swallow a run of spaces or one newline after an
                // oversized glyph was emitted alone.
                if c == ' ' {
                    return;
                }
                if c == '\n' {
                    self.state.word_break = 0;
                    return;
                }
                self.state.word_break = 0;
            }
            if c == '\n' {
                self.append_line();
                self.state.word_break = 0;
            } else if self.add_char(c) {
                self.state.word_break = if c != ' ' {
                    if self.state.word_break >= 2 {
                        3
                    } else {
                        1
                    }
                } else if self.state.word_break > 0 {
                    2
                } else {
                    0
                };
            } else if self.state.line_len == 0 {
                self.emit_oversized(c);
                self.state.word_break = -1;
            } else if c == ' ' {
                if self.state.word_break == 2 {
                    self.split_line();
                } else {
                    self.append_line();
                }
                self.state.word_break = -1;
            } else {
                if self.state.word_break >= 2 {
                    self.split_line();
                } else {
                    self.append_line();
                }
                self.state.word_break = if self.state.word_break == 3 { 1 } else { 0 };
                // Retry the same character against the cleared line.
                continue;
            }
            return;
        }
    }

    /// Attempts to append a glyph to the current line, smushing or kerning it
    /// against the line's trailing edge. Returns false when it does not fit
    /// within the configured width.
    fn add_char(&mut self, c: char) -> bool {
        let font = self.font;
        let Some(glyph) = font.glyph(c) else {
            // Characters without a glyph are silently skipped.
            return true;
        };
        self.state.prev_width = self.state.cur_width;
        self.state.cur_width = glyph.width();
        let amount = self.smush_amount(glyph);
        if self.state.line_len + self.state.cur_width - amount > self.width {
            return false;
        }
        let stretch = if self.stretching > 0 && self.state.line_len > 0 {
            self.stretching
        } else {
            0
        };
        let smusher = self.smusher();
        let backward = self.backward;
        let line_len = self.state.line_len;
        let cur_width = self.state.cur_width;
        for (buf_row, char_row) in izip!(&mut self.state.line, glyph.rows()) {
            if backward {
                let mut merged = char_row.clone();
                for k in 0..amount {
                    let pos = cur_width - amount + k;
                    let left = merged.get(pos).copied().unwrap_or(b' ');
                    let right = buf_row.get(k).copied().unwrap_or(b' ');
                    if let Some(combined) = smusher.smush(left, right) {
                        if pos >= merged.len() {
                            merged.resize(pos + 1, b' ');
                        }
                        merged[pos] = combined;
                    }
                }
                merged.extend(repeat_n(b' ', stretch));
                merged.extend(buf_row.get(amount..).unwrap_or_default());
                *buf_row = merged;
            } else {
                for k in 0..amount {
                    let Some(pos) = (line_len + k).checked_sub(amount) else {
                        continue;
                    };
                    let left = buf_row.get(pos).copied().unwrap_or(b' ');
                    let right = char_row.get(k).copied().unwrap_or(b' ');
                    if let Some(combined) = smusher.smush(left, right) {
                        if pos >= buf_row.len() {
                            buf_row.resize(pos + 1, b' ');
                        }
                        buf_row[pos] = combined;
                    }
                }
                buf_row.extend(repeat_n(b' ', stretch));
                buf_row.extend(char_row.get(amount..).unwrap_or_default());
            }
        }
        self.state.line_len = self.state.line.first().map(Vec::len).unwrap_or(0);
        self.state.chars.push(c);
        true
    }

    /// Maximum number of columns the incoming glyph may overlap the current
    /// line: the minimum permissible overlap across all rows, capped at the
    /// glyph's width. Zero when neither kerning nor smushing is active, or
    /// when stretching is.
    fn smush_amount(&self, glyph: &Glyph) -> usize {
        if !self.smush.intersects(SmushMode::SMUSH | SmushMode::KERN) || self.stretching > 0 {
            return 0;
        }
        let smusher = self.smusher();
        let mut max_amount = self.state.cur_width;
        for (buf_row, char_row) in self.state.line.iter().zip(glyph.rows()) {
            let trailing;
            let leading;
            let mut amount;
            if self.backward {
                let mut charbd = char_row.len();
                while charbd > 0 && char_row.get(charbd).is_none_or(|&b| b == b' ') {
                    charbd -= 1;
                }
                trailing = char_row.get(charbd).copied();
                let mut linebd = 0;
                while buf_row.get(linebd) == Some(&b' ') {
                    linebd += 1;
                }
                leading = buf_row.get(linebd).copied();
                amount = linebd as i64 + self.state.cur_width as i64 - 1 - charbd as i64;
            } else {
                let mut linebd = buf_row.len();
                while linebd > 0 && buf_row.get(linebd).is_none_or(|&b| b == b' ') {
                    linebd -= 1;
                }
                trailing = buf_row.get(linebd).copied();
                let mut charbd = 0;
                while char_row.get(charbd) == Some(&b' ') {
                    charbd += 1;
                }
                leading = char_row.get(charbd).copied();
                amount = charbd as i64 + self.state.line_len as i64 - 1 - linebd as i64;
            }
            match trailing {
                None | Some(b' ') => amount += 1,
                Some(t) => {
                    if let Some(l) = leading {
                        if smusher.smush(t, l).is_some() {
                            amount += 1;
                        }
                    }
                }
            }
            max_amount = max_amount.min(amount.max(0) as usize);
        }
        max_amount
    }

    /// Emits a glyph that cannot fit even on an empty line, alone on its own
    /// line. In right-to-left composition the trailing edge is clipped to the
    /// configured width.
    fn emit_oversized(&mut self, c: char) {
        let font = self.font;
        let Some(glyph) = font.glyph(c) else {
            return;
        };
        for row in glyph.rows() {
            if self.backward && self.width > 1 {
                let offset = row.len().saturating_sub(self.width);
                self.put_string(&row[offset..]);
            } else {
                self.put_string(row);
            }
        }
    }

    /// Splits the buffered line at its last run of consecutive blanks,
    /// flushes the first part and starts a fresh line with the remainder.
    fn split_line(&mut self) {
        let chars = mem::take(&mut self.state.chars);
        let mut last_space = None;
        let mut break_at = 0;
        for (i, &c) in chars.iter().enumerate().rev() {
            if last_space.is_none() {
                if c == ' ' {
                    last_space = Some(i);
                }
            } else if c != ' ' {
                break_at = i + 1;
                break;
            }
        }
        let Some(last_space) = last_space else {
            // No split point after all; flush the line as-is.
            self.state.chars = chars;
            self.append_line();
            return;
        };
        let first: Vec<char> = chars[..break_at].to_vec();
        let rest: Vec<char> = chars[last_space + 1..].to_vec();
        self.clear_line();
        for c in first {
            self.add_char(c);
        }
        self.append_line();
        for c in rest {
            self.add_char(c);
        }
    }

    /// Flushes the current line to the output, one row at a time, and clears
    /// it.
    fn append_line(&mut self) {
        let line = mem::take(&mut self.state.line);
        for row in &line {
            self.put_string(row);
        }
        self.clear_line();
    }

    fn clear_line(&mut self) {
        self.state.line = vec![Vec::new(); self.font.height()];
        self.state.line_len = 0;
        self.state.chars.clear();
    }

    /// Appends one output row: justification padding, then the row with
    /// hardblanks replaced by spaces, then a newline.
    fn put_string(&mut self, row: &[u8]) {
        let remaining = self.width.saturating_sub(row.len());
        let pad = match self.justification {
            Justification::Left => 0,
            Justification::Center => remaining / 2,
            Justification::Right => remaining,
        };
        self.state.output.extend(repeat_n(b' ', pad));
        let hardblank = self.font.hardblank();
        self.state
            .output
            .extend(row.iter().map(|&b| if b == hardblank { b' ' } else { b }));
        self.state.output.push(b'\n');
    }

    fn smusher(&self) -> Smusher {
        Smusher {
            mode: self.smush,
            hardblank: self.font.hardblank(),
            backward: self.backward,
            stretching: self.stretching,
            prev_width: self.state.prev_width,
            cur_width: self.state.cur_width,
        }
    }
}

/// The whitespace set the reference tool uses for word-break and paragraph
/// decisions.
const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use crate::font::tests::{font_text, tiny_font};
    use crate::font::FontDescriptor;

    use super::{Justification, RenderConfig, Renderer, SmushMode, SmushOverride};

    #[test]
    fn kerned_hi() {
        let font = tiny_font(0, &[]);
        assert_eq!(Renderer::new(&font).render("hi"), "HI\n");
    }

    #[test]
    fn deterministic() {
        let font = tiny_font(0, &[]);
        let renderer = Renderer::new(&font).width(17);
        assert_eq!(
            renderer.render("same in, same out"),
            renderer.render("same in, same out")
        );
    }

    #[test]
    fn width_zero_equals_width_one() {
        let font = tiny_font(0, &[]);
        let zero = Renderer::new(&font).width(0).render("ab c");
        let one = Renderer::new(&font).width(1).render("ab c");
        assert_eq!(zero, one);
    }

    #[test]
    fn negative_stretching_equals_none() {
        let font = tiny_font(0, &[]);
        let negative = Renderer::new(&font).stretching(-5).render("ab");
        let none = Renderer::new(&font).stretching(0).render("ab");
        assert_eq!(negative, none);
    }

    #[test]
    fn wrap_without_smushing() {
        let font = tiny_font(-1, &[('a', &["AAAA"]), ('b', &["BBBB"])]);
        let rendered = Renderer::new(&font).width(5).render("ab");
        assert_eq!(rendered, "AAAA\nBBBB\n");
    }

    #[test]
    fn wrap_at_word_break() {
        let font = tiny_font(0, &[]);
        let rendered = Renderer::new(&font).width(6).render("one of two");
        assert_eq!(rendered, "ONE OF\nTWO\n");
    }

    #[test]
    fn split_at_last_space_run() {
        let font = tiny_font(0, &[]);
        // Overflow happens mid-word, after a space earlier on the line, so
        // the line splits there instead of flushing whole.
        let rendered = Renderer::new(&font).width(6).render("ab cdef");
        assert_eq!(rendered, "AB\nCDEF\n");
    }

    #[test]
    fn split_swallows_space_run() {
        let font = tiny_font(0, &[]);
        // The whole run of spaces at the split point is dropped, not just
        // the last one.
        let rendered = Renderer::new(&font).width(6).render("ab   cdef");
        assert_eq!(rendered, "AB\nCDEF\n");
    }

    #[test]
    fn right_justification_pads_full_remainder() {
        let font = tiny_font(0, &[('a', &["AAAAAA"])]);
        let rendered = Renderer::new(&font)
            .width(10)
            .justification(Justification::Right)
            .render("a");
        assert_eq!(rendered, "    AAAAAA\n");
    }

    #[test]
    fn center_justification_pads_half() {
        let font = tiny_font(0, &[('a', &["AAAAAA"])]);
        let rendered = Renderer::new(&font)
            .width(10)
            .justification(Justification::Center)
            .render("a");
        assert_eq!(rendered, "  AAAAAA\n");
    }

    #[test]
    fn equal_character_smushing() {
        let font = tiny_font(1, &[('a', &["A_"]), ('b', &["_B"])]);
        assert_eq!(Renderer::new(&font).render("ab"), "A_B\n");
    }

    #[test]
    fn stretching_inserts_literal_gaps() {
        let font = tiny_font(1, &[('a', &["A_"]), ('b', &["_B"])]);
        let rendered = Renderer::new(&font).stretching(2).render("ab");
        // No overlap at all, and no gap before the first glyph.
        assert_eq!(rendered, "A_  _B\n");
    }

    #[test]
    fn paragraph_reflow_joins_lone_newlines() {
        let font = tiny_font(0, &[]);
        let renderer = Renderer::new(&font).handle_paragraphs(true);
        assert_eq!(renderer.render("one\ntwo"), renderer.render("one two"));
        assert_eq!(renderer.render("one\n\ntwo"), "ONE\n\nTWO\n");
    }

    #[test]
    fn newlines_kept_without_paragraph_handling() {
        let font = tiny_font(0, &[]);
        assert_eq!(Renderer::new(&font).render("one\ntwo"), "ONE\nTWO\n");
    }

    #[test]
    fn oversized_glyph_emitted_alone() {
        let font = tiny_font(0, &[('a', &["AAAA"])]);
        let rendered = Renderer::new(&font).width(3).render("a  b");
        // The glyph goes out on its own line and the following run of spaces
        // is swallowed.
        assert_eq!(rendered, "AAAA\nB\n");
    }

    #[test]
    fn rtl_font_defaults() {
        let font = FontDescriptor::from_bytes(font_text(1, 0, 1, &[])).unwrap();
        let rendered = Renderer::new(&font).width(10).render("hi");
        assert_eq!(rendered, "        IH\n");
    }

    #[test]
    fn multi_row_composition() {
        let font = FontDescriptor::from_bytes(font_text(
            2,
            0,
            0,
            &[('a', &["/\\", "\\/"]), ('b', &["__", "__"])],
        ))
        .unwrap();
        let rendered = Renderer::new(&font).render("ab");
        assert_eq!(rendered, "/\\__\n\\/__\n");
    }

    #[test]
    fn hardblanks_become_spaces_in_output() {
        let font = tiny_font(0, &[('a', &["A$A"])]);
        assert_eq!(Renderer::new(&font).render("a"), "A A\n");
    }

    #[test]
    fn smushing_override_modes() {
        let font = tiny_font(1, &[]);
        let config = RenderConfig::new().smushing(-2);
        assert_eq!(config.smush_override, SmushOverride::Inherit);
        let config = RenderConfig::new().smushing(-1);
        assert_eq!(config.user_smush, SmushMode::KERN);
        assert_eq!(config.smush_override, SmushOverride::UseUser);
        let config = RenderConfig::new().smushing(5);
        assert_eq!(
            config.user_smush,
            SmushMode::EQUAL | SmushMode::HIERARCHY | SmushMode::SMUSH
        );
        let forced = RenderConfig::new()
            .smush_mode(SmushMode::KERN, SmushOverride::ForceCombine)
            .resolve(&font);
        // old_layout 1 gives EQUAL | SMUSH; force-combine ORs the user mask
        // on top.
        assert_eq!(
            forced.smush,
            SmushMode::EQUAL | SmushMode::SMUSH | SmushMode::KERN
        );
    }

    #[test]
    fn render_bytes_rejects_invalid_utf8() {
        let font = tiny_font(0, &[]);
        let renderer = Renderer::new(&font);
        assert!(renderer.render_bytes(b"\xff\xfe").is_err());
        assert_eq!(renderer.render_bytes(b"hi").unwrap(), "HI\n");
    }

    #[test]
    fn empty_input_renders_nothing() {
        let font = tiny_font(0, &[]);
        assert_eq!(Renderer::new(&font).render(""), "");
    }

    #[test]
    fn control_characters_dropped() {
        let font = tiny_font(0, &[]);
        assert_eq!(Renderer::new(&font).render("h\x01i\x7f"), "HI\n");
    }
}
