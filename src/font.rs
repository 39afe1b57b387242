//! FIGlet font descriptors
//!
//! Types and the logic for parsing `.flf` font-description files.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::str::{self, FromStr};

use bstr::{BString, ByteSlice as _};
use flate2::read::GzDecoder;
use thiserror::Error;

/// The 5-byte signature required at the start of every font file.
pub const SIGNATURE: &[u8; 5] = b"flf2a";

/// Code points of the seven Deutsch glyphs that may follow the 95 printable
/// ASCII glyphs.
pub const DEUTSCH_CODEPOINTS: [u32; 7] = [196, 214, 220, 228, 246, 252, 223];

/// A parsed FIGlet font: the header metadata plus the glyph table.
///
/// Built once by [`FontDescriptor::load`] (or [`FontDescriptor::from_bytes`])
/// and never mutated afterwards, so a single descriptor can be shared across
/// any number of renders without synchronization.
#[derive(Debug)]
pub struct FontDescriptor {
    hardblank: u8,
    height: usize,
    baseline: i32,
    max_length: usize,
    old_layout: i32,
    comment_lines: usize,
    print_direction: PrintDirection,
    full_layout: Option<u32>,
    codetag_count: Option<u32>,
    glyphs: HashMap<u32, Glyph>,
}

impl FontDescriptor {
    /// Loads a font from an `.flf` file, decompressing transparently when the
    /// file name ends in `.gz`.
    ///
    /// Uncompressed files are read under a shared advisory lock so a parse
    /// cannot interleave with a concurrent writer; the lock is released when
    /// the file is closed.
    ///
    /// # Errors
    /// [`FontError::Io`] if the file is missing, unreadable or fails to
    /// decompress; [`FontError::Format`] if its contents are not a valid
    /// FIGlet font. Both carry the offending path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let io_err = |source| FontError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let compressed = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        let mut bytes = Vec::new();
        if compressed {
            GzDecoder::new(file)
                .read_to_end(&mut bytes)
                .map_err(io_err)?;
        } else {
            fs2::FileExt::lock_shared(&file).map_err(io_err)?;
            file.read_to_end(&mut bytes).map_err(io_err)?;
        }
        let font = Self::from_bytes(&bytes).map_err(|source| FontError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "loaded font {} ({} glyphs, height {})",
            path.display(),
            font.glyphs.len(),
            font.height
        );
        Ok(font)
    }

    /// Decodes the contents of an `.flf` file already in memory.
    ///
    /// # Errors
    /// Returns `Err` on a bad signature, an unparseable header or a required
    /// glyph cut short by end of input; see [`FormatError`].
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, FormatError> {
        let mut lines = bytes.as_ref().lines();
        let header_line = lines.next().ok_or(FormatError::MissingHeader)?;
        let mut font = Self::decode_header(header_line)?;
        for _ in 0..font.comment_lines {
            lines.next();
        }
        font.decode_glyphs(&mut lines)?;
        Ok(font)
    }

    fn decode_header(line: &[u8]) -> Result<Self, FormatError> {
        let Some(rest) = line.strip_prefix(SIGNATURE.as_slice()) else {
            return Err(FormatError::BadSignature(line.into()));
        };
        let Some((&hardblank, rest)) = rest.split_first() else {
            return Err(FormatError::NotEnoughFields(line.into()));
        };
        let mut fields = rest
            .split(|&b| b == b' ')
            .filter(|field| !field.is_empty());
        let mut required = || {
            fields
                .next()
                .ok_or_else(|| FormatError::NotEnoughFields(line.into()))
        };
        let height = parse_field::<i64>("Height", required()?)?.max(1) as usize;
        let baseline = parse_field::<i32>("Baseline", required()?)?;
        let max_length = parse_field::<i64>("Max_Length", required()?)?.max(1) as usize + 100;
        let old_layout = parse_field::<i32>("Old_Layout", required()?)?;
        // Trailing fields are optional and, like the reference tool's
        // sscanf, reading stops silently at the first one that fails to
        // parse.
        let mut trailing = Vec::new();
        for field in fields {
            match str::from_utf8(field).ok().and_then(|s| s.parse::<i64>().ok()) {
                Some(value) => trailing.push(value),
                None => break,
            }
        }
        let comment_lines = trailing.first().copied().unwrap_or(0).max(0) as usize;
        let print_direction = match trailing.get(1).copied().unwrap_or(0) {
            0 => PrintDirection::LeftToRight,
            _ => PrintDirection::RightToLeft,
        };
        let full_layout = trailing.get(2).map(|&v| v.max(0) as u32);
        let codetag_count = trailing.get(3).map(|&v| v.max(0) as u32);
        Ok(Self {
            hardblank,
            height,
            baseline,
            max_length,
            old_layout,
            comment_lines,
            print_direction,
            full_layout,
            codetag_count,
            glyphs: HashMap::new(),
        })
    }

    fn decode_glyphs<'a>(
        &mut self,
        lines: &mut impl Iterator<Item = &'a [u8]>,
    ) -> Result<(), FormatError> {
        for code in 32..127 {
            let glyph =
                read_glyph(lines, self.height).ok_or(FormatError::TruncatedGlyph(code))?;
            self.glyphs.insert(code, glyph);
        }
        for code in DEUTSCH_CODEPOINTS {
            let Some(glyph) = read_glyph(lines, self.height) else {
                return Ok(());
            };
            // Fonts may leave these seven slots blank to opt out of them.
            if glyph.rows.iter().any(|row| !row.trim().is_empty()) {
                self.glyphs.insert(code, glyph);
            }
        }
        while let Some(code_line) = lines.next() {
            let token = code_line.split(|&b| b == b' ').next().unwrap_or_default();
            let Some(code) = parse_code_tag(token) else {
                // A blank or unparseable code tag ends the extended section.
                break;
            };
            let Some(glyph) = read_glyph(lines, self.height) else {
                break;
            };
            // Later definitions win for duplicated code points.
            self.glyphs.insert(code, glyph);
        }
        Ok(())
    }

    /// The glyph for a character, if the font defines one.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&u32::from(c))
    }

    /// The hardblank byte: rendered as a blank but treated as a visible
    /// sub-character when fitting or smushing, keeping adjacent glyphs apart.
    #[must_use]
    pub const fn hardblank(&self) -> u8 {
        self.hardblank
    }

    /// Number of rows in every glyph of this font. Always at least 1.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Rows from the baseline to the top of the tallest glyph. Informational;
    /// does not affect rendering.
    #[must_use]
    pub const fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Upper bound for glyph row length, with the safety margin applied.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// The legacy layout field from the header, used to derive the smush mode
    /// when no full-layout bitmask is present.
    #[must_use]
    pub const fn old_layout(&self) -> i32 {
        self.old_layout
    }

    /// Number of comment lines that followed the header.
    #[must_use]
    pub const fn comment_lines(&self) -> usize {
        self.comment_lines
    }

    /// The font's default print direction.
    #[must_use]
    pub const fn print_direction(&self) -> PrintDirection {
        self.print_direction
    }

    /// The full-layout bitmask, verbatim from the header when present.
    #[must_use]
    pub const fn full_layout(&self) -> Option<u32> {
        self.full_layout
    }

    /// Number of code-tagged glyphs announced by the header, when present.
    /// Informational; the parser reads the extended section to end of file
    /// regardless.
    #[must_use]
    pub const fn codetag_count(&self) -> Option<u32> {
        self.codetag_count
    }

    /// Number of glyphs in the table.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// A fixed-height, multi-row ASCII image for one code point.
///
/// Every glyph in a font has exactly the font's height in rows. Row widths may
/// legitimately vary, since only trailing end-marks are stripped during
/// parsing, never content.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub(crate) rows: Vec<Vec<u8>>,
}

impl Glyph {
    /// Width of the glyph in sub-characters (bytes), measured on the first
    /// row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// The rows of the glyph, end-marks already stripped.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

/// Printing direction, left-to-right or right-to-left.
///
/// Each font specifies a default; it also determines the default
/// [`Justification`](crate::render::Justification).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintDirection {
    /// Left-to-right.
    LeftToRight,
    /// Right-to-left.
    RightToLeft,
}

fn read_glyph<'a>(lines: &mut impl Iterator<Item = &'a [u8]>, height: usize) -> Option<Glyph> {
    let mut rows = Vec::with_capacity(height);
    for _ in 0..height {
        rows.push(strip_end_mark(lines.next()?));
    }
    Some(Glyph { rows })
}

/// Strips the row's end-mark: the trailing run of 1–2 repeated identical
/// characters. Interior occurrences of the end-mark character are content and
/// stay untouched.
fn strip_end_mark(line: &[u8]) -> Vec<u8> {
    let Some((&last, rest)) = line.split_last() else {
        return Vec::new();
    };
    let run = if rest.last() == Some(&last) { 2 } else { 1 };
    line[..line.len() - run].to_vec()
}

/// Parses the code point from the token before the first space of a code-tag
/// line: hexadecimal with an `0x` prefix, octal with a leading zero (or the
/// negative-zero form some fonts use), decimal otherwise.
fn parse_code_tag(token: &[u8]) -> Option<u32> {
    let token = str::from_utf8(token).ok()?;
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(octal) = token
        .strip_prefix("-0")
        .or_else(|| (token.len() > 1).then(|| token.strip_prefix('0')).flatten())
    {
        u32::from_str_radix(octal, 8).ok()
    } else {
        token.parse().ok()
    }
}

fn parse_field<T: FromStr>(name: &'static str, bytes: &[u8]) -> Result<T, FormatError> {
    str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FormatError::Parse(name, bytes.into()))
}

/// An error loading a font file from disk.
#[derive(Debug, Error)]
pub enum FontError {
    /// The file could not be opened, read or decompressed.
    #[error("cannot read font file {path}")]
    Io {
        /// The path of the font file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not a valid FIGlet font.
    #[error("{path} is not a valid FIGlet font")]
    Format {
        /// The path of the font file.
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// An error in decoding the contents of a font file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input is empty.
    #[error("missing header line")]
    MissingHeader,
    /// The header does not begin with `"flf2a"`.
    #[error(r#"header {0} does not begin with "flf2a""#)]
    BadSignature(BString),
    /// The header ends before the required numeric fields.
    #[error("header {0} is missing required fields")]
    NotEnoughFields(BString),
    /// A required header field cannot be parsed.
    #[error("cannot parse {1} as the `{0}` header field")]
    Parse(&'static str, BString),
    /// End of file inside one of the 95 required glyphs.
    #[error("unexpected end of file in glyph for code point {0}")]
    TruncatedGlyph(u32),
}
