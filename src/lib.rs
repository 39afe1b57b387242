//! A crate for parsing FIGlet fonts and rendering text as large multi-line
//! ASCII-art banners.
//!
//! # Features
//!
//! - Parses `.flf` font-description files, optionally gzip-compressed
//!   ([`FontDescriptor`](crate::font::FontDescriptor))
//! - Horizontal kerning and smushing with the full controlled rule set
//!   ([`SmushMode`](crate::render::SmushMode))
//! - Automatic line breaking at word boundaries for a maximum output width
//! - Left/center/right justification, right-to-left rendering and paragraph
//!   reflow ([`Renderer`](crate::render::Renderer))
//!
//! # Example
//!
//! ```no_run
//! use figtext::font::FontDescriptor;
//! use figtext::render::{Justification, Renderer};
//!
//! let font = FontDescriptor::load("fonts/standard.flf")?;
//! let banner = Renderer::new(&font)
//!     .width(80)
//!     .justification(Justification::Center)
//!     .render("Hello!");
//! print!("{banner}");
//! # Ok::<(), figtext::font::FontError>(())
//! ```
//!
//! A [`FontDescriptor`](crate::font::FontDescriptor) is immutable once built
//! and can be shared freely between threads; every render call runs on its own
//! transient state, so any number of renders may use the same font
//! concurrently.

pub mod font;
pub mod render;
