//! Document collaborator contract: draw instructions in, bytes out.

use crate::charts::RasterImage;
use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size_pt: f32,
}

impl TextStyle {
    #[must_use]
    pub const fn regular(size_pt: f32) -> Self {
        Self {
            weight: FontWeight::Regular,
            size_pt,
        }
    }

    #[must_use]
    pub const fn bold(size_pt: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            size_pt,
        }
    }
}

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4_PORTRAIT: Self = Self {
        width: 210.0,
        height: 297.0,
    };
}

/// One positioned instruction. Coordinates are millimetres from the top-left
/// corner; text `y` is the baseline, image `y` the top edge.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        align: Align,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: RasterImage,
    },
    PageBreak,
}

pub trait DocumentRenderer: Send + Sync {
    fn page_size(&self) -> PageSize;

    /// Wrap `text` into lines no wider than `max_width` millimetres.
    fn split_text(&self, text: &str, max_width: f32, style: TextStyle) -> Vec<String>;

    /// Render the instructions into a finished document.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if an image cannot be decoded or the document
    /// cannot be serialized.
    fn render(&self, commands: &[DrawCommand]) -> Result<Vec<u8>, ReportError>;
}
