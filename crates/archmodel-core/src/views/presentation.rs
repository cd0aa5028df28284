//! Presentation data carried by views
//!
//! Stored and validated here, interpreted by whatever renders the diagrams.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ArchModelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Paper sizes at 300 dpi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A6Portrait,
    A6Landscape,
    A5Portrait,
    A5Landscape,
    A4Portrait,
    A4Landscape,
    A3Portrait,
    A3Landscape,
    A2Portrait,
    A2Landscape,
    A1Portrait,
    A1Landscape,
    A0Portrait,
    A0Landscape,
    LetterPortrait,
    LetterLandscape,
    LegalPortrait,
    LegalLandscape,
    Slide4x3,
    Slide16x9,
    Slide16x10,
}

impl PaperSize {
    /// Width and height in pixels
    pub fn size(&self) -> (u32, u32) {
        match self {
            PaperSize::A6Portrait => (1240, 1748),
            PaperSize::A6Landscape => (1748, 1240),
            PaperSize::A5Portrait => (1748, 2480),
            PaperSize::A5Landscape => (2480, 1748),
            PaperSize::A4Portrait => (2480, 3508),
            PaperSize::A4Landscape => (3508, 2480),
            PaperSize::A3Portrait => (3508, 4961),
            PaperSize::A3Landscape => (4961, 3508),
            PaperSize::A2Portrait => (4961, 7016),
            PaperSize::A2Landscape => (7016, 4961),
            PaperSize::A1Portrait => (7016, 9933),
            PaperSize::A1Landscape => (9933, 7016),
            PaperSize::A0Portrait => (9933, 14043),
            PaperSize::A0Landscape => (14043, 9933),
            PaperSize::LetterPortrait => (2550, 3300),
            PaperSize::LetterLandscape => (3300, 2550),
            PaperSize::LegalPortrait => (2550, 4200),
            PaperSize::LegalLandscape => (4200, 2550),
            PaperSize::Slide4x3 => (3306, 2480),
            PaperSize::Slide16x9 => (3508, 1973),
            PaperSize::Slide16x10 => (3508, 2193),
        }
    }

    pub fn width(&self) -> u32 {
        self.size().0
    }

    pub fn height(&self) -> u32 {
        self.size().1
    }

    pub fn orientation(&self) -> Orientation {
        let (width, height) = self.size();
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Explicit canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    width: i64,
    height: i64,
}

impl Dimensions {
    /// # Errors
    /// Returns `InvalidDimensions` for a negative width or height.
    pub fn new(width: i64, height: i64) -> Result<Self> {
        if width < 0 {
            return Err(ArchModelError::InvalidDimensions {
                reason: "The width must be a positive integer.".to_string(),
            });
        }
        if height < 0 {
            return Err(ArchModelError::InvalidDimensions {
                reason: "The height must be a positive integer.".to_string(),
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDirection {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

/// Settings handed to an automatic layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomaticLayout {
    pub rank_direction: RankDirection,
    pub rank_separation: u32,
    pub node_separation: u32,
    pub edge_separation: u32,
    pub vertices: bool,
}

impl Default for AutomaticLayout {
    fn default() -> Self {
        Self {
            rank_direction: RankDirection::TopBottom,
            rank_separation: 300,
            node_separation: 600,
            edge_separation: 200,
            vertices: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Routing {
    Direct,
    Orthogonal,
    Curved,
}

/// A bend point on a relationship line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i64,
    pub y: i64,
}

impl Vertex {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Shape used when rendering an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Box,
    RoundedBox,
    Circle,
    Ellipse,
    Hexagon,
    Diamond,
    Cylinder,
    Pipe,
    Person,
    Robot,
    Folder,
    WebBrowser,
    MobileDevicePortrait,
    MobileDeviceLandscape,
    Component,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
