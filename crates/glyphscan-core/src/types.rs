// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Glyphscan: image geometry, grid layout, labels, and
// the per-cell records written at the end of a run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GlyphscanError, Result};

// -- Geometry -----------------------------------------------------------------

/// Integer image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// A quadrilateral candidate: exactly four vertices in cyclic order.
///
/// After canonicalization, index 0 is the anchor (upper-left) vertex and every
/// positional comparison between squares goes through [`Square::anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    vertices: [Point; 4],
}

impl Square {
    pub const fn new(vertices: [Point; 4]) -> Self {
        Self { vertices }
    }

    /// Build a square from a simplified polygon. Returns `None` unless the
    /// polygon has exactly four vertices.
    pub fn from_polygon(points: &[Point]) -> Option<Self> {
        let vertices: [Point; 4] = points.try_into().ok()?;
        Some(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Point {
        self.vertices[index % 4]
    }

    /// First vertex; the upper-left corner once canonicalized.
    pub fn anchor(&self) -> Point {
        self.vertices[0]
    }

    /// Cyclically rotate so that `vertex(mid)` becomes index 0.
    pub fn rotated_left(&self, mid: usize) -> Self {
        let mut vertices = self.vertices;
        vertices.rotate_left(mid % 4);
        Self { vertices }
    }

    /// Polygon area using the shoelace formula.
    pub fn area(&self) -> f64 {
        let mut twice_area = 0i64;
        for i in 0..4 {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % 4];
            twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        twice_area.abs() as f64 / 2.0
    }

    /// True when every turn along the outline has the same orientation.
    pub fn is_convex(&self) -> bool {
        let mut sign = 0i64;
        for i in 0..4 {
            let a = self.vertex(i);
            let b = self.vertex(i + 1);
            let c = self.vertex(i + 2);
            let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64
                - (b.y - a.y) as i64 * (c.x - b.x) as i64;
            if cross == 0 {
                return false;
            }
            if sign == 0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Largest absolute cosine among the corners at vertices 1, 2 and 3.
    ///
    /// Values near 0 mean right angles.
    pub fn max_corner_cosine(&self) -> f64 {
        (2..5)
            .map(|j| corner_cosine(self.vertex(j), self.vertex(j - 2), self.vertex(j - 1)).abs())
            .fold(0.0, f64::max)
    }

    /// Axis-aligned crop between the first and third vertices (opposite
    /// corners). Negative coordinates are clamped to the image origin.
    pub fn crop_rect(&self) -> CropRect {
        let a = self.vertices[0];
        let c = self.vertices[2];
        let (x0, x1) = (a.x.min(c.x).max(0), a.x.max(c.x).max(0));
        let (y0, y1) = (a.y.min(c.y).max(0), a.y.max(c.y).max(0));
        CropRect {
            x: x0 as u32,
            y: y0 as u32,
            width: x0.abs_diff(x1),
            height: y0.abs_diff(y1),
        }
    }
}

/// Cosine of the angle between `pivot -> a` and `pivot -> b`.
fn corner_cosine(a: Point, b: Point, pivot: Point) -> f64 {
    let dx1 = (a.x - pivot.x) as f64;
    let dy1 = (a.y - pivot.y) as f64;
    let dx2 = (b.x - pivot.x) as f64;
    let dy2 = (b.y - pivot.y) as f64;
    (dx1 * dx2 + dy1 * dy2) / ((dx1 * dx1 + dy1 * dy1) * (dx2 * dx2 + dy2 * dy2) + 1e-10).sqrt()
}

/// Rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Clamp the rectangle so it lies inside a `width` x `height` image.
    /// A rectangle starting past the right or bottom edge becomes empty.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// -- Grid layout --------------------------------------------------------------

/// Squares sharing one vertical band, left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    squares: Vec<Square>,
}

impl Row {
    pub fn new(squares: Vec<Square>) -> Self {
        Self { squares }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn push(&mut self, square: Square) {
        self.squares.push(square);
    }

    /// Anchor y of the first square.
    pub fn representative_y(&self) -> Option<i32> {
        self.squares.first().map(|sq| sq.anchor().y)
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Order cells by anchor x. Stable, so equal x keeps arrival order.
    pub fn sort_by_column(&mut self) {
        self.squares.sort_by_key(|sq| sq.anchor().x);
    }
}

/// Rows top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    /// Iterate over every square in reading order.
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.rows.iter().flat_map(|row| row.squares().iter())
    }
}

// -- Labels -------------------------------------------------------------------

/// The fourteen pictograms printed on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolLabel {
    Accident,
    Bomb,
    Car,
    Casualty,
    Electricity,
    Fire,
    FireBrigade,
    Flood,
    Gas,
    Injury,
    Paramedics,
    Person,
    Police,
    RoadBlock,
}

impl SymbolLabel {
    /// Every symbol, in template-library order.
    pub const ALL: [SymbolLabel; 14] = [
        Self::Accident,
        Self::Bomb,
        Self::Car,
        Self::Casualty,
        Self::Electricity,
        Self::Fire,
        Self::FireBrigade,
        Self::Flood,
        Self::Gas,
        Self::Injury,
        Self::Paramedics,
        Self::Person,
        Self::Police,
        Self::RoadBlock,
    ];

    /// Label as written in filenames and metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Bomb => "bomb",
            Self::Car => "car",
            Self::Casualty => "casualty",
            Self::Electricity => "electricity",
            Self::Fire => "fire",
            Self::FireBrigade => "fire_brigade",
            Self::Flood => "flood",
            Self::Gas => "gas",
            Self::Injury => "injury",
            Self::Paramedics => "paramedics",
            Self::Person => "person",
            Self::Police => "police",
            Self::RoadBlock => "road_block",
        }
    }
}

impl fmt::Display for SymbolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical size category of a drawn pictogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeLabel {
    Small,
    Medium,
    Large,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol and size decided for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub symbol: SymbolLabel,
    pub size: SizeLabel,
}

// -- Forms and records ----------------------------------------------------------

/// Scripter and page identifiers encoded in a scan's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId {
    pub scripter: String,
    pub page: String,
}

impl FormId {
    /// Parse `.../w<NNN>-scans/<page>.<ext>`.
    ///
    /// The immediate parent directory carries the three-digit scripter id and
    /// the file stem is the page id.
    pub fn from_path(path: &Path) -> Result<Self> {
        let invalid = || GlyphscanError::InvalidSourcePath {
            path: path.to_path_buf(),
        };

        let page = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(invalid)?;

        let dir = path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .ok_or_else(invalid)?;

        let scripter = dir
            .strip_prefix('w')
            .and_then(|rest| rest.strip_suffix("-scans"))
            .filter(|id| id.len() == 3 && id.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(invalid)?;

        Ok(Self {
            scripter: scripter.to_string(),
            page: page.to_string(),
        })
    }

    /// Scripter id followed by page id, as written in the `form` field.
    pub fn form_code(&self) -> String {
        format!("{}{}", self.scripter, self.page)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}/{}", self.scripter, self.page)
    }
}

/// One recorded grid cell and the artifacts written for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// 1-based row index.
    pub row: usize,
    /// 1-based column index within the row.
    pub column: usize,
    pub scripter: String,
    pub page: String,
    pub symbol: SymbolLabel,
    pub size: SizeLabel,
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(points: [(i32, i32); 4]) -> Square {
        Square::new(points.map(|(x, y)| Point::new(x, y)))
    }

    #[test]
    fn form_id_from_scan_path() {
        let form = FormId::from_path(Path::new("/data/scans/w042-scans/00217.png")).unwrap();
        assert_eq!(form.scripter, "042");
        assert_eq!(form.page, "00217");
        assert_eq!(form.form_code(), "04200217");
    }

    #[test]
    fn form_id_rejects_non_conforming_paths() {
        for path in [
            "/data/scans/00217.png",
            "/data/w42-scans/00217.png",
            "/data/w0420-scans/00217.png",
            "/data/wabc-scans/00217.png",
            "/data/w042-scan/00217.png",
            "w042-scans",
        ] {
            let err = FormId::from_path(Path::new(path)).unwrap_err();
            assert!(
                matches!(err, GlyphscanError::InvalidSourcePath { .. }),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn from_polygon_requires_four_vertices() {
        let tri = [Point::new(0, 0), Point::new(5, 0), Point::new(0, 5)];
        assert!(Square::from_polygon(&tri).is_none());

        let quad = [
            Point::new(0, 0),
            Point::new(5, 0),
            Point::new(5, 5),
            Point::new(0, 5),
        ];
        assert_eq!(Square::from_polygon(&quad).unwrap().anchor(), Point::new(0, 0));
    }

    #[test]
    fn rotation_preserves_cyclic_order() {
        let sq = square([(1, 1), (2, 2), (3, 3), (4, 4)]);
        let rotated = sq.rotated_left(2);
        assert_eq!(rotated, square([(3, 3), (4, 4), (1, 1), (2, 2)]));
        assert_eq!(sq.rotated_left(4), sq);
    }

    #[test]
    fn rectangle_geometry() {
        let sq = square([(10, 20), (110, 20), (110, 70), (10, 70)]);
        assert!((sq.area() - 5000.0).abs() < 1e-9);
        assert!(sq.is_convex());
        assert!(sq.max_corner_cosine() < 1e-6);
        assert_eq!(
            sq.crop_rect(),
            CropRect {
                x: 10,
                y: 20,
                width: 100,
                height: 50
            }
        );
    }

    #[test]
    fn bow_tie_is_not_convex() {
        let sq = square([(0, 0), (10, 10), (10, 0), (0, 10)]);
        assert!(!sq.is_convex());
    }

    #[test]
    fn crop_rect_uses_opposite_corners_in_any_direction() {
        let sq = square([(110, 70), (10, 70), (10, 20), (110, 20)]);
        assert_eq!(
            sq.crop_rect(),
            CropRect {
                x: 10,
                y: 20,
                width: 100,
                height: 50
            }
        );
    }

    #[test]
    fn crop_rect_past_the_origin_keeps_the_far_corner() {
        let sq = square([(-10, -10), (90, -10), (90, 90), (-10, 90)]);
        assert_eq!(
            sq.crop_rect(),
            CropRect {
                x: 0,
                y: 0,
                width: 90,
                height: 90
            }
        );

        let outside = square([(-50, 20), (-5, 20), (-5, 60), (-50, 60)]);
        assert!(outside.crop_rect().is_empty());
    }

    #[test]
    fn crop_rect_clamps_to_image() {
        let rect = CropRect {
            x: 90,
            y: 5,
            width: 50,
            height: 50,
        }
        .clamped(100, 40);
        assert_eq!(
            rect,
            CropRect {
                x: 90,
                y: 5,
                width: 10,
                height: 35
            }
        );
        assert!(
            CropRect {
                x: 120,
                y: 0,
                width: 10,
                height: 10
            }
            .clamped(100, 40)
            .is_empty()
        );
    }

    #[test]
    fn label_strings() {
        assert_eq!(SymbolLabel::ALL.len(), 14);
        assert_eq!(SymbolLabel::FireBrigade.to_string(), "fire_brigade");
        assert_eq!(SymbolLabel::RoadBlock.as_str(), "road_block");
        assert_eq!(SizeLabel::Medium.to_string(), "medium");
    }

    #[test]
    fn row_representative_y_is_first_anchor() {
        let mut row = Row::default();
        assert_eq!(row.representative_y(), None);
        row.push(square([(300, 105), (400, 105), (400, 205), (300, 205)]));
        row.push(square([(100, 98), (200, 98), (200, 198), (100, 198)]));
        assert_eq!(row.representative_y(), Some(105));
        row.sort_by_column();
        assert_eq!(row.squares()[0].anchor().x, 100);
    }
}
