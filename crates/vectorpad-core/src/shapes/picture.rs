//! Picture shape for embedding raster images.
//!
//! A picture is anchored at `start` and spans `scale * end`, where `end` is the
//! unscaled display size. A negative scale flips the picture through `start`
//! on both axes.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, rect_corners, store_angle};
use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::path::build_path;
use crate::vector::signed_area;
use crate::widget::WidgetState;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        match data {
            [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::WebP),
            _ => None,
        }
    }
}

/// A raster picture placed on the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub(crate) id: ShapeId,
    /// Untransformed anchor.
    pub start: Point,
    /// Unscaled display size.
    pub end: Vec2,
    /// Uniform scale, negative when flipped.
    pub scale: f64,
    #[serde(default)]
    angle: f64,
    /// Legacy vertical flag (adds `-PI/2` to the rendered rotation).
    #[serde(default)]
    pub vertical: bool,
    /// Original image size in pixels.
    #[serde(default)]
    pub source_width: u32,
    #[serde(default)]
    pub source_height: u32,
    #[serde(default)]
    pub format: Option<ImageFormat>,
    /// Encoded image bytes as base64.
    #[serde(default)]
    pub data_base64: String,
    pub style: ShapeStyle,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Picture {
    /// Create an empty picture frame of the given display size.
    pub fn new(start: Point, width: f64, height: f64) -> Self {
        let mut picture = Self {
            id: Uuid::new_v4(),
            start,
            end: Vec2::new(width, height),
            scale: 1.0,
            angle: 0.0,
            vertical: false,
            source_width: width.max(0.0).round() as u32,
            source_height: height.max(0.0).round() as u32,
            format: None,
            data_base64: String::new(),
            style: ShapeStyle::default(),
            state: WidgetState::default(),
            path: None,
        };
        picture.rebuild_path(&GeometryConfig::default());
        picture
    }

    /// Create a picture from encoded image bytes, sized to the source pixels.
    pub fn from_data(start: Point, data: &[u8], source_width: u32, source_height: u32) -> Self {
        let mut picture = Self::new(start, source_width as f64, source_height as f64);
        picture.source_width = source_width;
        picture.source_height = source_height;
        picture.format = ImageFormat::from_magic_bytes(data);
        picture.data_base64 = STANDARD.encode(data);
        picture
    }

    /// Decode the stored image bytes.
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self.rebuild_path(&GeometryConfig::default());
        self
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Set `scale` so the picture fits within a viewport box, keeping the flip.
    ///
    /// Fails with [`GeometryError::DegenerateTransform`] when the picture or
    /// the box has no extent; the scale is left alone.
    pub fn fit_within(&mut self, max_width: f64, max_height: f64) -> GeometryResult<()> {
        if !(self.end.x > 0.0 && self.end.y > 0.0) {
            return Err(GeometryError::DegenerateTransform("picture has no extent to fit"));
        }
        if !(max_width > 0.0 && max_height > 0.0) {
            return Err(GeometryError::DegenerateTransform("fit box has no extent"));
        }
        let factor = (max_width / self.end.x).min(max_height / self.end.y);
        self.scale = factor.copysign(self.scale);
        self.rebuild_path(&GeometryConfig::default());
        Ok(())
    }

    /// `start + scale * end`, the far anchor in untransformed space.
    pub fn scaled_end(&self) -> Point {
        self.start + self.end * self.scale
    }

    /// Displayed size.
    pub fn size(&self) -> Vec2 {
        self.end * self.scale.abs()
    }

    /// Whether the start/end triangle winds the flipped way.
    pub fn is_mirrored(&self) -> bool {
        mirrored(self.start, self.end, self.scale)
    }

    /// Untransformed displayed box.
    pub fn frame(&self) -> Rect {
        Rect::from_points(self.start, self.scaled_end())
    }
}

/// Sign of the shoelace area of `start`, the scaled end and the unscaled x
/// extent. Non-negative means the picture is mirrored.
pub(crate) fn mirrored(start: Point, end: Vec2, scale: f64) -> bool {
    let far = start + end * scale;
    let across = start + Vec2::new(end.x, 0.0);
    signed_area(start, far, across) >= 0.0
}

impl ShapeTrait for Picture {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Picture
    }

    fn angle(&self) -> f64 {
        self.angle
    }

    fn set_angle(&mut self, angle: f64) {
        store_angle(&mut self.angle, angle);
    }

    fn is_vertical(&self) -> bool {
        self.vertical
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.start, self.scaled_end()]
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start, self.scaled_end())
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(self.frame())
    }

    fn rotation_centre(&self) -> Point {
        self.start + self.end * self.scale / 2.0
    }

    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        build_path(ShapeKind::Picture, &self.control_points(), config)
    }

    fn path(&self) -> Option<&BezPath> {
        self.path.as_ref()
    }

    fn rebuild_path(&mut self, config: &GeometryConfig) {
        self.path = self.build_path(config).ok();
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.path = self.path.take().map(|p| Affine::translate(delta) * p);
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn widget_state(&self) -> &WidgetState {
        &self.state
    }

    fn set_widget_state(&mut self, state: WidgetState) {
        self.state = state;
    }
}
