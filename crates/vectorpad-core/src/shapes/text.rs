//! Text block shape and its layout collaborator.

use super::{ShapeId, ShapeKind, ShapeStyle, ShapeTrait, rect_corners, store_angle};
use crate::config::GeometryConfig;
use crate::error::GeometryResult;
use crate::path::build_path;
use crate::widget::WidgetState;
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measures text and maps local positions to character offsets.
///
/// Real glyph layout lives with the renderer; the core only needs the block
/// size and caret hit-testing.
pub trait TextLayout {
    /// Size of the laid-out block.
    fn measure(&self, text: &Text) -> Size;

    /// Character offset closest to `local`, relative to the block's top-left.
    fn hit_test(&self, text: &Text, local: Point) -> usize;
}

/// Monospace-ish estimate used when no renderer layout is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateLayout {
    /// Average glyph advance as a fraction of the font size.
    pub width_factor: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Smallest width reported, so empty text stays clickable.
    pub min_width: f64,
}

impl Default for ApproximateLayout {
    fn default() -> Self {
        Self {
            width_factor: 0.55,
            line_height: 1.2,
            min_width: 20.0,
        }
    }
}

impl ApproximateLayout {
    fn advance(&self, text: &Text) -> f64 {
        text.font_size() * self.width_factor
    }

    fn line_step(&self, text: &Text) -> f64 {
        text.font_size() * self.line_height
    }
}

impl TextLayout for ApproximateLayout {
    fn measure(&self, text: &Text) -> Size {
        let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size::new(
            (longest as f64 * self.advance(text)).max(self.min_width),
            lines as f64 * self.line_step(text),
        )
    }

    fn hit_test(&self, text: &Text, local: Point) -> usize {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return 0;
        }
        let step = self.line_step(text);
        let row = if step > 0.0 {
            (local.y / step).floor().clamp(0.0, (lines.len() - 1) as f64) as usize
        } else {
            0
        };
        let len = lines[row].chars().count();
        let advance = self.advance(text);
        let col = if advance > 0.0 {
            (local.x / advance).round().clamp(0.0, len as f64) as usize
        } else {
            0
        };
        // Each preceding line contributes its characters plus the newline.
        let before: usize = lines[..row].iter().map(|l| l.chars().count() + 1).sum();
        before + col
    }
}

/// Caret anchor and extent as character offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSelection {
    pub anchor: usize,
    pub extent: usize,
}

impl TextSelection {
    /// Empty selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            extent: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.extent
    }

    /// Ordered `(start, end)` offsets.
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.extent), self.anchor.max(self.extent))
    }
}

/// A block of text anchored at its untransformed top-left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub start: Point,
    /// Measured block size.
    pub end: Vec2,
    pub content: String,
    #[serde(default)]
    angle: f64,
    /// Legacy vertical flag (adds `-PI/2` to the rendered rotation).
    #[serde(default)]
    pub vertical: bool,
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selection: TextSelection,
    #[serde(skip)]
    state: WidgetState,
    #[serde(skip)]
    path: Option<BezPath>,
}

impl Text {
    /// Create a text block measured with [`ApproximateLayout`].
    pub fn new(start: Point, content: impl Into<String>) -> Self {
        let mut text = Self {
            id: Uuid::new_v4(),
            start,
            end: Vec2::ZERO,
            content: content.into(),
            angle: 0.0,
            vertical: false,
            style: ShapeStyle::default(),
            selection: TextSelection::default(),
            state: WidgetState::default(),
            path: None,
        };
        text.refresh_size(&ApproximateLayout::default());
        text.rebuild_path(&GeometryConfig::default());
        text
    }

    pub fn font_size(&self) -> f64 {
        self.style.font_size
    }

    /// Lines of content (an empty string still has one line).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Number of characters, the largest valid offset.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Re-measure `end` with `layout`.
    pub fn refresh_size(&mut self, layout: &dyn TextLayout) {
        let size = layout.measure(self);
        self.end = Vec2::new(size.width, size.height);
    }

    /// Map a screen point into the block's local frame (origin at `start`).
    pub fn to_local(&self, screen: Point) -> Point {
        let local = self.transform().inverse() * screen;
        (local - self.start).to_point()
    }

    /// Character offset under a screen point.
    pub fn offset_at(&self, layout: &dyn TextLayout, screen: Point) -> usize {
        layout.hit_test(self, self.to_local(screen)).min(self.char_count())
    }

    fn frame(&self) -> Rect {
        Rect::from_points(self.start, self.start + self.end)
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
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
        vec![self.start, self.start + self.end]
    }

    fn anchors(&self) -> (Point, Point) {
        (self.start, self.start + self.end)
    }

    fn local_corners(&self) -> [Point; 4] {
        rect_corners(self.frame())
    }

    fn rotation_centre(&self) -> Point {
        self.start + self.end / 2.0
    }

    fn build_path(&self, config: &GeometryConfig) -> GeometryResult<BezPath> {
        build_path(ShapeKind::Text, &self.control_points(), config)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_multiline() {
        let text = Text::new(Point::ZERO, "Hello\nWorld!");
        // 6 chars * 20 * 0.55 by 2 lines * 20 * 1.2
        assert!((text.end.x - 66.0).abs() < 1e-9);
        assert!((text.end.y - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_keeps_min_width() {
        let text = Text::new(Point::ZERO, "");
        assert!((text.end.x - 20.0).abs() < 1e-9);
        assert!((text.end.y - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_offsets() {
        let layout = ApproximateLayout::default();
        let text = Text::new(Point::new(100.0, 100.0), "abc\ndef");
        // One advance is 11 units, one line 24.
        assert_eq!(text.offset_at(&layout, Point::new(100.0, 105.0)), 0);
        assert_eq!(text.offset_at(&layout, Point::new(122.0, 105.0)), 2);
        assert_eq!(text.offset_at(&layout, Point::new(111.0, 130.0)), 5);
        assert_eq!(text.offset_at(&layout, Point::new(500.0, 500.0)), 7);
    }

    #[test]
    fn test_selection_range() {
        let sel = TextSelection { anchor: 5, extent: 2 };
        assert_eq!(sel.range(), (2, 5));
        assert!(!sel.is_collapsed());
        assert!(TextSelection::caret(3).is_collapsed());
    }

    #[test]
    fn test_centre_is_block_middle() {
        let text = Text::new(Point::new(10.0, 10.0), "ab");
        let centre = text.rotation_centre();
        assert!((centre.x - (10.0 + text.end.x / 2.0)).abs() < 1e-12);
        assert!((centre.y - 22.0).abs() < 1e-12);
    }
}
