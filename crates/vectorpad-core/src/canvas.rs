//! Canvas document and gesture state management.

use crate::behaviour::{self, AlterEnv};
use crate::config::GeometryConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::hit::contains;
use crate::path::check_point_count;
use crate::selection::{InteractionContext, apply_rotation};
use crate::shapes::{ApproximateLayout, Group, Shape, ShapeId, ShapeKind, ShapeTrait, TextLayout};
use crate::widget::WidgetState;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document: the ordered list of top-level shapes, back to front.
///
/// Every shape is owned by exactly one list: this one or a group's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    shapes: Vec<Shape>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            shapes: Vec::new(),
        }
    }

    /// Append a shape on top and return its index.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> usize {
        self.shapes.push(shape.into());
        self.shapes.len() - 1
    }

    pub fn remove_shape(&mut self, index: usize) -> GeometryResult<Shape> {
        if index >= self.shapes.len() {
            return Err(GeometryError::NoSuchShape(index));
        }
        Ok(self.shapes.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Index of a top-level shape by ID.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Find a shape by ID, looking inside groups too.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find_map(|s| {
            if s.id() == id {
                Some(s)
            } else {
                s.as_group().and_then(|g| g.find(id))
            }
        })
    }

    /// Shapes back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Topmost shape containing `point`.
    pub fn shape_at(&self, point: Point, config: &GeometryConfig) -> Option<usize> {
        self.shapes.iter().rposition(|s| contains(s, point, config))
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Rebuild every cached path, innermost group members first.
    pub fn rebuild_paths(&mut self, config: &GeometryConfig) {
        for shape in &mut self.shapes {
            rebuild(shape, config);
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> GeometryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document and rebuild its derived geometry.
    ///
    /// Figures with the wrong number of control points are rejected.
    pub fn from_json(json: &str, config: &GeometryConfig) -> GeometryResult<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        for shape in &document.shapes {
            validate(shape)?;
        }
        document.rebuild_paths(config);
        log::info!("loaded document {} with {} shapes", document.id, document.len());
        Ok(document)
    }

    /// Group the shapes at `indices` into one group placed at the frontmost
    /// member's position. Needs at least two valid indices.
    pub fn group(&mut self, indices: &[usize], config: &GeometryConfig) -> Option<ShapeId> {
        let mut picked: Vec<usize> = indices.iter().copied().filter(|&i| i < self.shapes.len()).collect();
        picked.sort_unstable();
        picked.dedup();
        if picked.len() < 2 {
            return None;
        }
        let front = picked[picked.len() - 1];
        let insert_at = front + 1 - picked.len();

        // Remove back to front so earlier indices stay valid.
        let mut children: Vec<Shape> = picked.iter().rev().map(|&i| self.shapes.remove(i)).collect();
        children.reverse();

        let mut group = Group::new(children);
        group.refresh_bounds(config);
        let id = group.id;
        self.shapes.insert(insert_at, Shape::Group(group));
        log::debug!("grouped {} shapes into {id}", picked.len());
        Some(id)
    }

    /// Replace the group at `index` with its children, in place.
    pub fn ungroup(&mut self, index: usize) -> Option<Vec<ShapeId>> {
        if !matches!(self.shapes.get(index), Some(Shape::Group(_))) {
            return None;
        }
        let Shape::Group(group) = self.shapes.remove(index) else {
            return None;
        };
        let children = group.ungroup();
        let ids: Vec<ShapeId> = children.iter().map(Shape::id).collect();
        for (offset, child) in children.into_iter().enumerate() {
            self.shapes.insert(index + offset, child);
        }
        log::debug!("ungrouped {} shapes", ids.len());
        Some(ids)
    }
}

fn rebuild(shape: &mut Shape, config: &GeometryConfig) {
    match shape {
        Shape::Group(group) => {
            for child in group.children_mut() {
                rebuild(child, config);
            }
            group.refresh_bounds(config);
        }
        other => other.rebuild_path(config),
    }
}

fn validate(shape: &Shape) -> GeometryResult<()> {
    match shape {
        Shape::Figure(figure) => check_point_count(figure.kind.shape_kind(), &figure.control_points()),
        Shape::Group(group) => group.children().iter().try_for_each(validate),
        _ => Ok(()),
    }
}

/// Runtime canvas state (not persisted): the document, settings, the text
/// layout collaborator and the single active gesture.
pub struct Canvas {
    /// The document being edited.
    pub document: Document,
    pub config: GeometryConfig,
    layout: Box<dyn TextLayout>,
    gesture: Option<InteractionContext>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Document::new(), GeometryConfig::default())
    }
}

impl Canvas {
    /// Paths are rebuilt with `config` so shapes made with default settings
    /// pick up its corner radius and fit tolerance.
    pub fn new(mut document: Document, config: GeometryConfig) -> Self {
        document.rebuild_paths(&config);
        Self {
            document,
            config,
            layout: Box::new(ApproximateLayout::default()),
            gesture: None,
        }
    }

    /// Replace the text layout collaborator.
    pub fn with_layout(mut self, layout: impl TextLayout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    /// Add a shape on top, built with this canvas's settings.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> usize {
        let mut shape = shape.into();
        rebuild(&mut shape, &self.config);
        self.document.add_shape(shape)
    }

    /// The active gesture, if any.
    pub fn gesture(&self) -> Option<&InteractionContext> {
        self.gesture.as_ref()
    }

    /// Index of the selected shape, if any.
    pub fn selected(&self) -> Option<usize> {
        self.document
            .shapes
            .iter()
            .position(|s| s.widget_state().is_selected())
    }

    /// Begin a gesture on the topmost shape whose handle or body is under
    /// `point`. Returns `false` and clears the selection on a miss.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.gesture.is_some() {
            self.pointer_up();
        }
        for shape in &mut self.document.shapes {
            shape.set_widget_state(WidgetState::Normal);
        }

        let reach = self.config.hotzone_half();
        let env = AlterEnv::new(&self.config, self.layout.as_ref());
        for index in (0..self.document.shapes.len()).rev() {
            let shape = &mut self.document.shapes[index];
            if !shape.bounds().inflate(reach, reach).contains(point) {
                continue;
            }
            let mut ctx = InteractionContext::new(index, point, shape.clone());
            if behaviour::select_handle(shape, &mut ctx, point, &env) {
                log::debug!("gesture begins on shape {index} with {:?}", ctx.handle);
                self.gesture = Some(ctx);
                return true;
            }
        }
        log::debug!("pointer down at {point:?} hit nothing");
        false
    }

    /// Feed the pointer's new position into the active gesture, or update
    /// hover state when there is none.
    pub fn pointer_move(&mut self, point: Point) -> GeometryResult<()> {
        let Some(ctx) = self.gesture.as_mut() else {
            self.hover(point);
            return Ok(());
        };
        let delta = ctx.advance(point);
        let env = AlterEnv::new(&self.config, self.layout.as_ref());
        let shape = self
            .document
            .shapes
            .get_mut(ctx.index)
            .ok_or(GeometryError::NoSuchShape(ctx.index))?;
        behaviour::alter(shape, ctx, delta, &env)
    }

    /// Commit the active gesture. Returns the shape it edited.
    pub fn pointer_up(&mut self) -> Option<ShapeId> {
        let ctx = self.gesture.take()?;
        log::debug!("gesture on {} committed after {:?}", ctx.shape_id, ctx.delta());
        Some(ctx.shape_id)
    }

    /// Abort the active gesture, restoring the shape as it was at pointer-down.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(ctx) = self.gesture.take() else {
            return false;
        };
        match self.document.shapes.get_mut(ctx.index) {
            Some(shape) if shape.id() == ctx.shape_id => {
                let state = shape.widget_state().clone();
                *shape = ctx.original_shape;
                shape.set_widget_state(state);
                log::debug!("gesture on {} cancelled", ctx.shape_id);
                true
            }
            _ => {
                log::warn!("gesture shape {} is gone, nothing to restore", ctx.shape_id);
                false
            }
        }
    }

    /// Rotate the gesture's shape (or the selected one) by the angle swept
    /// from `prev` to `curr`.
    ///
    /// Lines take their re-aim vectors as pointer offsets from the line's
    /// midpoint, so the turn does not depend on where the line sits.
    pub fn rotate_gesture(&mut self, prev: Point, curr: Point) -> bool {
        let index = match self.gesture.as_ref() {
            Some(ctx) => Some(ctx.index),
            None => self.selected(),
        };
        match index.and_then(|i| self.document.shapes.get_mut(i)) {
            Some(shape) if shape.kind() == ShapeKind::Line => {
                let pivot = shape.rotation_centre().to_vec2();
                apply_rotation(shape, prev - pivot, curr - pivot)
            }
            Some(shape) => apply_rotation(shape, prev, curr),
            None => false,
        }
    }

    /// Mark the topmost shape under `point` as hovered.
    pub fn hover(&mut self, point: Point) {
        let hit = self.document.shape_at(point, &self.config);
        for (index, shape) in self.document.shapes.iter_mut().enumerate() {
            if shape.widget_state().is_selected() {
                continue;
            }
            let state = if Some(index) == hit {
                WidgetState::Hovered
            } else {
                WidgetState::Normal
            };
            shape.set_widget_state(state);
        }
    }
}
