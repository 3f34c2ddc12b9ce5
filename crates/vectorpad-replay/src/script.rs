//! Gesture scripts: a JSON list of pointer steps replayed against a canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vectorpad_core::{Canvas, Document, GeometryConfig, GeometryError};

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Usage: vectorpad-replay <document.json> <script.json> [config.json]")]
    Usage,
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down { at: Point },
    Move { at: Point },
    Up,
    Cancel,
    Hover { at: Point },
    Rotate { from: Point, to: Point },
    Group { indices: Vec<usize> },
    Ungroup { index: usize },
}

/// A sequence of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// Outcome counters for a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub applied: usize,
    /// Steps that hit nothing or were refused by the shape.
    pub rejected: usize,
}

impl Script {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Run every step in order. Refused steps are logged and counted; the
    /// replay carries on with the next one.
    pub fn run(&self, canvas: &mut Canvas) -> Summary {
        let mut summary = Summary::default();
        for (n, step) in self.steps.iter().enumerate() {
            let ok = match step {
                Step::Down { at } => canvas.pointer_down(*at),
                Step::Move { at } => match canvas.pointer_move(*at) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("step {n}: {e}");
                        false
                    }
                },
                Step::Up => canvas.pointer_up().is_some(),
                Step::Cancel => canvas.cancel_gesture(),
                Step::Hover { at } => {
                    canvas.hover(*at);
                    true
                }
                Step::Rotate { from, to } => canvas.rotate_gesture(*from, *to),
                Step::Group { indices } => canvas.document.group(indices, &canvas.config).is_some(),
                Step::Ungroup { index } => canvas.document.ungroup(*index).is_some(),
            };
            if ok {
                summary.applied += 1;
            } else {
                log::debug!("step {n} ({step:?}) had no effect");
                summary.rejected += 1;
            }
        }
        summary
    }
}

pub fn read_file(path: &Path) -> ReplayResult<String> {
    fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the inputs named on the command line, replay, and return the final
/// document as JSON.
pub fn replay_files(args: &[String]) -> ReplayResult<String> {
    let (document, script, config) = match args {
        [document, script] => (document, script, None),
        [document, script, config] => (document, script, Some(config)),
        _ => return Err(ReplayError::Usage),
    };

    let config = match config {
        Some(path) => GeometryConfig::from_json(&read_file(Path::new(path))?)?,
        None => GeometryConfig::default(),
    };
    let document = Document::from_json(&read_file(Path::new(document))?, &config)?;
    let script = Script::from_json(&read_file(Path::new(script))?)?;
    log::info!("replaying {} steps over {} shapes", script.steps.len(), document.len());

    let mut canvas = Canvas::new(document, config);
    let summary = script.run(&mut canvas);
    log::info!("{} steps applied, {} rejected", summary.applied, summary.rejected);

    Ok(canvas.document.to_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use vectorpad_core::{Figure, Picture, Shape};

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn path_arg(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().into_owned()
    }

    #[test]
    fn test_step_format() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "down", "at": {"x": 1.0, "y": 2.0}},
                {"op": "rotate", "from": {"x": 0.0, "y": 0.0}, "to": {"x": 1.0, "y": 1.0}},
                {"op": "up"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0], Step::Down { at: Point::new(1.0, 2.0) });
        assert_eq!(script.steps[2], Step::Up);
    }

    #[test]
    fn test_run_counts_misses() {
        let mut document = Document::new();
        document.add_shape(Figure::rectangle(Point::new(0.0, 0.0), Point::new(50.0, 50.0)));
        let mut canvas = Canvas::new(document, GeometryConfig::default());
        let script = Script {
            steps: vec![
                Step::Down { at: Point::new(500.0, 500.0) },
                Step::Down { at: Point::new(25.0, 25.0) },
                Step::Move { at: Point::new(35.0, 25.0) },
                Step::Up,
            ],
        };
        let summary = script.run(&mut canvas);
        assert_eq!(summary, Summary { applied: 3, rejected: 1 });
        let corner = canvas.document.get(0).unwrap().screen_corners()[0];
        assert!((corner - Point::new(10.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_replay_files() {
        let config = GeometryConfig::default();
        let mut document = Document::new();
        document.add_shape(Picture::new(Point::new(100.0, 100.0), 200.0, 100.0));
        let document = write_temp(&document.to_json().unwrap());
        let script = write_temp(
            r#"{"steps": [
                {"op": "down", "at": {"x": 300.0, "y": 200.0}},
                {"op": "move", "at": {"x": 310.0, "y": 210.0}},
                {"op": "up"}
            ]}"#,
        );

        let out = replay_files(&[path_arg(&document), path_arg(&script)]).unwrap();
        let result = Document::from_json(&out, &config).unwrap();
        let Some(Shape::Picture(picture)) = result.get(0) else {
            panic!("expected a picture");
        };
        assert!((picture.scale - 1.06).abs() < 1e-9);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(replay_files(&[]), Err(ReplayError::Usage)));
        let missing = vec!["/nonexistent/doc.json".to_string(), "/nonexistent/s.json".to_string()];
        assert!(matches!(replay_files(&missing), Err(ReplayError::Io { .. })));

        let garbage = write_temp("not json");
        let err = replay_files(&[path_arg(&garbage), path_arg(&garbage)]).unwrap_err();
        assert!(matches!(err, ReplayError::Geometry(GeometryError::Json(_))));
    }
}
