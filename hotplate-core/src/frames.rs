//! Snapshot capture during integration.

use ndarray::{Array2, Array3, Axis};
use std::collections::BTreeSet;

/// One captured copy of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Zero-based step after which the copy was taken.
    pub step: usize,
    /// Physical time at capture, `(step + 1) * dt`.
    pub time: f64,
    pub field: Array2<f64>,
}

/// Collects deep copies of the field at requested step indices.
///
/// Frames are appended in the order steps are observed, which the integrator
/// guarantees is ascending, so request order never matters.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    shape: (usize, usize),
    requested: BTreeSet<usize>,
    frames: Vec<Frame>,
}

impl FrameRecorder {
    /// `shape` is the `(nx, ny)` of every field that will be observed.
    pub fn new<I>(shape: (usize, usize), steps: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            shape,
            requested: steps.into_iter().collect(),
            frames: Vec::new(),
        }
    }

    pub fn requested(&self) -> &BTreeSet<usize> {
        &self.requested
    }

    /// Number of requested steps that a run of `tsteps` steps will reach.
    pub fn expected_frames(&self, tsteps: usize) -> usize {
        self.requested.range(..tsteps).count()
    }

    pub fn observe(&mut self, step: usize, time: f64, field: &Array2<f64>) {
        if self.requested.contains(&step) {
            debug_assert_eq!(field.dim(), self.shape);
            log::trace!("recording frame at step {step}");
            self.frames.push(Frame {
                step,
                time,
                field: field.clone(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn finish(self) -> FrameStack {
        FrameStack {
            shape: self.shape,
            frames: self.frames,
        }
    }
}

/// Chronologically ordered frames handed to visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStack {
    shape: (usize, usize),
    frames: Vec<Frame>,
}

impl FrameStack {
    /// A stack with no frames for fields of `shape`.
    pub fn empty(shape: (usize, usize)) -> Self {
        Self {
            shape,
            frames: Vec::new(),
        }
    }

    /// `(nx, ny)` of each frame.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn steps(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.step).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Stacks the frames along a trailing axis into an `nx × ny × k` tensor.
    /// With no frames this is `nx × ny × 0`.
    pub fn to_tensor(&self) -> Array3<f64> {
        let (nx, ny) = self.shape;
        let mut tensor = Array3::zeros((nx, ny, self.frames.len()));
        for (k, frame) in self.frames.iter().enumerate() {
            tensor.index_axis_mut(Axis(2), k).assign(&frame.field);
        }
        tensor
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameStack {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
