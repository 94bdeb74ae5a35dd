//! Control-flow state: the frame stack and the result of executing a unit.
//!
//! Block structure is resolved ahead of time by the parser's block index,
//! so the tracker only records which blocks are currently *active*:
//!
//! - a [`LoopFrame`] from the moment a loop condition first holds until it
//!   fails at the closing `}` (or a `break` leaves the loop)
//! - a `Conditional` frame while the taken branch of an `if`/`else` chain
//!   runs, so its `}` can skip the rest of the chain

/// Where execution continues after a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// The following unit.
    Next,
    /// An explicit unit index (a skip or a loop back-edge).
    Jump(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
}

/// An active loop. Its condition and update are read from the header unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopFrame {
    /// Header unit; the back-edge target.
    pub reentry: usize,
    /// Closing `}` unit.
    pub end: usize,
    pub kind: LoopKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Loop(LoopFrame),
    /// The taken branch of an `if`/`else` chain.
    Conditional { header: usize, end: usize },
}

impl Frame {
    /// Closing `}` of the block this frame belongs to.
    pub fn end(&self) -> usize {
        match self {
            Frame::Loop(frame) => frame.end,
            Frame::Conditional { end, .. } => *end,
        }
    }
}

/// Stack of active frames, innermost last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlStack {
    frames: Vec<Frame>,
}

impl ControlStack {
    pub fn new() -> Self {
        ControlStack::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Whether the innermost frame is the loop headed at `header`, i.e. the
    /// header is being re-entered from its closing `}`.
    pub fn is_reentry(&self, header: usize) -> bool {
        matches!(self.top(), Some(Frame::Loop(frame)) if frame.reentry == header)
    }

    /// Depth and frame of the innermost active loop.
    pub fn innermost_loop(&self) -> Option<(usize, &LoopFrame)> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, frame)| match frame {
                Frame::Loop(lf) => Some((depth, lf)),
                Frame::Conditional { .. } => None,
            })
    }

    /// Drop every frame at `depth` and above.
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn loop_frame(reentry: usize, end: usize) -> Frame {
        Frame::Loop(LoopFrame {
            reentry,
            end,
            kind: LoopKind::While,
        })
    }

    #[test]
    fn reentry_checks_only_the_top_frame() {
        let mut stack = ControlStack::new();
        stack.push(loop_frame(0, 9));
        assert!(stack.is_reentry(0));

        stack.push(Frame::Conditional { header: 2, end: 4 });
        assert!(!stack.is_reentry(0));
    }

    #[test]
    fn innermost_loop_skips_conditionals() {
        let mut stack = ControlStack::new();
        stack.push(loop_frame(0, 20));
        stack.push(loop_frame(3, 10));
        stack.push(Frame::Conditional { header: 5, end: 8 });

        let (depth, frame) = stack.innermost_loop().unwrap();
        assert_eq!(depth, 1);
        assert_eq!(frame.reentry, 3);

        stack.truncate(depth);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().map(Frame::end), Some(20));
    }

    #[test]
    fn no_loop_in_empty_stack() {
        let stack = ControlStack::new();
        assert!(stack.innermost_loop().is_none());
        assert!(stack.is_empty());
    }
}
