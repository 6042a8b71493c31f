//! Program-counter stack.
//!
//! Each frame records one secrecy contribution to the current control
//! context: an open conditional or loop, or a pending asynchronous reply
//! between an `await` and its matching `get`. The current PC level is
//! the join of all frame levels.
//!
//! Discipline is LIFO except for await frames, which a `get` on the same
//! future releases out of order. Scoped frames therefore release by
//! token rather than by position, so an intervening `get` never makes a
//! branch pop the wrong frame.

use lasso::Spur;
use serde::{Deserialize, Serialize};

use crate::lattice::Label;

/// What pushed a PC frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameOrigin {
    /// A conditional branch
    Branch,
    /// A loop body
    Loop,
    /// A pending reply for the named future variable
    Future(Spur),
}

/// One contribution to the PC level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcFrame {
    pub origin: FrameOrigin,
    pub level: Label,
    token: u32,
}

/// Handle to a pushed frame, used to release it when its region closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u32);

/// The PC frame stack for one method body.
#[derive(Debug, Clone, Default)]
pub struct PcStack {
    frames: Vec<PcFrame>,
    next_token: u32,
}

impl PcStack {
    /// Empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame, returning the token that releases it.
    pub fn push(&mut self, origin: FrameOrigin, level: Label) -> FrameToken {
        let token = self.next_token;
        self.next_token += 1;
        self.frames.push(PcFrame {
            origin,
            level,
            token,
        });
        FrameToken(token)
    }

    /// Release the frame a scoped push created. A no-op when a `get`
    /// already removed it.
    pub fn release(&mut self, token: FrameToken) {
        if let Some(idx) = self
            .frames
            .iter()
            .rposition(|f| f.token == token.0)
        {
            self.frames.remove(idx);
        }
    }

    /// Remove every await frame for the named future. Returns how many
    /// frames were dropped.
    pub fn release_future(&mut self, future: Spur) -> usize {
        let before = self.frames.len();
        self.frames
            .retain(|f| f.origin != FrameOrigin::Future(future));
        before - self.frames.len()
    }

    /// Levels of all frames, bottom of stack first.
    pub fn levels(&self) -> impl Iterator<Item = Label> + '_ {
        self.frames.iter().map(|f| f.level)
    }

    /// All frames, bottom of stack first.
    pub fn frames(&self) -> &[PcFrame] {
        &self.frames
    }

    /// Discard everything; used at method entry so unmatched await
    /// frames never outlive their method.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Number of open frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is open
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
