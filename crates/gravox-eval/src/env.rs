//! Arena of lexical scope frames.
//!
//! Frames live in one vector and refer to their parent by index, so a
//! closure only has to remember the [`FrameId`] it was defined in. A frame
//! is released when the construct that pushed it exits and is reclaimed as
//! soon as no child frame and no living function depends on it. Frames kept
//! alive only by functions stored in unreachable frames are found by
//! [`Environment::collect`]. Reclaimed slots are reused by later pushes.

use crate::error::{EvalError, EvalResult};
use crate::value::{Function, UserFunction, Value};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

/// Arena size that triggers the first automatic collection.
const COLLECT_THRESHOLD: usize = 256;

/// Index of a frame in the [`Environment`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

#[derive(Debug, Default)]
struct Frame {
    bindings: BTreeMap<String, Value>,
    parent: Option<FrameId>,
    live: bool,
    /// Occupied frames whose parent is this one.
    children: usize,
    /// Functions that close over this frame.
    closures: Vec<Weak<UserFunction>>,
    /// Slot is free for reuse.
    vacant: bool,
}

impl Frame {
    fn new(parent: Option<FrameId>) -> Self {
        Self {
            parent,
            live: true,
            ..Self::default()
        }
    }

    fn has_living_closures(&mut self) -> bool {
        self.closures.retain(|weak| weak.strong_count() > 0);
        !self.closures.is_empty()
    }
}

/// The scope arena. Frame 0 is the program's root frame.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
    free: Vec<usize>,
    occupied: usize,
    next_collect: usize,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(None)],
            free: Vec::new(),
            occupied: 1,
            next_collect: COLLECT_THRESHOLD,
        }
    }

    pub fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Push a child frame of `parent`, reusing a free slot when one exists.
    pub fn push(&mut self, parent: FrameId) -> FrameId {
        self.frames[parent.0].children += 1;
        self.occupied += 1;
        let frame = Frame::new(Some(parent));
        match self.free.pop() {
            Some(index) => {
                self.frames[index] = frame;
                FrameId(index)
            }
            None => {
                self.frames.push(frame);
                FrameId(self.frames.len() - 1)
            }
        }
    }

    /// Mark `id` as finished and reclaim it, and any finished ancestors it
    /// was holding, once nothing depends on them.
    ///
    /// A frame still referenced by a living function stays until that
    /// function is dropped or the frame turns out to be unreachable.
    pub fn release(&mut self, id: FrameId) {
        if id.0 == 0 {
            return;
        }
        self.frames[id.0].live = false;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let frame = &mut self.frames[current.0];
            if current.0 == 0 || frame.live || frame.children > 0 || frame.has_living_closures() {
                break;
            }
            cursor = frame.parent;
            self.vacate(current.0);
        }
        if self.occupied >= self.next_collect {
            self.collect();
        }
    }

    /// Record that `func` closes over frame `id`, keeping the frame alive
    /// for as long as the function is reachable.
    pub fn capture(&mut self, id: FrameId, func: &Rc<UserFunction>) {
        let frame = &mut self.frames[id.0];
        frame.closures.retain(|weak| weak.strong_count() > 0);
        frame.closures.push(Rc::downgrade(func));
    }

    /// Reclaim every frame that neither a live construct nor a reachable
    /// function can reach.
    ///
    /// Functions referenced from outside the arena (the caller's stack, the
    /// module cache) count as reachable, as do live frames and their
    /// ancestors. References held only inside unreachable frames do not.
    pub fn collect(&mut self) {
        let mut held: HashMap<*const UserFunction, usize> = HashMap::new();
        for frame in self.frames.iter().filter(|f| !f.vacant) {
            for value in frame.bindings.values() {
                visit_closures(value, &mut |func: &Rc<UserFunction>| {
                    *held.entry(Rc::as_ptr(func)).or_default() += 1;
                });
            }
        }

        let mut pending = Vec::new();
        for (index, frame) in self.frames.iter_mut().enumerate() {
            if frame.vacant {
                continue;
            }
            frame.closures.retain(|weak| weak.strong_count() > 0);
            let escaped = frame.closures.iter().any(|weak| {
                weak.strong_count() > held.get(&weak.as_ptr()).copied().unwrap_or(0)
            });
            if index == 0 || frame.live || escaped {
                pending.push(index);
            }
        }

        let mut marked = vec![false; self.frames.len()];
        while let Some(index) = pending.pop() {
            if std::mem::replace(&mut marked[index], true) {
                continue;
            }
            let frame = &self.frames[index];
            if let Some(parent) = frame.parent {
                pending.push(parent.0);
            }
            for value in frame.bindings.values() {
                visit_closures(value, &mut |func: &Rc<UserFunction>| {
                    pending.push(func.closure.0)
                });
            }
        }

        for index in 0..self.frames.len() {
            if !marked[index] && !self.frames[index].vacant {
                self.frames[index] = Frame {
                    vacant: true,
                    ..Frame::default()
                };
                self.free.push(index);
                self.occupied -= 1;
            }
        }
        for frame in &mut self.frames {
            frame.children = 0;
        }
        for index in 0..self.frames.len() {
            if let Some(parent) = self.frames[index].parent {
                self.frames[parent.0].children += 1;
            }
        }
        self.next_collect = COLLECT_THRESHOLD.max(self.occupied * 2);
    }

    fn vacate(&mut self, index: usize) {
        let frame = std::mem::replace(
            &mut self.frames[index],
            Frame {
                vacant: true,
                ..Frame::default()
            },
        );
        if let Some(parent) = frame.parent {
            self.frames[parent.0].children -= 1;
        }
        self.free.push(index);
        self.occupied -= 1;
    }

    /// Insert or overwrite `name` in frame `id`.
    pub fn define(&mut self, id: FrameId, name: &str, value: Value) {
        self.frames[id.0].bindings.insert(name.to_string(), value);
    }

    /// Nearest binding of `name`, starting at `id` and walking parents.
    pub fn lookup(&self, id: FrameId, name: &str) -> Option<&Value> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let frame = &self.frames[current.0];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            cursor = frame.parent;
        }
        None
    }

    pub fn get(&self, id: FrameId, name: &str) -> EvalResult<Value> {
        self.lookup(id, name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, id: FrameId, name: &str, value: Value) -> EvalResult<()> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let frame = &mut self.frames[current.0];
            if let Some(slot) = frame.bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            cursor = frame.parent;
        }
        Err(EvalError::UndefinedVariable(name.to_string()))
    }

    /// The bindings owned by frame `id` itself, without its parents.
    pub fn bindings(&self, id: FrameId) -> &BTreeMap<String, Value> {
        &self.frames[id.0].bindings
    }

    /// Number of frames currently held by the arena.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Call `visit` for every user function in `value`, including inside arrays.
fn visit_closures(value: &Value, visit: &mut impl FnMut(&Rc<UserFunction>)) {
    match value {
        Value::Function(Function::User(func)) => visit(func),
        Value::Array(items) => {
            for item in items {
                visit_closures(item, visit);
            }
        }
        _ => {}
    }
}
