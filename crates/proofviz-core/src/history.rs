//! Undo stack of derived views over one root `Dag`.

use crate::dag::Dag;

/// A root graph plus the views derived from it, most recent last.
#[derive(Debug, Clone)]
pub struct DagHistory {
    root: Dag,
    views: Vec<Dag>,
}

impl DagHistory {
    pub fn new(root: Dag) -> Self {
        Self {
            root,
            views: Vec::new(),
        }
    }

    pub fn root(&self) -> &Dag {
        &self.root
    }

    pub fn current(&self) -> &Dag {
        self.views.last().unwrap_or(&self.root)
    }

    /// Number of derived views above the root.
    pub fn depth(&self) -> usize {
        self.views.len()
    }

    pub fn push(&mut self, view: Dag) {
        self.views.push(view);
    }

    /// Derive a view from the current one. On error the history is unchanged.
    pub fn apply<E>(&mut self, transform: impl FnOnce(&Dag) -> Result<Dag, E>) -> Result<&Dag, E> {
        let view = transform(self.current())?;
        self.views.push(view);
        Ok(self.current())
    }

    /// Step back one view. Returns `false` when already at the root.
    pub fn undo(&mut self) -> bool {
        self.views.pop().is_some()
    }

    pub fn reset(&mut self) {
        self.views.clear();
    }
}
