use super::{NodeIndex, Tree};

#[derive(Copy, Clone, Debug)]
pub(super) enum TreeEdit {
    Height {
        node: NodeIndex,
        previous: f64,
    },
    Attach {
        parent: NodeIndex,
        child: NodeIndex,
        slot: usize,
    },
    Detach {
        parent: NodeIndex,
        child: NodeIndex,
        slot: usize,
    },
    Root {
        previous: NodeIndex,
    },
}

impl Tree {
    /// Starts recording edits so that they can be undone by
    /// [`Tree::rollback`]. Any previously recorded edits are forgotten.
    pub fn checkpoint(&mut self) {
        self.journal.clear();
        self.recording = true;
    }

    #[must_use]
    pub fn is_checkpointed(&self) -> bool {
        self.recording
    }

    /// Keeps all edits made since the last [`Tree::checkpoint`].
    pub fn commit(&mut self) {
        self.journal.clear();
        self.recording = false;
    }

    /// Undoes all edits made since the last [`Tree::checkpoint`], in reverse
    /// order, restoring child slots, parents, heights and the root exactly.
    pub fn rollback(&mut self) {
        self.recording = false;

        while let Some(edit) = self.journal.pop() {
            match edit {
                TreeEdit::Height { node, previous } => {
                    self.nodes[node.get()].height = previous;
                },
                TreeEdit::Attach {
                    parent,
                    child,
                    slot,
                } => {
                    self.nodes[parent.get()].children[slot] = None;
                    self.nodes[child.get()].parent = None;
                },
                TreeEdit::Detach {
                    parent,
                    child,
                    slot,
                } => {
                    self.nodes[parent.get()].children[slot] = Some(child);
                    self.nodes[child.get()].parent = Some(parent);
                },
                TreeEdit::Root { previous } => {
                    self.root = previous;
                },
            }
        }

        self.generation += 1;
    }

    pub(super) fn record(&mut self, edit: TreeEdit) {
        self.generation += 1;

        if self.recording {
            self.journal.push(edit);
        }
    }
}
