//! Per-character text splitting
//!
//! [`SplitText`] replaces the text children of an element with one
//! `span.char` per visible character so each can be animated on its own.
//! Whitespace stays as plain text nodes between the spans.
//!
//! The split is a guard: [`SplitText::revert`] (or dropping the guard)
//! frees every character node and puts the original text back.
//!
//! Dropping waits briefly for the scene lock and never blocks on it. If
//! the scene stays locked (for instance when the guard is dropped on the
//! thread holding it), the character spans stay under the target until its
//! subtree is removed, and the detached original text is leaked.

use std::sync::{Arc, Mutex, TryLockError, Weak};
use std::time::{Duration, Instant};

use crate::scene::{Element, NodeId, Scene, SceneError, SharedScene};

/// Class given to every generated character span
pub const CHAR_CLASS: &str = "char";

/// How long a dropped guard waits for the scene lock before giving up
const DROP_LOCK_PATIENCE: Duration = Duration::from_millis(50);

pub struct SplitText {
    scene: Weak<Mutex<Scene>>,
    target: NodeId,
    /// Original children, detached while the split is active
    originals: Vec<NodeId>,
    /// Generated children (character spans and whitespace text)
    generated: Vec<NodeId>,
    chars: Vec<NodeId>,
    reverted: bool,
}

impl SplitText {
    /// Split the text of `target` into character spans
    ///
    /// `scene` must be the locked contents of `shared`; the guard keeps a
    /// weak handle so it can revert on drop.
    pub fn split(
        shared: &SharedScene,
        scene: &mut Scene,
        target: NodeId,
    ) -> Result<Self, SceneError> {
        if !scene.contains(target) {
            return Err(SceneError::NodeNotFound(target));
        }

        let text = scene.text_content(target);
        let originals = scene.children(target).to_vec();
        for &child in &originals {
            scene.detach(child);
        }

        let mut generated = Vec::new();
        let mut chars = Vec::new();
        let mut pending_space = String::new();

        for ch in text.chars() {
            if ch.is_whitespace() {
                pending_space.push(ch);
                continue;
            }
            if !pending_space.is_empty() {
                let space = scene.create_text(std::mem::take(&mut pending_space));
                scene.append_child(target, space)?;
                generated.push(space);
            }
            let span = scene.append(
                target,
                Element::new("span").class(CHAR_CLASS).text(ch.to_string()),
            )?;
            generated.push(span);
            chars.push(span);
        }
        if !pending_space.is_empty() {
            let space = scene.create_text(pending_space);
            scene.append_child(target, space)?;
            generated.push(space);
        }

        tracing::trace!("split {:?} into {} chars", target, chars.len());

        Ok(Self {
            scene: Arc::downgrade(shared),
            target,
            originals,
            generated,
            chars,
            reverted: false,
        })
    }

    /// Character span ids in reading order
    pub fn chars(&self) -> &[NodeId] {
        &self.chars
    }

    /// Restore the original text, freeing the character nodes
    ///
    /// Locks the scene; do not call while holding the scene lock.
    pub fn revert(mut self) {
        if let Some(shared) = self.scene.upgrade() {
            let mut scene = match shared.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            self.revert_in(&mut scene);
        }
    }

    /// Restore the original text using an already locked scene
    pub fn revert_with(mut self, scene: &mut Scene) {
        self.revert_in(scene);
    }

    fn revert_in(&mut self, scene: &mut Scene) {
        if self.reverted {
            return;
        }
        self.reverted = true;

        for id in self.generated.drain(..) {
            scene.remove(id);
        }
        self.chars.clear();

        let target_alive = scene.contains(self.target);
        for id in self.originals.drain(..) {
            if target_alive {
                // Originals are detached text nodes; re-linking cannot fail
                let _ = scene.append_child(self.target, id);
            } else {
                scene.remove(id);
            }
        }
    }
}

impl Drop for SplitText {
    fn drop(&mut self) {
        if self.reverted {
            return;
        }
        let Some(shared) = self.scene.upgrade() else {
            return;
        };

        // Never block: the scene may be locked by this very thread. Another
        // holder (the frame driver) releases it within a frame.
        let deadline = Instant::now() + DROP_LOCK_PATIENCE;
        loop {
            match shared.try_lock() {
                Ok(mut scene) => return self.revert_in(&mut scene),
                Err(TryLockError::Poisoned(poisoned)) => {
                    return self.revert_in(&mut poisoned.into_inner());
                }
                Err(TryLockError::WouldBlock) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_micros(200));
                }
                Err(TryLockError::WouldBlock) => break,
            }
        }
        tracing::warn!(
            "split text on {:?} dropped while scene was locked; character nodes kept",
            self.target
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> (SharedScene, NodeId) {
        let shared = Scene::new().into_shared();
        let title = {
            let mut scene = shared.lock().unwrap();
            let root = scene.root();
            scene
                .append(root, Element::new("h2").class("product-name").text(text))
                .unwrap()
        };
        (shared, title)
    }

    #[test]
    fn test_split_skips_whitespace() {
        let (shared, title) = heading("Model X");
        let mut scene = shared.lock().unwrap();
        let split = SplitText::split(&shared, &mut scene, title).unwrap();

        assert_eq!(split.chars().len(), 6);
        assert_eq!(scene.text_content(title), "Model X");
        assert_eq!(scene.query_class_all(title, CHAR_CLASS).len(), 6);

        split.revert_with(&mut scene);
    }

    #[test]
    fn test_revert_restores_original_node_count() {
        let (shared, title) = heading("Model X");
        let before = shared.lock().unwrap().len();

        let split = {
            let mut scene = shared.lock().unwrap();
            SplitText::split(&shared, &mut scene, title).unwrap()
        };
        assert!(shared.lock().unwrap().len() > before);

        split.revert();

        let scene = shared.lock().unwrap();
        assert_eq!(scene.len(), before);
        assert_eq!(scene.text_content(title), "Model X");
        assert!(scene.query_class_all(title, CHAR_CLASS).is_empty());
    }

    #[test]
    fn test_drop_reverts() {
        let (shared, title) = heading("GT");
        let before = shared.lock().unwrap().len();

        {
            let mut scene = shared.lock().unwrap();
            let split = SplitText::split(&shared, &mut scene, title).unwrap();
            drop(scene);
            drop(split);
        }

        assert_eq!(shared.lock().unwrap().len(), before);
    }

    #[test]
    fn test_drop_waits_for_a_briefly_held_lock() {
        let (shared, title) = heading("GT");
        let before = shared.lock().unwrap().len();

        let split = {
            let mut scene = shared.lock().unwrap();
            SplitText::split(&shared, &mut scene, title).unwrap()
        };

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let holder = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let _scene = shared.lock().unwrap();
                locked_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(5));
            })
        };
        locked_rx.recv().unwrap();
        drop(split);
        holder.join().unwrap();

        let scene = shared.lock().unwrap();
        assert_eq!(scene.len(), before);
        assert_eq!(scene.text_content(title), "GT");
    }

    #[test]
    fn test_revert_after_target_removed_frees_everything() {
        let (shared, title) = heading("GT");
        let baseline = {
            let scene = shared.lock().unwrap();
            // root only
            scene.len() - 2
        };

        let split = {
            let mut scene = shared.lock().unwrap();
            SplitText::split(&shared, &mut scene, title).unwrap()
        };
        shared.lock().unwrap().remove(title);
        split.revert();

        assert_eq!(shared.lock().unwrap().len(), baseline);
    }
}
