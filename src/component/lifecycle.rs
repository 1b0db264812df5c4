//! Component lifecycle: `Constructed → Mounted ⇄ Unmounted`.
//!
//! The [`Lifecycle`] tracks the current phase and how many times the component
//! has been mounted, and accumulates [`LifecycleEvent`]s that can be drained by
//! whoever drives the component (tests, a host integration).

/// Where a component is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecyclePhase {
    #[default]
    Constructed,
    Mounted,
    Unmounted,
}

/// Events that occur during the component lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The component was inserted into a live document. `first` is set on the
    /// very first mount only.
    Mount { first: bool },
    /// The component was removed from the document.
    Unmount,
    /// The component rendered.
    Update,
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: LifecyclePhase,
    mounts: usize,
    pending: Vec<LifecycleEvent>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mount.
    ///
    /// Returns `None` if already mounted (no duplicate event), otherwise whether
    /// this is the first mount.
    pub fn on_mount(&mut self) -> Option<bool> {
        if self.phase == LifecyclePhase::Mounted {
            return None;
        }
        let first = self.mounts == 0;
        self.phase = LifecyclePhase::Mounted;
        self.mounts += 1;
        self.pending.push(LifecycleEvent::Mount { first });
        Some(first)
    }

    /// Record an unmount. Returns `false` if the component was not mounted.
    pub fn on_unmount(&mut self) -> bool {
        if self.phase != LifecyclePhase::Mounted {
            return false;
        }
        self.phase = LifecyclePhase::Unmounted;
        self.pending.push(LifecycleEvent::Unmount);
        true
    }

    /// Record a render. Only mounted renders are recorded, and consecutive
    /// renders collapse into one `Update`.
    pub fn on_update(&mut self) {
        if self.phase != LifecyclePhase::Mounted {
            return;
        }
        if self.pending.last() != Some(&LifecycleEvent::Update) {
            self.pending.push(LifecycleEvent::Update);
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.phase == LifecyclePhase::Mounted
    }

    /// Whether the component has ever been mounted.
    pub fn has_mounted(&self) -> bool {
        self.mounts > 0
    }

    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    /// Drain and return all pending lifecycle events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
