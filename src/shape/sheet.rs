use crate::shape::{Crease, Panel};

/// The whole piece of paper: every panel plus every crease accumulated by
/// past folds.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub(crate) panels: Vec<Panel>,
    pub(crate) creases: Vec<Crease>,
}

impl Sheet {
    /// An empty sheet.
    pub fn new() -> Self {
        Sheet::default()
    }

    /// All panels, in insertion order. Indices into this slice are stable
    /// across a fold; splitting only appends.
    #[inline]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// All creases.
    #[inline]
    pub fn creases(&self) -> &[Crease] {
        &self.creases
    }

    /// Appends a panel and returns its index.
    pub fn push_panel(&mut self, panel: Panel) -> usize {
        self.panels.push(panel);
        self.panels.len() - 1
    }

    /// Appends a crease and returns its index.
    pub fn push_crease(&mut self, crease: Crease) -> usize {
        self.creases.push(crease);
        self.creases.len() - 1
    }

    /// Moves every anchored crease corner onto the panel vertex it tracks.
    pub(crate) fn sync_crease_anchors(&mut self) {
        for crease in &mut self.creases {
            crease.sync_anchors(&self.panels);
        }
    }
}
