use std::collections::BTreeMap;

use super::Vfo;

/// Named VFOs plus the current selection.
///
/// The VFO manager of the embedding application owns this and decides which
/// receivers exist; the display only moves, resizes and selects them.
#[derive(Debug, Clone, Default)]
pub struct VfoSet {
    vfos: BTreeMap<String, Vfo>,
    selected: Option<String>,
}

impl VfoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a VFO.
    pub fn insert(&mut self, name: impl Into<String>, vfo: Vfo) {
        self.vfos.insert(name.into(), vfo);
    }

    /// Remove a VFO, dropping the selection if it pointed at it.
    pub fn remove(&mut self, name: &str) -> Option<Vfo> {
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        self.vfos.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Vfo> {
        self.vfos.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vfo> {
        self.vfos.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vfo)> {
        self.vfos.iter().map(|(name, vfo)| (name.as_str(), vfo))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vfo)> {
        self.vfos.iter_mut().map(|(name, vfo)| (name.as_str(), vfo))
    }

    pub fn len(&self) -> usize {
        self.vfos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vfos.is_empty()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Vfo> {
        self.selected.as_deref().and_then(|name| self.vfos.get(name))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Vfo> {
        let name = self.selected.as_deref()?;
        self.vfos.get_mut(name)
    }

    /// Select `name`. Unknown names are ignored. Returns whether the
    /// selection changed.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.vfos.contains_key(name) || self.selected.as_deref() == Some(name) {
            return false;
        }
        self.selected = Some(name.to_owned());
        true
    }

    /// Select the first VFO by name when the selection is empty or stale.
    pub fn select_first(&mut self) -> bool {
        if self.selected().is_some() {
            return false;
        }
        self.selected = self.vfos.keys().next().cloned();
        self.selected.is_some()
    }

    pub fn mark_all_dirty(&mut self) {
        for vfo in self.vfos.values_mut() {
            vfo.mark_dirty();
        }
    }

    /// Shift any VFO whose passband pokes out of `[-whole/2, whole/2]` back
    /// inside. A passband wider than the band is centered on it.
    pub fn keep_in_band(&mut self, whole_bandwidth: f64) {
        for vfo in self.vfos.values_mut() {
            keep_vfo_in_band(vfo, whole_bandwidth);
        }
    }
}

pub(crate) fn keep_vfo_in_band(vfo: &mut Vfo, whole_bandwidth: f64) {
    let half = whole_bandwidth / 2.0;
    let bw = vfo.bandwidth();
    if bw >= whole_bandwidth {
        if vfo.center_offset() != 0.0 {
            vfo.set_center_offset(0.0);
        }
    } else if vfo.lower_offset() < -half {
        vfo.set_center_offset(-half + bw / 2.0);
    } else if vfo.upper_offset() > half {
        vfo.set_center_offset(half - bw / 2.0);
    }
}
