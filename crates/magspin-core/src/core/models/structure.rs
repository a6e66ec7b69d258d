use super::ids::SiteId;
use super::site::MagneticSite;
use slotmap::SlotMap;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StructureError {
    #[error("A site labelled '{0}' already exists in the structure")]
    DuplicateLabel(String),
}

/// A named collection of crystallographic sites.
///
/// Sites are owned by the structure and addressed through stable [`SiteId`] keys.
/// Labels are unique within one structure; iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MagneticStructure {
    /// Descriptive name of the structure.
    name: String,
    /// Primary storage for sites.
    sites: SlotMap<SiteId, MagneticSite>,
    /// Insertion order of the live sites.
    order: Vec<SiteId>,
    /// Lookup map from site label to its key.
    label_map: HashMap<String, SiteId>,
}

impl MagneticStructure {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a site to the structure.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateLabel`] if a site with the same label exists.
    pub fn add_site(&mut self, site: MagneticSite) -> Result<SiteId, StructureError> {
        if self.label_map.contains_key(&site.label) {
            return Err(StructureError::DuplicateLabel(site.label));
        }
        let label = site.label.clone();
        let id = self.sites.insert(site);
        self.order.push(id);
        self.label_map.insert(label, id);
        Ok(id)
    }

    pub fn remove_site(&mut self, id: SiteId) -> Option<MagneticSite> {
        let site = self.sites.remove(id)?;
        self.order.retain(|&other| other != id);
        self.label_map.remove(&site.label);
        Some(site)
    }

    pub fn site(&self, id: SiteId) -> Option<&MagneticSite> {
        self.sites.get(id)
    }

    /// Mutable access to a site. The label must not be changed through this reference.
    pub fn site_mut(&mut self, id: SiteId) -> Option<&mut MagneticSite> {
        self.sites.get_mut(id)
    }

    pub fn find_site_by_label(&self, label: &str) -> Option<SiteId> {
        self.label_map.get(label).copied()
    }

    pub fn sites_iter(&self) -> impl Iterator<Item = (SiteId, &MagneticSite)> {
        self.order.iter().map(move |&id| (id, &self.sites[id]))
    }

    pub fn magnetic_sites_iter(&self) -> impl Iterator<Item = (SiteId, &MagneticSite)> {
        self.sites_iter().filter(|(_, site)| site.is_magnetic())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
