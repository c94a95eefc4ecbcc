use serde::{Deserialize, Serialize};

use rtls_core::DeviceId;

use crate::error::RenderError;

/// Avatar icons shipped with the viewer, in registry order.
pub const DEFAULT_ICONS: [&str; 4] = [
    "/icons/avatars/m1.svg",
    "/icons/avatars/m2.svg",
    "/icons/avatars/w1.svg",
    "/icons/avatars/w2.svg",
];

/// Immutable, ordered list of marker icons, built once at start-up.
///
/// Loading the assets is up to the host; the registry only hands out stable
/// references so the same device always gets the same icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconRegistry {
    icons: Vec<String>,
}

impl IconRegistry {
    pub fn new(icons: Vec<String>) -> Result<Self, RenderError> {
        if icons.is_empty() {
            return Err(RenderError::EmptyIconRegistry);
        }
        Ok(Self { icons })
    }

    pub fn index_for(&self, id: DeviceId) -> usize {
        id as usize % self.icons.len()
    }

    pub fn icon_for(&self, id: DeviceId) -> &str {
        &self.icons[self.index_for(id)]
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self {
            icons: DEFAULT_ICONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(IconRegistry::new(Vec::new()), Err(RenderError::EmptyIconRegistry));
    }

    #[test]
    fn test_icon_is_id_mod_len() {
        let icons = IconRegistry::default();
        assert_eq!(icons.len(), 4);
        assert_eq!(icons.index_for(0), 0);
        assert_eq!(icons.index_for(5), 1);
        assert_eq!(icons.icon_for(7), "/icons/avatars/w2.svg");
        assert_eq!(icons.index_for(u32::MAX), u32::MAX as usize % 4);
    }
}
