//! Per-cell terrain.

/// Ground type of a cell. Decides whether a plant may grow there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Plantable ground.
    #[default]
    Soil,
    /// Rock, water or track: never hosts a plant. Drones fly over it.
    Barren,
}

impl Terrain {
    /// True if a plant may be created on this terrain.
    pub fn allows_plants(self) -> bool {
        matches!(self, Self::Soil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_soil_hosts_plants() {
        assert!(Terrain::Soil.allows_plants());
        assert!(!Terrain::Barren.allows_plants());
        assert_eq!(Terrain::default(), Terrain::Soil);
    }
}
