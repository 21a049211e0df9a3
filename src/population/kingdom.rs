//! Authored kingdom definitions
//!
//! A kingdom is a total population count and an ordered list of regions.
//! Each region carries its share of the kingdom, a census, and tables of
//! municipality counts and sizes. Definitions are read once from TOML (or
//! JSON) and never mutated by the engine.

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{PopulationError, Result};
use crate::denizen::traits::{Age, Gender, GroupIndex, Job, Race};
use crate::population::census::CensusHierarchy;

fn default_total_population() -> usize {
    4_194_304
}

/// Whole-kingdom definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KingdomDefinition {
    /// Persistent population of the world, distributed among all regions
    #[serde(default = "default_total_population")]
    pub total_population: usize,
    pub regions: Vec<RegionDefinition>,
}

/// One region of the kingdom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub name: String,
    /// Fraction of the kingdom population living here
    pub population_share: f64,
    pub census: Census,
    #[serde(default)]
    pub municipal_counts: MunicipalCounts,
    #[serde(default)]
    pub municipal_populations: MunicipalPopulations,
}

/// Per-dimension demographic weights of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub genders: Vec<f64>,
    pub ages: Vec<f64>,
    pub races: Vec<f64>,
    pub jobs: Vec<f64>,
}

/// How many municipalities of each kind a region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MunicipalCounts {
    pub metros: u8,
    pub capitals: u8,
    pub cities: u8,
    pub towns: u8,
    pub villages: u8,
    pub farms: u8,
    pub manors: u8,
    pub houses: u8,
}

impl Default for MunicipalCounts {
    fn default() -> Self {
        Self {
            metros: 1,
            capitals: 3,
            cities: 10,
            towns: 25,
            villages: 30,
            farms: 50,
            manors: 10,
            houses: 40,
        }
    }
}

/// Residents of a single municipality of each kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MunicipalPopulations {
    pub metropolis: u16,
    pub capital: u16,
    pub city: u16,
    pub town: u16,
    pub village: u8,
    pub farm: u8,
    pub manor: u8,
    pub house: u8,
}

impl Default for MunicipalPopulations {
    fn default() -> Self {
        Self {
            metropolis: 15_000,
            capital: 10_000,
            city: 5_000,
            town: 1_000,
            village: 130,
            farm: 50,
            manor: 100,
            house: 5,
        }
    }
}

impl Census {
    /// Levels in slicing order: gender, age, race, job
    pub fn as_hierarchy(&self) -> CensusHierarchy {
        CensusHierarchy::new(vec![
            self.genders.clone(),
            self.ages.clone(),
            self.races.clone(),
            self.jobs.clone(),
        ])
    }

    fn dimensions(&self) -> [(&'static str, &[f64], usize); 4] {
        [
            (Gender::DIMENSION, self.genders.as_slice(), Gender::count()),
            (Age::DIMENSION, self.ages.as_slice(), Age::count()),
            (Race::DIMENSION, self.races.as_slice(), Race::count()),
            (Job::DIMENSION, self.jobs.as_slice(), Job::count()),
        ]
    }
}

impl RegionDefinition {
    /// Residents the region's municipalities can hold
    pub fn municipal_capacity(&self) -> u64 {
        let counts = &self.municipal_counts;
        let sizes = &self.municipal_populations;
        [
            (counts.metros, u64::from(sizes.metropolis)),
            (counts.capitals, u64::from(sizes.capital)),
            (counts.cities, u64::from(sizes.city)),
            (counts.towns, u64::from(sizes.town)),
            (counts.villages, u64::from(sizes.village)),
            (counts.farms, u64::from(sizes.farm)),
            (counts.manors, u64::from(sizes.manor)),
            (counts.houses, u64::from(sizes.house)),
        ]
        .iter()
        .map(|&(count, size)| u64::from(count) * size)
        .sum()
    }
}

impl KingdomDefinition {
    /// Parse and validate a TOML definition
    pub fn from_toml(content: &str) -> Result<Self> {
        let kingdom: Self = toml::from_str(content)?;
        kingdom.validate()?;
        Ok(kingdom)
    }

    /// Parse and validate a JSON definition
    pub fn from_json(content: &str) -> Result<Self> {
        let kingdom: Self = serde_json::from_str(content)?;
        kingdom.validate()?;
        Ok(kingdom)
    }

    /// Load a definition from disk, choosing the format by extension
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let kingdom = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        tracing::info!(
            "Loaded kingdom from {}: {} denizens in {} regions",
            path.display(),
            kingdom.total_population,
            kingdom.regions.len()
        );
        Ok(kingdom)
    }

    /// Reject definitions the slicer cannot lay out faithfully
    ///
    /// Every share array must match its dimension's size and sum to 1.0
    /// within the configured tolerance. Region indices must fit a `u8`.
    pub fn validate(&self) -> Result<()> {
        let tolerance = config().share_tolerance;

        if self.total_population == 0 {
            return Err(invalid("total population is zero"));
        }
        if self.regions.is_empty() {
            return Err(invalid("no regions defined"));
        }
        if self.regions.len() > usize::from(u8::MAX) + 1 {
            return Err(invalid(format!(
                "{} regions exceed the 256 addressable by a world coordinate",
                self.regions.len()
            )));
        }

        for region in &self.regions {
            if !region.population_share.is_finite() || region.population_share < 0.0 {
                return Err(invalid(format!(
                    "{} has an invalid share {}",
                    region.name, region.population_share
                )));
            }
        }
        let region_total: f64 = self.regions.iter().map(|r| r.population_share).sum();
        check_total("region shares", region_total, tolerance)?;

        for region in &self.regions {
            for (dimension, weights, expected) in region.census.dimensions() {
                if weights.len() != expected {
                    return Err(invalid(format!(
                        "{} census has {} {} weights, expected {}",
                        region.name,
                        weights.len(),
                        dimension,
                        expected
                    )));
                }
                if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
                    return Err(invalid(format!(
                        "{} census has an invalid {} weight",
                        region.name, dimension
                    )));
                }
                let total: f64 = weights.iter().sum();
                check_total(&format!("{} {} weights", region.name, dimension), total, tolerance)?;
            }
        }

        Ok(())
    }

    /// Region shares in region order
    pub fn region_shares(&self) -> Vec<f64> {
        self.regions.iter().map(|r| r.population_share).collect()
    }
}

fn invalid(reason: impl Into<String>) -> PopulationError {
    PopulationError::InvalidKingdom(reason.into())
}

fn check_total(what: &str, total: f64, tolerance: f64) -> Result<()> {
    if (total - 1.0).abs() > tolerance {
        return Err(invalid(format!("{} sum to {:.4}, expected 1.0", what, total)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINGDOM: &str = include_str!("../../data/kingdoms/two_regions.toml");

    #[test]
    fn test_fixture_parses() {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).expect("fixture should load");
        assert_eq!(kingdom.total_population, 10_000);
        assert_eq!(kingdom.regions.len(), 2);
        assert_eq!(kingdom.regions[0].census.jobs.len(), Job::count());
    }

    #[test]
    fn test_municipal_defaults() {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        let region = &kingdom.regions[1];
        assert_eq!(region.municipal_counts, MunicipalCounts::default());
        assert_eq!(region.municipal_populations.metropolis, 15_000);
        assert!(region.municipal_capacity() > 0);
    }

    #[test]
    fn test_wrong_census_length_rejected() {
        let mut kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        kingdom.regions[0].census.races.pop();
        let err = kingdom.validate().unwrap_err();
        assert!(err.to_string().contains("race"), "{}", err);
    }

    #[test]
    fn test_unnormalized_shares_rejected() {
        let mut kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        kingdom.regions[1].population_share = 0.7;
        assert!(matches!(
            kingdom.validate(),
            Err(PopulationError::InvalidKingdom(_))
        ));
    }

    #[test]
    fn test_nan_region_share_rejected() {
        let mut kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        kingdom.regions[0].population_share = f64::NAN;
        let err = kingdom.validate().unwrap_err();
        assert!(err.to_string().contains("Westmarch"), "{}", err);

        let authored = KINGDOM.replacen("population_share = 0.4", "population_share = nan", 1);
        assert!(matches!(
            KingdomDefinition::from_toml(&authored),
            Err(PopulationError::InvalidKingdom(_))
        ));
    }

    #[test]
    fn test_infinite_region_share_rejected() {
        let mut kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        kingdom.regions[1].population_share = f64::INFINITY;
        assert!(matches!(
            kingdom.validate(),
            Err(PopulationError::InvalidKingdom(_))
        ));
    }

    #[test]
    fn test_json_round_trip_of_fixture() {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        let json = serde_json::to_string(&kingdom).unwrap();
        let reloaded = KingdomDefinition::from_json(&json).unwrap();
        assert_eq!(reloaded.regions[0].census, kingdom.regions[0].census);
    }

    #[test]
    fn test_total_population_defaults() {
        let toml = r#"
[[regions]]
name = "Solo"
population_share = 1.0

[regions.census]
genders = [0.5, 0.5]
ages = [0.2, 0.2, 0.2, 0.2, 0.1, 0.1]
races = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
jobs = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
"#;
        let kingdom = KingdomDefinition::from_toml(toml).unwrap();
        assert_eq!(kingdom.total_population, 4_194_304);
    }
}
