//! Simulated creature lookup used as the demo's slow data source.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use rescache_resource::Resource;

/// One attack in a creature's move list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attack {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub damage: u16,
}

/// Creature record rendered by the data view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Creature {
    pub number: u16,
    pub name: String,
    pub image: String,
    pub attacks: Vec<Attack>,
}

#[derive(Debug, Error)]
pub enum DexError {
    #[error("Unsupported creature: \"{0}\". Try \"pikachu\", \"bulbasaur\", \"charmander\", or \"squirtle\"")]
    NotFound(String),
}

/// (number, name, [(attack, type, damage)])
const CATALOG: &[(u16, &str, &[(&str, &str, u16)])] = &[
    (1, "bulbasaur", &[("Tackle", "Normal", 40), ("Vine Whip", "Grass", 45)]),
    (4, "charmander", &[("Scratch", "Normal", 40), ("Ember", "Fire", 40)]),
    (7, "squirtle", &[("Tackle", "Normal", 40), ("Water Gun", "Water", 40)]),
    (25, "pikachu", &[("Quick Attack", "Normal", 40), ("Thunderbolt", "Electric", 90)]),
    (133, "eevee", &[("Tackle", "Normal", 40), ("Swift", "Normal", 60)]),
    (143, "snorlax", &[("Body Slam", "Normal", 85), ("Rest", "Psychic", 0)]),
];

/// In-process stand-in for a remote creature API.
#[derive(Clone, Debug)]
pub struct Dex {
    delay: Duration,
}

impl Dex {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Looks a creature up after the configured delay. Matching is exact;
    /// callers normalize names first.
    pub async fn fetch(&self, name: &str) -> Result<Creature, DexError> {
        debug!(name, delay_ms = self.delay.as_millis() as u64, "Fetching creature");
        tokio::time::sleep(self.delay).await;
        find(name).ok_or_else(|| DexError::NotFound(name.to_string()))
    }

    /// Starts a fetch and wraps it in a resource.
    pub fn resource(&self, name: &str) -> Resource<Creature> {
        let dex = self.clone();
        let name = name.to_string();
        Resource::spawn(async move { dex.fetch(&name).await })
    }
}

fn find(name: &str) -> Option<Creature> {
    CATALOG
        .iter()
        .find(|(_, n, _)| *n == name)
        .map(|(number, n, attacks)| Creature {
            number: *number,
            name: n.to_string(),
            image: format!("/img/creatures/{}.jpg", n),
            attacks: attacks
                .iter()
                .map(|(a, kind, damage)| Attack {
                    name: a.to_string(),
                    kind: kind.to_string(),
                    damage: *damage,
                })
                .collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_known() {
        let dex = Dex::new(Duration::ZERO);
        let creature = dex.fetch("pikachu").await.unwrap();
        assert_eq!(creature.number, 25);
        assert_eq!(creature.attacks.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_unknown() {
        let dex = Dex::new(Duration::ZERO);
        let err = dex.fetch("mewthree").await.unwrap_err();
        assert!(err.to_string().contains("mewthree"));
    }

    #[tokio::test]
    async fn test_fetch_is_case_sensitive() {
        let dex = Dex::new(Duration::ZERO);
        assert!(dex.fetch("Pikachu").await.is_err());
    }

    #[tokio::test]
    async fn test_resource_settles() {
        let dex = Dex::new(Duration::from_millis(5));
        let resource = dex.resource("eevee");
        assert!(resource.state().is_pending());
        assert_eq!(resource.wait().await.unwrap().name, "eevee");
    }

    #[test]
    fn test_attack_serializes_type_field() {
        let creature = find("charmander").unwrap();
        let json = serde_json::to_value(&creature).unwrap();
        assert_eq!(json["attacks"][1]["type"], "Fire");
    }
}
