use std::collections::BTreeMap;

use crate::effects::fire::Fire;
use crate::effects::staticcolor::StaticColor;
use crate::effects::LightingEffect;

pub const FIRE_EFFECT: &str = "ANIM_FIRE";

/// Builds a fresh effect. The seed is only meaningful for random effects.
pub type EffectFactory = fn(Option<u64>) -> Box<dyn LightingEffect>;

pub struct EffectRegistry {
    factories: BTreeMap<String, EffectFactory>,
}

impl EffectRegistry {
    pub fn new() -> EffectRegistry {
        EffectRegistry {
            factories: BTreeMap::new(),
        }
    }

    /// Registry holding every effect this crate ships.
    pub fn with_builtin_effects() -> EffectRegistry {
        let mut registry = EffectRegistry::new();
        registry.register_effect(FIRE_EFFECT, |seed| match seed {
            Some(seed) => Box::new(Fire::with_seed(seed)),
            None => Box::new(Fire::new()),
        });
        registry.register_effect("ANIM_STATIC", |_| Box::new(StaticColor::new()));
        registry
    }

    pub fn register_effect(&mut self, name: &str, factory: EffectFactory) {
        log::info!("Registering effect {name}");
        if self.factories.insert(name.to_string(), factory).is_some() {
            log::warn!("Effect {name} was already registered, replacing it");
        }
    }

    pub fn create(&self, name: &str, seed: Option<u64>) -> Result<Box<dyn LightingEffect>, String> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory(seed)),
            None => Err(format!(
                "Unknown effect {}, known effects: {}",
                name,
                self.names().join(", ")
            )),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(|name| name.as_str()).collect()
    }
}
