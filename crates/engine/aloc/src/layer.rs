//! Collision layer classification
//!
//! Records store their layer as a plain integer so codes added by newer
//! engine builds survive decoding. [`classify`] maps a code to a name and
//! [`LayerFilter`] decides which layers a consumer treats as collidable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

macro_rules! collision_layers {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// Named collision layers. Codes outside the table become [`CollisionLayer::Unknown`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum CollisionLayer {
            $($variant,)*
            Unknown(u64),
        }

        impl CollisionLayer {
            /// Every named layer in code order
            pub const NAMED: &'static [CollisionLayer] = &[$(CollisionLayer::$variant,)*];

            pub fn from_code(code: u64) -> Self {
                match code {
                    $($code => CollisionLayer::$variant,)*
                    other => CollisionLayer::Unknown(other),
                }
            }

            pub fn code(self) -> u64 {
                match self {
                    $(CollisionLayer::$variant => $code,)*
                    CollisionLayer::Unknown(code) => code,
                }
            }

            /// Engine name, e.g. `STATIC_COLLIDABLES_ONLY`
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(CollisionLayer::$variant => Some($name),)*
                    CollisionLayer::Unknown(_) => None,
                }
            }
        }
    };
}

collision_layers! {
    CollideWithAll = 0 => "COLLIDE_WITH_ALL",
    StaticCollidablesOnly = 1 => "STATIC_COLLIDABLES_ONLY",
    DynamicCollidablesOnly = 2 => "DYNAMIC_COLLIDABLES_ONLY",
    Stairs = 3 => "STAIRS",
    ShotOnlyCollision = 4 => "SHOT_ONLY_COLLISION",
    DynamicTrashCollidables = 5 => "DYNAMIC_TRASH_COLLIDABLES",
    KinematicCollidablesOnly = 6 => "KINEMATIC_COLLIDABLES_ONLY",
    StaticCollidablesOnlyTransparent = 7 => "STATIC_COLLIDABLES_ONLY_TRANSPARENT",
    DynamicCollidablesOnlyTransparent = 8 => "DYNAMIC_COLLIDABLES_ONLY_TRANSPARENT",
    KinematicCollidablesOnlyTransparent = 9 => "KINEMATIC_COLLIDABLES_ONLY_TRANSPARENT",
    StairsSteps = 10 => "STAIRS_STEPS",
    StairsSlope = 11 => "STAIRS_SLOPE",
    HeroProxy = 12 => "HERO_PROXY",
    ActorProxy = 13 => "ACTOR_PROXY",
    HeroVr = 14 => "HERO_VR",
    Clip = 15 => "CLIP",
    ActorRagdoll = 16 => "ACTOR_RAGDOLL",
    CrowdRagdoll = 17 => "CROWD_RAGDOLL",
    LedgeAnchor = 18 => "LEDGE_ANCHOR",
    ActorDynBody = 19 => "ACTOR_DYN_BODY",
    HeroDynBody = 20 => "HERO_DYN_BODY",
    Items = 21 => "ITEMS",
    Weapons = 22 => "WEAPONS",
    CollisionVolumeHitmanOn = 23 => "COLLISION_VOLUME_HITMAN_ON",
    CollisionVolumeHitmanOff = 24 => "COLLISION_VOLUME_HITMAN_OFF",
    DynamicCollidablesOnlyNoCharacter = 25 => "DYNAMIC_COLLIDABLES_ONLY_NO_CHARACTER",
    DynamicCollidablesOnlyNoCharacterTransparent = 26 => "DYNAMIC_COLLIDABLES_ONLY_NO_CHARACTER_TRANSPARENT",
    CollideWithStaticOnly = 27 => "COLLIDE_WITH_STATIC_ONLY",
    AiVisionBlocker = 28 => "AI_VISION_BLOCKER",
    AiVisionBlockerAmbientOnly = 29 => "AI_VISION_BLOCKER_AMBIENT_ONLY",
    UnusedLast = 30 => "UNUSED_LAST",
}

impl CollisionLayer {
    /// Look up a named layer, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .copied()
            .find(|layer| layer.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn is_known(self) -> bool {
        !matches!(self, CollisionLayer::Unknown(_))
    }
}

impl fmt::Display for CollisionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.code()),
        }
    }
}

/// Classify a raw layer code. Total: unknown codes are preserved, never rejected.
pub fn classify(code: impl Into<u64>) -> CollisionLayer {
    CollisionLayer::from_code(code.into())
}

/// `false` only when `code` is in the exclusion set
pub fn is_collidable(code: impl Into<u64>, excluded: &LayerFilter) -> bool {
    excluded.is_collidable(code.into())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerFilterError {
    #[error("Unknown collision layer: {0}")]
    UnknownLayer(String),
}

/// Set of excluded layer codes. Empty by default, so every layer collides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFilter {
    excluded: BTreeSet<u64>,
}

impl LayerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(&mut self, code: impl Into<u64>) -> &mut Self {
        self.excluded.insert(code.into());
        self
    }

    pub fn with_excluded<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<u64>,
    {
        Self {
            excluded: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, code: u64) -> bool {
        self.excluded.contains(&code)
    }

    pub fn is_collidable(&self, code: u64) -> bool {
        !self.is_excluded(code)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn excluded(&self) -> impl Iterator<Item = u64> + '_ {
        self.excluded.iter().copied()
    }
}

impl From<CollisionLayer> for u64 {
    fn from(layer: CollisionLayer) -> Self {
        layer.code()
    }
}

/// Parses a comma-separated list of layer names or numeric codes,
/// e.g. `CLIP, stairs, 28`.
impl FromStr for LayerFilter {
    type Err = LayerFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filter = LayerFilter::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let code = match item.parse::<u64>() {
                Ok(code) => code,
                Err(_) => CollisionLayer::from_name(item)
                    .map(CollisionLayer::code)
                    .ok_or_else(|| LayerFilterError::UnknownLayer(item.to_string()))?,
            };
            filter.exclude(code);
        }
        Ok(filter)
    }
}

impl fmt::Display for LayerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for code in self.excluded() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            match classify(code).name() {
                Some(name) => f.write_str(name)?,
                None => write!(f, "{code}")?,
            }
        }
        Ok(())
    }
}
