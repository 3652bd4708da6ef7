//! Bonus (ability) model.
//!
//! A stack's abilities are a flat list of [`Bonus`] records. Queries select a
//! subset with a [`Selector`] and aggregate it through [`BonusList`]:
//!
//! ```text
//! total = (base_sum + additive_sum) × (100 + percent_sum) / 100
//! ```
//!
//! The propagation network that decides which bonuses a stack carries is an
//! external collaborator; this module only defines the records and the
//! read-side capability ([`BonusBearer`]).

mod bearer;
mod selector;

pub use bearer::BonusBearer;
pub use selector::Selector;

use bitflags::bitflags;

/// Kind of ability or numeric bonus.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BonusType {
    /// Number of ranged shots per battle.
    Shots,
    /// Number of spell casts per battle.
    Casts,
    /// Retaliations per round on top of the base one.
    AdditionalRetaliation,
    /// Retaliation charges are never consumed.
    UnlimitedRetaliations,
    /// Extra blows per attack.
    AdditionalAttack,
    /// Attacks made by this stack cannot be retaliated.
    BlocksRetaliation,
    /// This stack never retaliates.
    NoRetaliation,
    /// Stack may shoot.
    Shooter,
    /// Shooting is not blocked by adjacent enemies.
    FreeShooting,
    /// War machines: never retaliate, never blocked.
    SiegeWeapon,
    /// Mind control: stack fights for the opposite side.
    Hypnotized,
    /// Stack cannot act (blinded, paralyzed, ammo cart).
    NotActive,
    /// Berserk: must attack the nearest stack.
    AttacksNearestCreature,
    Flying,
    Stacks,
    PrimarySkill,
    GeneralDamageReduction,
    CreatureDamage,
}

/// Where a bonus comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusSource {
    Creature,
    Artifact,
    SecondarySkill,
    /// Timed spell effect; `source_id` holds the spell id.
    SpellEffect,
    Terrain,
    Other,
}

bitflags! {
    /// Lifetime rules of a bonus. Several may apply at once.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BonusDuration: u8 {
        const PERMANENT            = 1 << 0;
        const ONE_BATTLE           = 1 << 1;
        const N_TURNS              = 1 << 2;
        const UNTIL_BEING_ATTACKED = 1 << 3;
        const UNTIL_ATTACK         = 1 << 4;
        const STACK_GETS_TURN      = 1 << 5;
    }
}

/// How a bonus value combines with others of the same type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusValueType {
    /// Creature base value (summed first).
    BaseNumber,
    /// Flat addition.
    #[default]
    Additive,
    /// Percentage applied to the summed value.
    PercentToAll,
}

/// Attack modes a bonus applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectRange {
    #[default]
    NoLimit,
    OnlyMeleeFight,
    OnlyDistanceFight,
}

/// A single ability record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bonus {
    pub ty: BonusType,
    pub subtype: i32,
    pub value: i32,
    pub value_type: BonusValueType,
    pub source: BonusSource,
    /// Id of the originating object (spell id for spell effects).
    pub source_id: i32,
    pub duration: BonusDuration,
    /// Remaining turns; meaningful with [`BonusDuration::N_TURNS`].
    pub turns_remain: i32,
    pub effect_range: EffectRange,
}

impl Bonus {
    /// Permanent creature ability with the given value.
    pub fn new(ty: BonusType, value: i32) -> Self {
        Self {
            ty,
            subtype: -1,
            value,
            value_type: BonusValueType::Additive,
            source: BonusSource::Creature,
            source_id: -1,
            duration: BonusDuration::PERMANENT,
            turns_remain: 0,
            effect_range: EffectRange::NoLimit,
        }
    }

    /// Timed spell effect lasting `turns` turns.
    pub fn spell_effect(ty: BonusType, value: i32, spell_id: i32, turns: i32) -> Self {
        Self {
            source: BonusSource::SpellEffect,
            source_id: spell_id,
            duration: BonusDuration::N_TURNS,
            turns_remain: turns,
            ..Self::new(ty, value)
        }
    }

    pub fn with_subtype(mut self, subtype: i32) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn with_value_type(mut self, value_type: BonusValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_effect_range(mut self, effect_range: EffectRange) -> Self {
        self.effect_range = effect_range;
        self
    }

    pub fn with_source(mut self, source: BonusSource, source_id: i32) -> Self {
        self.source = source;
        self.source_id = source_id;
        self
    }

    /// Returns true if `other` refreshes the same timed effect as `self`.
    pub fn same_effect(&self, other: &Bonus) -> bool {
        self.source == BonusSource::SpellEffect
            && other.source == BonusSource::SpellEffect
            && self.source_id == other.source_id
            && self.ty == other.ty
            && self.subtype == other.subtype
    }
}

/// Owned result of a bonus query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusList {
    bonuses: Vec<Bonus>,
}

impl BonusList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bonus> {
        self.bonuses.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bonus> {
        self.bonuses.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    /// First bonus matching `selector`.
    pub fn first(&self, selector: &Selector) -> Option<&Bonus> {
        self.bonuses.iter().find(|bonus| selector.matches(bonus))
    }

    /// Copies out the bonuses matching `selector`.
    pub fn filtered(&self, selector: &Selector) -> BonusList {
        self.bonuses
            .iter()
            .filter(|bonus| selector.matches(bonus))
            .cloned()
            .collect()
    }

    /// Aggregated value of every bonus in the list.
    pub fn total_value(&self) -> i32 {
        let mut base = 0i64;
        let mut additive = 0i64;
        let mut percent = 0i64;
        for bonus in &self.bonuses {
            let value = i64::from(bonus.value);
            match bonus.value_type {
                BonusValueType::BaseNumber => base += value,
                BonusValueType::Additive => additive += value,
                BonusValueType::PercentToAll => percent += value,
            }
        }

        let flat = base + additive;
        let total = if percent == 0 {
            flat
        } else {
            flat * (100 + percent) / 100
        };
        total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl FromIterator<Bonus> for BonusList {
    fn from_iter<I: IntoIterator<Item = Bonus>>(iter: I) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}

impl Extend<Bonus> for BonusList {
    fn extend<I: IntoIterator<Item = Bonus>>(&mut self, iter: I) {
        self.bonuses.extend(iter);
    }
}

impl IntoIterator for BonusList {
    type Item = Bonus;
    type IntoIter = std::vec::IntoIter<Bonus>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonuses.into_iter()
    }
}

impl<'a> IntoIterator for &'a BonusList {
    type Item = &'a Bonus;
    type IntoIter = std::slice::Iter<'a, Bonus>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonuses.iter()
    }
}
