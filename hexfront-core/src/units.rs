//! Unit kind definitions and per-unit turn state

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Unit kind (index into UNIT_TYPES)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Infantry,
    Cavalry,
    Archer,
    Worker,
}

/// Unit type definition
#[derive(Clone, Debug)]
pub struct UnitType {
    pub name: &'static str,
    pub max_hp: u32,
    pub move_range: u32,
    pub attack_range: u32,
    pub attack_damage: u32,
}

impl UnitType {
    const fn new(
        name: &'static str,
        max_hp: u32,
        move_range: u32,
        attack_range: u32,
        attack_damage: u32,
    ) -> Self {
        Self {
            name,
            max_hp,
            move_range,
            attack_range,
            attack_damage,
        }
    }
}

/// Indexed by `UnitKind as usize`
pub static UNIT_TYPES: [UnitType; 4] = [
    UnitType::new("Infantry", 10, 2, 1, 4),
    UnitType::new("Cavalry", 8, 4, 1, 3),
    UnitType::new("Archer", 6, 2, 2, 3),
    // Cannot attack at all
    UnitType::new("Worker", 5, 2, 0, 0),
];

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Infantry,
        UnitKind::Cavalry,
        UnitKind::Archer,
        UnitKind::Worker,
    ];

    pub fn unit_type(self) -> &'static UnitType {
        &UNIT_TYPES[self as usize]
    }
}

/// Per-unit phase within a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPhase {
    /// Full movement, not attacked
    Fresh,
    /// Some movement spent, not attacked
    Moved,
    /// Attacked; movement is zero until the owner's next turn
    Attacked,
}

/// A unit. Its position lives in the game state indices, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub owner: PlayerId,
    pub kind: UnitKind,
    hp: u32,
    movement: u32,
    attacked: bool,
}

impl Unit {
    /// Fresh unit at full health
    pub fn new(owner: PlayerId, kind: UnitKind) -> Self {
        let ut = kind.unit_type();
        Self {
            owner,
            kind,
            hp: ut.max_hp,
            movement: ut.move_range,
            attacked: false,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.kind.unit_type().max_hp
    }

    /// Remaining movement points this turn
    pub fn movement(&self) -> u32 {
        self.movement
    }

    pub fn max_movement(&self) -> u32 {
        self.kind.unit_type().move_range
    }

    pub fn attack_range(&self) -> u32 {
        self.kind.unit_type().attack_range
    }

    pub fn attack_damage(&self) -> u32 {
        self.kind.unit_type().attack_damage
    }

    pub fn has_attacked(&self) -> bool {
        self.attacked
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn phase(&self) -> UnitPhase {
        if self.attacked {
            UnitPhase::Attacked
        } else if self.movement < self.max_movement() {
            UnitPhase::Moved
        } else {
            UnitPhase::Fresh
        }
    }

    /// Spent movement or attacked this turn
    pub fn has_acted(&self) -> bool {
        self.phase() != UnitPhase::Fresh
    }

    pub(crate) fn spend_movement(&mut self, cost: u32) {
        self.movement = self.movement.saturating_sub(cost);
    }

    pub(crate) fn mark_attacked(&mut self) {
        self.attacked = true;
        self.movement = 0;
    }

    /// Returns hp left
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Back to Fresh. Hp is not restored.
    pub(crate) fn reset_turn(&mut self) {
        self.movement = self.max_movement();
        self.attacked = false;
    }
}
