//! Input gates.
//!
//! Fields are ints used as flags (1 reads the input, 0 ignores it) so attack
//! bundles can lock input with a Set layer and release it by popping.

use super::value_set;

value_set! {
    /// Which gathered inputs the character currently acts on.
    pub struct ActionInputValues: ActionInput {
        can_move: i32 = 1,
        can_jump: i32 = 1,
        can_attack: i32 = 1,
        can_rotate: i32 = 1,
    }
}

impl ActionInputValues {
    /// Everything locked; handy as a Set layer.
    pub const LOCKED: Self = Self {
        can_move: 0,
        can_jump: 0,
        can_attack: 0,
        can_rotate: 0,
    };

    #[inline]
    pub fn move_allowed(&self) -> bool {
        self.can_move > 0
    }

    #[inline]
    pub fn jump_allowed(&self) -> bool {
        self.can_jump > 0
    }

    #[inline]
    pub fn attack_allowed(&self) -> bool {
        self.can_attack > 0
    }

    #[inline]
    pub fn rotate_allowed(&self) -> bool {
        self.can_rotate > 0
    }
}
