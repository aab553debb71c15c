use crate::{Params, Skill};

/// Per-player loadout. Each class grants one passive bonus and one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillClass {
    #[default]
    None,
    /// Larger paddle, Teleport-assist
    Strength,
    /// Faster paddle, Slow-time
    Agility,
    /// Faster ball, Invert-opponent-paddle
    Intellect,
}

impl SkillClass {
    /// Unknown ids map to `None`
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => SkillClass::Strength,
            2 => SkillClass::Agility,
            3 => SkillClass::Intellect,
            _ => SkillClass::None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            SkillClass::None => 0,
            SkillClass::Strength => 1,
            SkillClass::Agility => 2,
            SkillClass::Intellect => 3,
        }
    }

    pub fn skill(self) -> Option<Skill> {
        match self {
            SkillClass::None => None,
            SkillClass::Strength => Some(Skill::TeleportAssist),
            SkillClass::Agility => Some(Skill::SlowTime),
            SkillClass::Intellect => Some(Skill::InvertOpponent),
        }
    }

    pub fn cooldown_ms(self) -> u64 {
        match self {
            SkillClass::None => 0,
            SkillClass::Strength => Params::STRENGTH_COOLDOWN_MS,
            SkillClass::Agility => Params::AGILITY_COOLDOWN_MS,
            SkillClass::Intellect => Params::INTELLECT_COOLDOWN_MS,
        }
    }
}

/// Gameplay multipliers and the skill cooldown for one player.
/// Lives on that player's paddle entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerModifiers {
    pub paddle_size_multiplier: f32,
    pub paddle_speed_multiplier: f32,
    pub paddle_invert_sign: f32, // -1.0 or 1.0
    pub ball_speed_multiplier: f32,
    pub time_factor: f32,
    pub class: SkillClass,
    pub cooldown_ms: u64,
    pub in_cooldown: bool,
    pub cooldown_started_at: u64, // ms timestamp
}

impl Default for PlayerModifiers {
    fn default() -> Self {
        Self {
            paddle_size_multiplier: 1.0,
            paddle_speed_multiplier: 1.0,
            paddle_invert_sign: 1.0,
            ball_speed_multiplier: 1.0,
            time_factor: 1.0,
            class: SkillClass::None,
            cooldown_ms: 0,
            in_cooldown: false,
            cooldown_started_at: 0,
        }
    }
}

impl PlayerModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to baseline and apply the class bonus. Returns the chosen class.
    pub fn set_class(&mut self, class_id: u8) -> SkillClass {
        *self = Self::default();

        let class = SkillClass::from_id(class_id);
        match class {
            SkillClass::Strength => self.paddle_size_multiplier = Params::CLASS_BONUS,
            SkillClass::Agility => self.paddle_speed_multiplier = Params::CLASS_BONUS,
            SkillClass::Intellect => self.ball_speed_multiplier = Params::CLASS_BONUS,
            SkillClass::None => {}
        }
        self.class = class;
        self.cooldown_ms = class.cooldown_ms();
        class
    }

    pub fn skill(&self) -> Option<Skill> {
        self.class.skill()
    }

    pub fn begin_cooldown(&mut self, now: u64) {
        self.cooldown_started_at = now;
        self.in_cooldown = true;
    }

    /// Clears `in_cooldown` once the cooldown has run out.
    /// Polled once per tick so the ready edge can be reported.
    pub fn cooldown_elapsed(&mut self, now: u64) -> bool {
        if self.cooldown_ms == 0
            || now.saturating_sub(self.cooldown_started_at) >= self.cooldown_ms
        {
            self.in_cooldown = false;
            return true;
        }
        false
    }

    /// Clear cooldown and timed effects. The class and its bonus are kept.
    pub fn reset_for_new_rally(&mut self) {
        self.in_cooldown = false;
        self.cooldown_started_at = 0;
        self.paddle_invert_sign = 1.0;
        self.time_factor = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_class_applies_bonus_and_cooldown() {
        let mut m = PlayerModifiers::new();

        assert_eq!(m.set_class(1), SkillClass::Strength);
        assert_eq!(m.paddle_size_multiplier, 1.2);
        assert_eq!(m.paddle_speed_multiplier, 1.0);
        assert_eq!(m.cooldown_ms, 20_000);

        assert_eq!(m.set_class(2), SkillClass::Agility);
        assert_eq!(m.paddle_size_multiplier, 1.0, "Previous bonus is dropped");
        assert_eq!(m.paddle_speed_multiplier, 1.2);
        assert_eq!(m.cooldown_ms, 15_000);

        assert_eq!(m.set_class(3), SkillClass::Intellect);
        assert_eq!(m.ball_speed_multiplier, 1.2);
        assert_eq!(m.cooldown_ms, 25_000);
    }

    #[test]
    fn test_unknown_class_disables_skill() {
        let mut m = PlayerModifiers::new();
        m.set_class(3);
        assert_eq!(m.set_class(9), SkillClass::None);
        assert_eq!(m, PlayerModifiers::default());
        assert!(m.skill().is_none());
    }

    #[test]
    fn test_cooldown_elapses_on_edge() {
        let mut m = PlayerModifiers::new();
        m.set_class(2);
        m.begin_cooldown(1_000);
        assert!(m.in_cooldown);

        assert!(!m.cooldown_elapsed(15_999));
        assert!(m.in_cooldown);

        assert!(m.cooldown_elapsed(16_000));
        assert!(!m.in_cooldown);
    }

    #[test]
    fn test_zero_cooldown_always_elapsed() {
        let mut m = PlayerModifiers::new();
        m.begin_cooldown(5_000);
        assert!(m.cooldown_elapsed(5_000));
        assert!(!m.in_cooldown);
    }

    #[test]
    fn test_reset_for_new_rally_keeps_class() {
        let mut m = PlayerModifiers::new();
        m.set_class(1);
        m.begin_cooldown(100);
        m.time_factor = 0.4;
        m.paddle_invert_sign = -1.0;

        m.reset_for_new_rally();

        assert!(!m.in_cooldown);
        assert_eq!(m.time_factor, 1.0);
        assert_eq!(m.paddle_invert_sign, 1.0);
        assert_eq!(m.class, SkillClass::Strength);
        assert_eq!(m.paddle_size_multiplier, 1.2);
    }
}
