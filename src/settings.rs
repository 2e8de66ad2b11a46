use glam::Vec3;

use crate::PhysicsError;

/// # Settings
///
/// Tunables for a [crate::World] step and for the fixed-tick run loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    /// Gravitational acceleration.
    pub gravity: Vec3,
    /// Duration of one simulation tick, in seconds.
    pub tick: f32,
    /// Upper bound on ticks run for a single update. Time beyond it is dropped.
    pub max_ticks_per_update: u32,
    /// Kinetic energy per unit mass below which a body counts as still. Zero disables sleeping.
    pub sleep_energy: f32,
    /// Consecutive still ticks before a body is put to rest.
    pub sleep_ticks: u32,
    /// Fraction of the penetration depth removed after each contact, in `[0, 1]`.
    pub penetration_correction: f32,
}

impl Settings {
    /// Default settings.
    pub const DEFAULT: Self = Self {
        gravity: Vec3::new(0.0, -9.81, 0.0),
        tick: 0.032,
        max_ticks_per_update: 4,
        sleep_energy: 0.01,
        sleep_ticks: 16,
        penetration_correction: 0.8,
    };

    /// Returns the settings with the given gravity.
    pub const fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Returns the settings with the given tick duration.
    pub const fn with_tick(mut self, tick: f32) -> Self {
        self.tick = tick;
        self
    }

    /// Returns the settings with the given tick limit per update.
    pub const fn with_max_ticks_per_update(mut self, max_ticks: u32) -> Self {
        self.max_ticks_per_update = max_ticks;
        self
    }

    /// Returns the settings with the given sleep threshold and delay.
    pub const fn with_sleep(mut self, energy: f32, ticks: u32) -> Self {
        self.sleep_energy = energy;
        self.sleep_ticks = ticks;
        self
    }

    /// Returns the settings with sleeping disabled.
    pub const fn without_sleep(self) -> Self {
        self.with_sleep(0.0, 0)
    }

    /// Returns the settings with the given penetration correction.
    pub const fn with_penetration_correction(mut self, correction: f32) -> Self {
        self.penetration_correction = correction;
        self
    }

    /// Returns whether bodies are allowed to fall asleep.
    pub fn sleep_enabled(&self) -> bool {
        self.sleep_energy > 0.0
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidSetting {
                name: "gravity",
                value: self.gravity.length(),
            });
        }

        if !self.tick.is_finite() || self.tick <= 0.0 {
            return Err(PhysicsError::InvalidTick(self.tick));
        }

        if self.max_ticks_per_update == 0 {
            return Err(PhysicsError::InvalidMaxTicks);
        }

        if !self.sleep_energy.is_finite() || self.sleep_energy < 0.0 {
            return Err(PhysicsError::InvalidSetting {
                name: "sleep energy",
                value: self.sleep_energy,
            });
        }

        if !(0.0..=1.0).contains(&self.penetration_correction) {
            return Err(PhysicsError::InvalidSetting {
                name: "penetration correction",
                value: self.penetration_correction,
            });
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validate_returns_ok() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn zero_tick_validate_returns_invalid_tick() {
        let settings = Settings::DEFAULT.with_tick(0.0);

        assert_eq!(settings.validate(), Err(PhysicsError::InvalidTick(0.0)));
    }

    #[test]
    fn nan_tick_validate_returns_invalid_tick() {
        let settings = Settings::DEFAULT.with_tick(f32::NAN);

        assert!(matches!(
            settings.validate(),
            Err(PhysicsError::InvalidTick(_))
        ));
    }

    #[test]
    fn zero_max_ticks_validate_returns_invalid_max_ticks() {
        let settings = Settings::DEFAULT.with_max_ticks_per_update(0);

        assert_eq!(settings.validate(), Err(PhysicsError::InvalidMaxTicks));
    }

    #[test]
    fn negative_sleep_energy_validate_returns_invalid_setting() {
        let settings = Settings::DEFAULT.with_sleep(-1.0, 4);

        assert_eq!(
            settings.validate(),
            Err(PhysicsError::InvalidSetting {
                name: "sleep energy",
                value: -1.0,
            })
        );
    }

    #[test]
    fn excessive_correction_validate_returns_invalid_setting() {
        let settings = Settings::DEFAULT.with_penetration_correction(1.5);

        assert!(matches!(
            settings.validate(),
            Err(PhysicsError::InvalidSetting {
                name: "penetration correction",
                ..
            })
        ));
    }

    #[test]
    fn without_sleep_sleep_enabled_returns_false() {
        assert!(!Settings::DEFAULT.without_sleep().sleep_enabled());
        assert!(Settings::DEFAULT.sleep_enabled());
    }
}
