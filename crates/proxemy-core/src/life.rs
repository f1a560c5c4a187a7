//! Life and damage capability.

use crate::callbacks::CallbackCollection;

/// Payload handed to life-change callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeChange {
    pub previous: Option<f64>,
    pub current: f64,
}

/// Life counter with synchronous change notification.
///
/// Life is unset until assigned. `hurt` never clamps, so life can go
/// negative; an unset life is hurt as if it were zero.
#[derive(Debug, Default)]
pub struct LifeContainer {
    life: Option<f64>,
    max_life: Option<f64>,
    on_change: CallbackCollection<LifeChange>,
}

impl LifeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container whose life and maximum are both `life`. No callback fires.
    pub fn with_life(life: f64) -> Self {
        Self {
            life: Some(life),
            max_life: Some(life),
            on_change: CallbackCollection::new(),
        }
    }

    pub fn life(&self) -> Option<f64> {
        self.life
    }

    pub fn max_life(&self) -> Option<f64> {
        self.max_life
    }

    pub fn set_max_life(&mut self, max_life: f64) {
        self.max_life = Some(max_life);
    }

    pub fn set_life(&mut self, life: f64) {
        self.change(life);
    }

    pub fn hurt(&mut self, damage: f64) {
        self.change(self.life.unwrap_or(0.0) - damage);
    }

    pub fn heal(&mut self, amount: f64) {
        self.change(self.life.unwrap_or(0.0) + amount);
    }

    pub fn is_alive(&self) -> bool {
        self.life.is_some_and(|life| life > 0.0)
    }

    /// Register a callback fired after every change, in registration order.
    pub fn on_life_changed(
        &mut self,
        callback: impl FnMut(&mut LifeChange) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_change.add_callback(callback);
        self
    }

    fn change(&mut self, life: f64) {
        let mut change = LifeChange {
            previous: self.life,
            current: life,
        };
        self.life = Some(life);
        self.on_change.fire(&mut change);
    }
}

/// Anything that can take damage.
///
/// Implementors expose their [`LifeContainer`]; the provided methods
/// forward to it and then call [`Damageable::on_life_changed`] so the
/// entity can react (threshold state changes, death handling).
pub trait Damageable {
    fn life_container(&self) -> &LifeContainer;
    fn life_container_mut(&mut self) -> &mut LifeContainer;

    /// Hook run after every change made through this trait.
    fn on_life_changed(&mut self) {}

    fn hurt(&mut self, damage: f64) {
        self.life_container_mut().hurt(damage);
        self.on_life_changed();
    }

    fn heal(&mut self, amount: f64) {
        self.life_container_mut().heal(amount);
        self.on_life_changed();
    }

    fn is_alive(&self) -> bool {
        self.life_container().is_alive()
    }

    fn life(&self) -> f64 {
        self.life_container().life().unwrap_or(0.0)
    }
}

impl Damageable for LifeContainer {
    fn life_container(&self) -> &LifeContainer {
        self
    }

    fn life_container_mut(&mut self) -> &mut LifeContainer {
        self
    }
}
