//! Audio/haptic collaborator. Fire-and-forget: the core never inspects a
//! result.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vibration {
    Light,
    Medium,
}

pub trait Feedback {
    fn play_shoot(&mut self);
    fn play_explosion(&mut self);
    fn vibrate(&mut self, strength: Vibration);
}

/// Discards every trigger.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn play_shoot(&mut self) {}
    fn play_explosion(&mut self) {}
    fn vibrate(&mut self, _strength: Vibration) {}
}
