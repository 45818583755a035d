//! Perception events passed from sensors to behaviour controllers.
use glam::Vec3;

/// A target was seen: inside the vision cone and not occluded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sighting {
    /// Centre of the sighted target.
    pub position: Vec3,
    /// Simulation time of the detection, in seconds.
    pub at: f32,
}

/// Something was heard.
#[derive(Clone, Debug, PartialEq)]
pub struct Sound {
    /// Where the sound came from.
    pub position: Vec3,
    /// `true` when the listener cannot see the source.
    pub muted: bool,
    /// `true` for passive noises from props and terrain rather than from a
    /// target found by the sensor's own detection pass.
    pub environmental: bool,
    /// Category of the sound source.
    pub tag: String,
    /// Simulation time of the detection, in seconds.
    pub at: f32,
}

/// A target entered the agent's trigger volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Centre of the touching target.
    pub position: Vec3,
    /// Simulation time of the contact, in seconds.
    pub at: f32,
}

/// One unit of sensory information.
#[derive(Clone, Debug, PartialEq)]
pub enum Percept {
    /// See [`Sighting`].
    Sighting(Sighting),
    /// See [`Sound`].
    Sound(Sound),
    /// See [`Contact`].
    Contact(Contact),
}

impl Percept {
    /// Simulation time at which the percept was produced.
    #[must_use]
    pub const fn at(&self) -> f32 {
        match self {
            Self::Sighting(sighting) => sighting.at,
            Self::Sound(sound) => sound.at,
            Self::Contact(contact) => contact.at,
        }
    }

    /// Hands the percept to the matching listener callback.
    pub fn deliver(&self, listener: &mut dyn PerceptListener) {
        match self {
            Self::Sighting(sighting) => listener.on_sighting(sighting),
            Self::Sound(sound) => listener.on_sound(sound),
            Self::Contact(contact) => listener.on_contact(contact),
        }
    }
}

/// Subscriber attached to a sensor.
pub trait PerceptListener {
    /// A target is visible.
    fn on_sighting(&mut self, sighting: &Sighting);

    /// A sound was heard.
    fn on_sound(&mut self, sound: &Sound);

    /// A target touched the agent.
    fn on_contact(&mut self, contact: &Contact);
}
