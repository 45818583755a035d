//! Default tuning values shared by the perception and behaviour systems.
//!
//! Every value here can be overridden per agent through the serde-backed
//! configuration structs; these are only the fallbacks used by `Default`.

/// Seconds between two detection passes of a sensor.
pub const SENSOR_POLL_INTERVAL: f32 = 0.1;
/// Distance at which a sensor can see a target.
pub const VIEW_RADIUS: f32 = 5.0;
/// Distance at which a sensor can hear a target.
pub const AUDIBLE_RADIUS: f32 = 3.5;
/// Full width of the vision cone in degrees.
pub const VIEW_ANGLE: f32 = 90.0;

/// Walking speed used for patrols, investigations and returning home.
pub const WALK_SPEED: f32 = 0.8;
/// Running speed used for fleeing, chasing and answering calls.
pub const RUN_SPEED: f32 = 2.4;
/// Slack added to the path agent's stopping distance when testing arrival.
pub const ARRIVAL_TOLERANCE: f32 = 1.0;
/// Fraction of the remaining heading error closed per second while turning.
pub const TURN_RATE: f32 = 4.0;
/// Squared speed below which an agent counts as standing still.
pub const STILL_SPEED_SQ: f32 = 1e-6;

/// Heading error under which an agent counts as facing a point of interest.
pub const FACING_TOLERANCE_DEGREES: f32 = 20.0;
/// Seconds a heard sound stays interesting before the agent gives up.
pub const SOUND_MEMORY_SECONDS: f32 = 5.0;
/// Seconds an agent lingers at a point of interest.
pub const LINGER_SECONDS: f32 = 3.0;

/// Distance a non-aggressive camper tries to put between itself and a threat.
pub const FLEE_DISTANCE: f32 = 8.0;
/// Rotation applied to the flee direction after each blocked probe.
pub const FLEE_RETRY_STEP_DEGREES: f32 = 10.0;
/// Upper bound on flee probes; 36 steps of 10 degrees cover a full turn.
pub const FLEE_MAX_ATTEMPTS: u32 = 36;

/// Distance under which a sighted target can be captured.
pub const CAPTURE_DISTANCE: f32 = 1.5;
/// Seconds a target must stay within capture distance to be caught.
pub const CAPTURE_SECONDS: f32 = 1.0;
/// Seconds a ranger keeps chasing after its last sighting.
pub const SECONDS_TO_REMAIN_ALERTED: f32 = 0.5;

/// Ratio between a flashlight's outer spot angle and the vision cone.
pub const FLASHLIGHT_SPREAD: f32 = 1.2;

/// Distance within which an environmental noise reaches sensors.
pub const EMITTER_RADIUS: f32 = 10.0;

/// Distance within which a landing thrown item draws a ranger.
pub const DISTRACTION_RADIUS: f32 = 5.0;
