//! Compile-time checks on the capability seams.

use static_assertions::{assert_impl_all, assert_not_impl_any, assert_obj_safe};
use squatch::alert::AlertDisplay;
use squatch::directory::HelpResponder;
use squatch::navigation::PathAgent;
use squatch::outcome::OutcomeSink;
use squatch::percept::PerceptListener;
use squatch::sandbox::{KinematicAgent, LevelConfig, SandboxWorld};
use squatch::spatial::SpatialQuery;
use squatch::{CamperController, ConfigError, RangerController, SensorConfig};

assert_obj_safe!(SpatialQuery, PathAgent, OutcomeSink, AlertDisplay, PerceptListener, HelpResponder);

assert_impl_all!(SandboxWorld: SpatialQuery);
assert_impl_all!(KinematicAgent: PathAgent, Clone);
assert_impl_all!(RangerController: HelpResponder, PerceptListener);
assert_impl_all!(CamperController: PerceptListener);
assert_not_impl_any!(CamperController: HelpResponder);
assert_impl_all!(LevelConfig: Clone, Send, Sync, serde::Serialize);
assert_impl_all!(SensorConfig: Clone, PartialEq, serde::de::DeserializeOwned);
assert_impl_all!(ConfigError: std::error::Error, Send, Sync);
