//! State machine tests driven through recording fakes.
use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::Vec3;
use mockall::mock;
use rstest::{fixture, rstest};

use super::*;
use crate::agent::Body;
use crate::directory::{HelpResponder, RangerDirectory, ResponderHandle};
use crate::flee::FleeConfig;
use crate::outcome::FailureCause;
use crate::sandbox::SandboxWorld;
use crate::testing::{RecordingOutcome, RecordingPath};

mock! {
    Sink {}
    impl OutcomeSink for Sink {
        fn notify_failure(&self, cause: FailureCause);
    }
}

struct Rig<R: Role> {
    controller: Controller<R>,
    body: BodyHandle,
    path: RecordingPath,
    outcome: RecordingOutcome,
}

fn spawn<R: Role>(role: R, at: Vec3) -> Rig<R> {
    let body = BodyHandle::new(Body::new(at, 0.0));
    let path = RecordingPath::default();
    let outcome = RecordingOutcome::default();
    let controller = Controller::spawn(
        AgentWiring {
            id: AgentId(1),
            body: body.clone(),
            path: Box::new(path.clone()),
            outcome: Rc::new(outcome.clone()),
            alert_display: None,
        },
        role,
        0.0,
    );
    Rig {
        controller,
        body,
        path,
        outcome,
    }
}

fn seen(position: Vec3, at: f32) -> Sighting {
    Sighting { position, at }
}

fn heard(position: Vec3, at: f32) -> Sound {
    Sound {
        position,
        muted: false,
        environmental: false,
        tag: "Player".into(),
        at,
    }
}

#[derive(Default)]
struct Radio {
    position: Vec3,
    calls: Vec<Vec3>,
}

impl HelpResponder for Radio {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn call_for_help(&mut self, at: Vec3, _now: f32) {
        self.calls.push(at);
    }
}

struct CampRig {
    rig: Rig<Camper>,
    radio: Rc<RefCell<Radio>>,
}

fn camper_config() -> CamperConfig {
    CamperConfig {
        flee: FleeConfig {
            flee_distance: 5.0,
            ..FleeConfig::default()
        },
        ..CamperConfig::default()
    }
}

fn camp_with(config: CamperConfig) -> CampRig {
    let directory = Rc::new(RangerDirectory::new());
    let radio = Rc::new(RefCell::new(Radio {
        position: Vec3::new(0.0, 0.0, 20.0),
        calls: Vec::new(),
    }));
    let handle: ResponderHandle = radio.clone();
    directory.register(AgentId(50), &handle);
    let camper = Camper::new(config, Rc::new(SandboxWorld::new()), directory);
    CampRig {
        rig: spawn(camper, Vec3::ZERO),
        radio,
    }
}

#[fixture]
fn camp() -> CampRig {
    camp_with(camper_config())
}

fn ranger_with(config: RangerConfig) -> Rig<Ranger> {
    spawn(Ranger::new(config), Vec3::ZERO)
}

fn patrol_config() -> RangerConfig {
    RangerConfig {
        waypoints: vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
        seconds_to_remain_alerted: 3.0,
        ..RangerConfig::default()
    }
}

#[fixture]
fn patrol() -> Rig<Ranger> {
    ranger_with(patrol_config())
}

#[rstest]
fn camper_flees_directly_away_and_calls_for_help(mut camp: CampRig) {
    camp.rig
        .controller
        .on_sighting(&seen(Vec3::new(10.0, 0.0, 0.0), 1.0));

    assert_eq!(camp.rig.controller.state(), CamperState::Fleeing);
    assert_eq!(camp.rig.controller.alert(), AlertState::Exclamation);
    let destination = camp.rig.path.destination().expect("flee destination set");
    assert_relative_eq!(destination.x, -5.0, epsilon = 1e-5);
    assert_relative_eq!(destination.z, 0.0, epsilon = 1e-5);
    assert_eq!(camp.rig.path.last_speed(), Some(MotionConfig::default().run_speed));
    assert_eq!(camp.radio.borrow().calls, vec![Vec3::new(10.0, 0.0, 0.0)]);
}

#[test]
fn camper_flees_even_with_nobody_to_call() {
    let camper = Camper::new(
        camper_config(),
        Rc::new(SandboxWorld::new()),
        Rc::new(RangerDirectory::new()),
    );
    let mut rig = spawn(camper, Vec3::ZERO);
    rig.controller.on_sighting(&seen(Vec3::new(10.0, 0.0, 0.0), 1.0));

    assert_eq!(rig.controller.state(), CamperState::Fleeing);
    let destination = rig.controller.role().flee_destination().expect("flee planned");
    assert_relative_eq!(destination.x, -5.0, epsilon = 1e-5);
    assert_eq!(rig.path.destination(), Some(destination));
}

#[rstest]
fn fleeing_camper_ignores_further_sightings(mut camp: CampRig) {
    camp.rig.controller.on_sighting(&seen(Vec3::new(10.0, 0.0, 0.0), 1.0));
    camp.rig.controller.on_sighting(&seen(Vec3::new(0.0, 0.0, 10.0), 1.1));
    assert_eq!(camp.radio.borrow().calls.len(), 1);
    assert_eq!(camp.rig.path.log().destinations.len(), 1);
}

#[rstest]
fn camper_reaches_safe_space_and_holds_heading(mut camp: CampRig) {
    camp.rig.controller.on_sighting(&seen(Vec3::new(10.0, 0.0, 0.0), 1.0));
    camp.rig.body.set_position(Vec3::new(-5.0, 0.0, 0.0));
    camp.rig.body.set_yaw(-90.0);
    camp.rig.controller.tick(2.0);
    assert_eq!(camp.rig.controller.state(), CamperState::AtSafeSpace);
    assert_eq!(camp.rig.controller.alert(), AlertState::None);

    camp.rig.path.set_velocity(Vec3::new(0.0, 0.0, 1.0));
    camp.rig.controller.tick(2.1);
    assert_relative_eq!(camp.rig.body.yaw(), -90.0);
}

#[rstest]
fn sound_halts_and_raises_question(mut camp: CampRig) {
    camp.rig.controller.on_sound(&heard(Vec3::new(0.0, 0.0, 5.0), 1.0));
    assert_eq!(camp.rig.controller.state(), CamperState::HeardSomething);
    assert_eq!(camp.rig.controller.alert(), AlertState::Question);
    assert_eq!(camp.rig.path.halts(), 1);
    let poi = camp.rig.controller.core().point_of_interest().expect("poi remembered");
    assert_eq!(poi.lead, Lead::Heard);
}

#[rstest]
fn repeated_sound_only_refreshes(mut camp: CampRig) {
    camp.rig.controller.on_sound(&heard(Vec3::new(0.0, 0.0, 5.0), 1.0));
    camp.rig.controller.on_sound(&heard(Vec3::new(1.0, 0.0, 5.0), 2.0));
    assert_eq!(camp.rig.path.halts(), 1);
    let poi = camp.rig.controller.core().point_of_interest().expect("poi remembered");
    assert_eq!(poi.position, Vec3::new(1.0, 0.0, 5.0));
    assert_relative_eq!(poi.noticed_at, 2.0);
}

#[rstest]
fn facing_the_noise_starts_the_walk(mut camp: CampRig) {
    camp.rig.controller.on_sound(&heard(Vec3::new(0.0, 0.0, 5.0), 1.0));
    camp.rig.controller.tick(1.0);
    assert_eq!(camp.rig.controller.state(), CamperState::MovingToPointOfInterest);
    assert_eq!(camp.rig.path.destination(), Some(Vec3::new(0.0, 0.0, 5.0)));
    assert_eq!(camp.rig.path.last_speed(), Some(MotionConfig::default().walk_speed));
}

#[rstest]
fn camper_turns_round_before_walking(mut camp: CampRig) {
    camp.rig.controller.on_sound(&heard(Vec3::new(0.0, 0.0, -5.0), 0.0));
    let mut now = 0.0;
    let mut ticks = 0;
    while camp.rig.controller.state() == CamperState::HeardSomething && ticks < 50 {
        camp.rig.controller.tick(now);
        now += 0.1;
        ticks += 1;
    }
    assert_eq!(camp.rig.controller.state(), CamperState::MovingToPointOfInterest);
    assert!(ticks > 2, "turning round should take several ticks");
    assert!(camp.rig.body.yaw().abs() > 160.0);
}

#[test]
fn camper_that_cannot_turn_still_forgets() {
    let mut camp = camp_with(CamperConfig {
        motion: MotionConfig {
            turn_rate: 0.001,
            ..MotionConfig::default()
        },
        ..camper_config()
    });
    camp.rig.controller.on_sound(&heard(Vec3::new(0.0, 0.0, -5.0), 0.0));
    camp.rig.controller.tick(0.0);
    camp.rig.controller.tick(5.5);
    assert_eq!(camp.rig.controller.state(), CamperState::ReturningToStart);
    assert_eq!(camp.rig.controller.alert(), AlertState::None);
    assert_eq!(camp.rig.path.destination(), Some(Vec3::ZERO));
}

#[rstest]
fn camper_investigates_then_goes_home(mut camp: CampRig) {
    let noise = Vec3::new(0.0, 0.0, 5.0);
    camp.rig.controller.on_sound(&heard(noise, 1.0));
    camp.rig.controller.tick(1.0);

    camp.rig.body.set_position(noise);
    camp.rig.controller.tick(3.0);
    assert_eq!(camp.rig.controller.state(), CamperState::AtPointOfInterest);
    assert_eq!(camp.rig.controller.alert(), AlertState::None);

    camp.rig.controller.tick(5.0);
    assert_eq!(camp.rig.controller.state(), CamperState::AtPointOfInterest);
    camp.rig.controller.tick(6.5);
    assert_eq!(camp.rig.controller.state(), CamperState::ReturningToStart);

    camp.rig.body.set_position(Vec3::new(0.2, 0.0, 0.0));
    camp.rig.controller.tick(8.0);
    assert_eq!(camp.rig.controller.state(), CamperState::Idling);
}

fn walking_camp() -> CampRig {
    camp_with(CamperConfig {
        waypoints: vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0)],
        ..camper_config()
    })
}

#[test]
fn walking_camper_loops_its_route() {
    let mut camp = walking_camp();
    assert_eq!(camp.rig.path.destination(), Some(Vec3::ZERO));
    camp.rig.controller.tick(0.0);
    assert_eq!(camp.rig.controller.state(), CamperState::Idling);
    assert_eq!(camp.rig.controller.role().waypoint_index(), 1);
    assert_eq!(camp.rig.path.destination(), Some(Vec3::new(0.0, 0.0, 6.0)));
    assert_eq!(camp.rig.path.last_speed(), Some(MotionConfig::default().walk_speed));

    camp.rig.body.set_position(Vec3::new(0.0, 0.0, 6.0));
    camp.rig.controller.tick(1.0);
    assert_eq!(camp.rig.controller.role().waypoint_index(), 0);
    assert_eq!(camp.rig.path.destination(), Some(Vec3::ZERO));
}

#[test]
fn walking_camper_resumes_its_route_after_investigating() {
    let mut camp = walking_camp();
    camp.rig.controller.tick(0.0);
    let noise = Vec3::new(0.0, 0.0, 3.0);
    camp.rig.controller.on_sound(&heard(noise, 1.0));
    camp.rig.controller.tick(1.0);
    assert_eq!(camp.rig.controller.state(), CamperState::MovingToPointOfInterest);

    camp.rig.body.set_position(noise);
    camp.rig.controller.tick(2.0);
    assert_eq!(camp.rig.controller.state(), CamperState::AtPointOfInterest);
    camp.rig.controller.tick(5.5);
    assert_eq!(camp.rig.controller.state(), CamperState::Idling);
    assert_eq!(camp.rig.controller.role().waypoint_index(), 1);
    assert_eq!(camp.rig.path.destination(), Some(Vec3::new(0.0, 0.0, 6.0)));
}

#[rstest]
fn stationary_camper_stays_put(mut camp: CampRig) {
    camp.rig.controller.tick(0.0);
    camp.rig.controller.tick(1.0);
    assert!(camp.rig.path.log().destinations.is_empty());
    assert_eq!(camp.rig.controller.state(), CamperState::Idling);
}

#[rstest]
fn pending_path_delays_arrival(mut camp: CampRig) {
    let noise = Vec3::new(0.0, 0.0, 5.0);
    camp.rig.controller.on_sound(&heard(noise, 1.0));
    camp.rig.controller.tick(1.0);
    camp.rig.body.set_position(noise);
    camp.rig.path.set_pending(true);
    camp.rig.controller.tick(1.5);
    assert_eq!(camp.rig.controller.state(), CamperState::MovingToPointOfInterest);
}

#[rstest]
fn body_faces_along_velocity(mut camp: CampRig) {
    camp.rig.path.set_velocity(Vec3::new(2.0, 0.0, 0.0));
    camp.rig.controller.tick(0.1);
    assert_relative_eq!(camp.rig.body.yaw(), 90.0, epsilon = 1e-4);
}

#[test]
fn contact_is_terminal_and_reported_once() {
    let mut sink = MockSink::new();
    sink.expect_notify_failure()
        .withf(|cause| cause.agent == AgentId(1) && cause.reason == FailureReason::Contact)
        .times(1)
        .return_const(());
    let body = BodyHandle::new(Body::default());
    let mut controller = Controller::spawn(
        AgentWiring {
            id: AgentId(1),
            body,
            path: Box::new(RecordingPath::default()),
            outcome: Rc::new(sink),
            alert_display: None,
        },
        Ranger::new(patrol_config()),
        0.0,
    );

    let touch = Contact {
        position: Vec3::ZERO,
        at: 1.0,
    };
    controller.on_contact(&touch);
    controller.on_contact(&touch);
    controller.on_sighting(&seen(Vec3::new(0.5, 0.0, 0.0), 1.2));
    controller.on_sound(&heard(Vec3::ONE, 1.3));
    controller.tick(5.0);
    assert_eq!(controller.state(), RangerState::Dead);
    assert_eq!(controller.alert(), AlertState::None);
}

#[rstest]
fn ranger_advances_to_next_waypoint(mut patrol: Rig<Ranger>) {
    assert_eq!(patrol.path.destination(), Some(Vec3::ZERO));
    patrol.controller.tick(0.0);
    assert_eq!(patrol.controller.role().waypoint_index(), 1);
    assert_eq!(patrol.path.destination(), Some(Vec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn patrol_wraps_round() {
    let mut rig = ranger_with(patrol_config());
    rig.controller.tick(0.0);
    rig.body.set_position(Vec3::new(10.0, 0.0, 0.0));
    rig.controller.tick(1.0);
    assert_eq!(rig.controller.role().waypoint_index(), 0);
    assert_eq!(rig.path.destination(), Some(Vec3::ZERO));
}

#[test]
fn ranger_without_waypoints_stands_still() {
    let mut rig = ranger_with(RangerConfig::default());
    rig.controller.tick(0.0);
    rig.controller.tick(1.0);
    assert!(rig.path.log().destinations.is_empty());
    assert_eq!(rig.controller.state(), RangerState::Patrolling);
}

#[rstest]
fn sighting_out_of_reach_starts_a_chase(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sighting(&seen(Vec3::new(4.0, 0.0, 0.0), 1.0));
    assert_eq!(patrol.controller.state(), RangerState::Chasing);
    assert_eq!(patrol.controller.alert(), AlertState::Exclamation);
    assert_eq!(patrol.path.destination(), Some(Vec3::new(4.0, 0.0, 0.0)));
    assert_eq!(patrol.path.last_speed(), Some(MotionConfig::default().run_speed));
}

#[rstest]
fn stale_chase_returns_to_patrol(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sighting(&seen(Vec3::new(4.0, 0.0, 0.0), 0.0));
    patrol.controller.tick(2.9);
    assert_eq!(patrol.controller.state(), RangerState::Chasing);
    patrol.controller.tick(4.0);
    assert_eq!(patrol.controller.state(), RangerState::Patrolling);
    assert_eq!(patrol.controller.alert(), AlertState::None);
    assert_eq!(patrol.path.destination(), Some(Vec3::ZERO));
}

#[rstest]
fn capture_succeeds_after_the_window(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.0));
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.5));
    patrol.controller.tick(1.0);
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 1.0));
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    patrol.controller.tick(1.1);
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 1.1));
    assert_eq!(patrol.controller.state(), RangerState::Dead);
    let failures = patrol.outcome.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures.iter().all(|cause| cause.reason == FailureReason::Captured));
}

#[rstest]
fn capture_needs_a_sighting_after_the_window(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.0));
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    patrol.controller.tick(0.5);
    patrol.controller.tick(1.1);
    assert!(!patrol.controller.is_dead(), "player slipped away before the window closed");
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    assert!(patrol.outcome.failures().is_empty());
}

#[rstest]
fn leaving_reach_resets_the_capture_clock(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.0));
    patrol.controller.on_sighting(&seen(Vec3::new(3.0, 0.0, 0.0), 0.6));
    assert_eq!(patrol.controller.state(), RangerState::Chasing);
    assert_eq!(patrol.controller.role().capture_started(), None);

    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.9));
    patrol.controller.tick(1.5);
    assert_eq!(patrol.controller.state(), RangerState::Capturing);
    patrol.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 2.0));
    assert_eq!(patrol.controller.state(), RangerState::Dead);
}

#[test]
fn capture_falls_back_to_chase_when_sightings_stop() {
    let mut rig = ranger_with(RangerConfig {
        seconds_to_remain_alerted: 0.5,
        capture_seconds: 5.0,
        ..patrol_config()
    });
    rig.controller.on_sighting(&seen(Vec3::new(1.0, 0.0, 0.0), 0.0));
    rig.controller.tick(0.7);
    assert_eq!(rig.controller.state(), RangerState::Chasing);
    assert!(rig.outcome.failures().is_empty());
}

#[rstest]
fn call_for_help_sends_ranger_running(mut patrol: Rig<Ranger>) {
    patrol.controller.call_for_help(Vec3::new(0.0, 0.0, 12.0), 1.0);
    assert_eq!(patrol.controller.state(), RangerState::MovingToPointOfInterest);
    assert_eq!(patrol.controller.alert(), AlertState::Question);
    assert_eq!(patrol.path.destination(), Some(Vec3::new(0.0, 0.0, 12.0)));
    assert_eq!(patrol.path.last_speed(), Some(MotionConfig::default().run_speed));
    let poi = patrol.controller.core().point_of_interest().expect("call remembered");
    assert_eq!(poi.lead, Lead::Called);
}

#[rstest]
#[case::chasing(Vec3::new(4.0, 0.0, 0.0), RangerState::Chasing)]
#[case::capturing(Vec3::new(1.0, 0.0, 0.0), RangerState::Capturing)]
fn pursuit_ignores_calls_and_sounds(
    mut patrol: Rig<Ranger>,
    #[case] player: Vec3,
    #[case] expected: RangerState,
) {
    patrol.controller.on_sighting(&seen(player, 1.0));
    patrol.controller.call_for_help(Vec3::new(0.0, 0.0, 12.0), 1.1);
    patrol.controller.on_sound(&heard(Vec3::new(0.0, 0.0, -3.0), 1.2));
    assert_eq!(patrol.controller.state(), expected);
    assert_eq!(patrol.path.destination(), Some(player));
}

#[rstest]
fn heard_ranger_ignores_calls(mut patrol: Rig<Ranger>) {
    patrol.controller.on_sound(&heard(Vec3::new(0.0, 0.0, -3.0), 1.0));
    patrol.controller.call_for_help(Vec3::new(0.0, 0.0, 12.0), 1.1);
    assert_eq!(patrol.controller.state(), RangerState::HeardSomething);
}

#[rstest]
fn ranger_investigation_returns_to_patrol(mut patrol: Rig<Ranger>) {
    let noise = Vec3::new(0.0, 0.0, 3.0);
    patrol.controller.on_sound(&heard(noise, 1.0));
    patrol.controller.tick(1.0);
    assert_eq!(patrol.controller.state(), RangerState::MovingToPointOfInterest);
    patrol.body.set_position(noise);
    patrol.controller.tick(2.0);
    assert_eq!(patrol.controller.state(), RangerState::AtPointOfInterest);
    patrol.controller.tick(5.5);
    assert_eq!(patrol.controller.state(), RangerState::Patrolling);
    assert_eq!(patrol.path.destination(), Some(Vec3::ZERO));
}

#[rstest]
#[case(CamperState::Idling, AlertState::None)]
#[case(CamperState::HeardSomething, AlertState::Question)]
#[case(CamperState::MovingToPointOfInterest, AlertState::Question)]
#[case(CamperState::AtPointOfInterest, AlertState::None)]
#[case(CamperState::ReturningToStart, AlertState::None)]
#[case(CamperState::Fleeing, AlertState::Exclamation)]
#[case(CamperState::AtSafeSpace, AlertState::None)]
#[case(CamperState::Dead, AlertState::None)]
fn camper_alert_projection(#[case] state: CamperState, #[case] alert: AlertState) {
    assert_eq!(state.alert(), alert);
}

#[rstest]
#[case(RangerState::Patrolling, AlertState::None)]
#[case(RangerState::HeardSomething, AlertState::Question)]
#[case(RangerState::MovingToPointOfInterest, AlertState::Question)]
#[case(RangerState::AtPointOfInterest, AlertState::None)]
#[case(RangerState::Chasing, AlertState::Exclamation)]
#[case(RangerState::Capturing, AlertState::Exclamation)]
#[case(RangerState::Dead, AlertState::None)]
fn ranger_alert_projection(#[case] state: RangerState, #[case] alert: AlertState) {
    assert_eq!(state.alert(), alert);
}

#[test]
fn configs_validate() {
    assert!(CamperConfig::default().validate().is_ok());
    assert!(RangerConfig::default().validate().is_ok());
    let bad = RangerConfig {
        capture_seconds: -1.0,
        ..RangerConfig::default()
    };
    assert!(bad.validate().is_err());
}
