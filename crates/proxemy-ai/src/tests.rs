#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use proxemy_core::cannon::BulletLaunch;
    use proxemy_core::enums::VesselState;
    use proxemy_core::interfaces::{Detector, Intersection, ObjectId};
    use proxemy_core::spatial::Spatial;

    use crate::profiles::{vessel_pattern, SteeringProfile, VesselProfile};
    use crate::steering::{BehaviorGroup, Obstacle, SteeringContext, SteeringState, Steerings, TargetFrame};
    use crate::vessel::{VesselBrain, VesselSenses};

    const DT: f64 = 1.0 / 60.0;
    const BOSS: ObjectId = ObjectId(1);
    const SELF: ObjectId = ObjectId(2);

    /// Detector returning a fixed boss hit distance and visibility.
    struct ScriptedDetector {
        boss_distance: Option<f64>,
        visible: bool,
    }

    impl Detector for ScriptedDetector {
        fn is_visible(&self, _object: ObjectId) -> bool {
            self.visible
        }
        fn is_occluded(&self, _object: ObjectId) -> bool {
            false
        }
        fn raycast(&self, _origin: DVec3, _direction: DVec3) -> Vec<Intersection> {
            Vec::new()
        }
        fn raycast_to_object(&self, origin: DVec3, direction: DVec3, object: ObjectId) -> Vec<Intersection> {
            self.boss_distance
                .map(|distance| {
                    vec![Intersection {
                        object,
                        distance,
                        point: origin + direction * distance,
                    }]
                })
                .unwrap_or_default()
        }
    }

    /// Player ship frame at (150, 0, 0) looking at the centre.
    fn ship_frame() -> TargetFrame {
        TargetFrame {
            position: DVec3::new(150.0, 0.0, 0.0),
            forward: DVec3::NEG_X,
            up: DVec3::Y,
            right: DVec3::NEG_Z,
        }
    }

    fn boss_obstacle() -> Obstacle {
        Obstacle {
            center: DVec3::ZERO,
            radius: 40.0,
        }
    }

    fn context(position: DVec3, visible: bool) -> SteeringContext<'static> {
        SteeringContext {
            position,
            target: ship_frame(),
            boss: None,
            neighbours: &[],
            visible,
        }
    }

    fn senses<'a>(detector: &'a ScriptedDetector, boss: bool) -> VesselSenses<'a> {
        VesselSenses {
            id: SELF,
            target: ship_frame(),
            boss: boss.then(|| (BOSS, boss_obstacle())),
            neighbours: &[],
            detector,
        }
    }

    fn senses_near<'a>(
        detector: &'a ScriptedDetector,
        boss: Option<(ObjectId, Obstacle)>,
        neighbours: &'a [DVec3],
    ) -> VesselSenses<'a> {
        VesselSenses {
            id: SELF,
            target: ship_frame(),
            boss,
            neighbours,
            detector,
        }
    }

    /// Avoidance a vessel at `position` would compute from scratch.
    fn expected_avoidance(position: DVec3, boss: Option<Obstacle>, neighbours: &[DVec3]) -> DVec3 {
        let mut steerings = Steerings::escort(VesselProfile::default().steering);
        steerings.compute_avoidance(&SteeringContext {
            position,
            target: ship_frame(),
            boss,
            neighbours,
            visible: true,
        })
    }

    // ---- Steering ----

    #[test]
    fn test_follow_intensity_ramp() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        // Follow point is 60 ahead of the ship: (90, 0, 0).
        let at_goal = steerings.compute_desired_velocity(&context(DVec3::new(90.0, 0.0, 0.0), true));
        assert_eq!(at_goal, DVec3::ZERO);
        assert_eq!(steerings.follow_intensity(), 0.0);

        let mid = steerings.compute_desired_velocity(&context(DVec3::new(90.0, 30.0, 0.0), true));
        assert!((steerings.follow_intensity() - 0.5).abs() < 1e-9);
        assert!((mid - DVec3::new(0.0, -0.5, 0.0)).length() < 1e-9, "Slows down near the goal");

        steerings.compute_desired_velocity(&context(DVec3::new(90.0, 300.0, 0.0), true));
        assert_eq!(steerings.follow_intensity(), 1.0);
    }

    #[test]
    fn test_follow_offset_moves_goal() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        steerings.set_follow_offset(DVec2::new(50.0, 0.0));
        // Right of the ship frame is -Z, so the goal is (90, 0, -50).
        steerings.compute_desired_velocity(&context(DVec3::new(90.0, 0.0, -50.0), true));
        assert_eq!(steerings.follow_intensity(), 0.0);
    }

    #[test]
    fn test_desired_velocity_is_clamped() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        let velocity = steerings.compute_desired_velocity(&context(DVec3::new(90.0, 100.0, 0.0), false));
        assert!((velocity.length() - 1.0).abs() < 1e-9, "Sum over 1 is clamped to 1");
        let visible = steerings.behavior_vector("stay_visible").unwrap();
        assert!(visible.length() > 0.99, "Out of view pulls toward the target");
    }

    #[test]
    fn test_avoid_boss_band() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        let mut at = |x: f64| {
            let ctx = SteeringContext {
                boss: Some(boss_obstacle()),
                ..context(DVec3::new(x, 0.0, 0.0), true)
            };
            steerings.compute_avoidance(&ctx)
        };
        assert_eq!(at(45.0), DVec3::X, "Full repulsion inside the band");
        assert!((at(60.0) - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-9, "Linear ramp");
        assert_eq!(at(80.0), DVec3::ZERO, "No repulsion beyond the band");
    }

    #[test]
    fn test_avoid_vessels_uses_strongest_intensity() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        let neighbours = [DVec3::new(3.0, 0.0, 0.0), DVec3::new(0.0, 12.5, 0.0)];
        let ctx = SteeringContext {
            neighbours: &neighbours,
            ..context(DVec3::ZERO, true)
        };
        let avoidance = steerings.compute_avoidance(&ctx);
        assert!((avoidance.length() - 1.0).abs() < 1e-9);
        let expected = DVec3::new(-1.0, -0.5, 0.0).normalize();
        assert!((avoidance - expected).length() < 1e-9, "Direction is the weighted sum");
    }

    #[test]
    fn test_coincident_neighbour_still_repels() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        let position = DVec3::new(10.0, 20.0, 30.0);
        let neighbours = [position];
        let ctx = SteeringContext {
            neighbours: &neighbours,
            ..context(position, true)
        };
        let avoidance = steerings.compute_avoidance(&ctx);
        assert!((avoidance.length() - 1.0).abs() < 1e-9, "Full repulsion below the band");
        assert_eq!(avoidance, DVec3::NEG_Z, "Falls back to the target's right");
    }

    #[test]
    fn test_avoidance_does_not_touch_desired_velocity() {
        let mut steerings = Steerings::escort(SteeringProfile::default());
        let ctx = SteeringContext {
            boss: Some(boss_obstacle()),
            ..context(DVec3::new(90.0, 0.0, 0.0), true)
        };
        assert_eq!(steerings.compute_desired_velocity(&ctx), DVec3::ZERO);
        assert_ne!(steerings.compute_avoidance(&ctx), DVec3::ZERO);
    }

    fn push_up(_state: &mut SteeringState, _ctx: &SteeringContext<'_>) -> DVec3 {
        DVec3::Y * 0.25
    }

    #[test]
    fn test_custom_behavior_registration() {
        let mut steerings = Steerings::new(SteeringProfile::default());
        steerings
            .add_behavior("up", BehaviorGroup::Behaviour, 2.0, push_up)
            .add_behavior("up", BehaviorGroup::Behaviour, 1.0, push_up);
        let velocity = steerings.compute_desired_velocity(&context(DVec3::ZERO, true));
        assert_eq!(velocity, DVec3::Y * 0.25, "Re-registering replaces the behaviour");
        assert!(steerings.remove_behavior("up"));
        assert!(!steerings.remove_behavior("up"));
        assert_eq!(steerings.compute_desired_velocity(&context(DVec3::ZERO, true)), DVec3::ZERO);
    }

    // ---- Vessel brain ----

    #[test]
    fn test_vessel_pattern_shape() {
        let pattern = vessel_pattern().unwrap();
        assert!((pattern.period() - 2.0).abs() < 1e-9);
        assert_eq!(pattern.shots().len(), 9);
    }

    #[test]
    fn test_brain_starts_in_detect() {
        let brain = VesselBrain::new(VesselProfile::default()).unwrap();
        assert_eq!(brain.state(), Some(VesselState::Detect));
        assert_eq!(brain.speed(), 60.0);
    }

    #[test]
    fn test_clear_line_goes_to_chase() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: None,
            visible: true,
        };
        let mut spatial = Spatial::new(DVec3::new(-50.0, 30.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut launches = Vec::new();
        brain.update(&mut spatial, &senses(&detector, true), &mut rng, DT, &mut launches);
        assert_eq!(brain.state(), Some(VesselState::Chase));
    }

    #[test]
    fn test_hit_beyond_target_goes_to_chase() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: Some(10_000.0),
            visible: true,
        };
        let mut spatial = Spatial::new(DVec3::new(-50.0, 30.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        brain.update(&mut spatial, &senses(&detector, true), &mut rng, DT, &mut Vec::new());
        assert_eq!(brain.state(), Some(VesselState::Chase), "Boss behind the target does not occlude");
    }

    #[test]
    fn test_occluded_target_goes_spherical_then_chase() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: Some(10.0),
            visible: true,
        };
        let mut spatial = Spatial::new(DVec3::new(-50.0, 30.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut launches = Vec::new();
        brain.update(&mut spatial, &senses(&detector, true), &mut rng, DT, &mut launches);
        assert_eq!(brain.state(), Some(VesselState::Spherical));
        assert!((brain.spherical_velocity().length() - 1.0).abs() < 1e-9, "Unit angular rate");

        let mut ticks = 0;
        while brain.state() == Some(VesselState::Spherical) && ticks < 600 {
            brain.update(&mut spatial, &senses(&detector, true), &mut rng, DT, &mut launches);
            ticks += 1;
        }
        assert_eq!(brain.state(), Some(VesselState::Chase), "Detour ends within 10 s");
        assert!(launches.is_empty(), "No shots during the detour");
    }

    #[test]
    fn test_avoidance_applies_while_detecting() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: None,
            visible: true,
        };
        let start = DVec3::new(-50.0, 30.0, 0.0);
        let neighbours = [start + DVec3::new(10.0, 0.0, 0.0)];
        let mut spatial = Spatial::new(start);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(brain.state(), Some(VesselState::Detect));
        brain.update(
            &mut spatial,
            &senses_near(&detector, None, &neighbours),
            &mut rng,
            DT,
            &mut Vec::new(),
        );

        let avoidance = expected_avoidance(start, None, &neighbours);
        assert!((avoidance - DVec3::new(-2.0 / 3.0, 0.0, 0.0)).length() < 1e-9);
        let expected = start + avoidance * DT * brain.speed();
        assert!(
            (spatial.position() - expected).length() < 1e-9,
            "Detection tick only moves by the avoidance nudge: {:?} != {expected:?}",
            spatial.position()
        );
        assert!(spatial.position().distance(neighbours[0]) > 10.0, "Pushed away from the neighbour");
    }

    #[test]
    fn test_avoidance_applies_while_sliding_on_sphere() {
        // Boss far away so only the neighbour repels.
        let boss = Obstacle {
            center: DVec3::new(0.0, -1000.0, 0.0),
            radius: 40.0,
        };
        let detector = ScriptedDetector {
            boss_distance: Some(10.0),
            visible: true,
        };
        let start = DVec3::new(-50.0, 30.0, 0.0);
        let mut alone = VesselBrain::new(VesselProfile::default()).unwrap();
        let mut crowded = VesselBrain::new(VesselProfile::default()).unwrap();
        let mut alone_spatial = Spatial::new(start);
        let mut crowded_spatial = Spatial::new(start);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let lone = senses_near(&detector, Some((BOSS, boss)), &[]);
        alone.update(&mut alone_spatial, &lone, &mut rng, DT, &mut Vec::new());
        crowded.update(&mut crowded_spatial, &lone, &mut rng, DT, &mut Vec::new());
        assert_eq!(crowded.state(), Some(VesselState::Spherical));
        assert_eq!(crowded_spatial.position(), alone_spatial.position());

        let neighbours = [crowded_spatial.position() + DVec3::new(0.0, 0.0, 15.0)];
        alone.update(&mut alone_spatial, &lone, &mut rng, DT, &mut Vec::new());
        crowded.update(
            &mut crowded_spatial,
            &senses_near(&detector, Some((BOSS, boss)), &neighbours),
            &mut rng,
            DT,
            &mut Vec::new(),
        );
        assert_eq!(crowded.state(), Some(VesselState::Spherical), "Still detouring");

        // Both slid identically; the crowded one was then nudged.
        let slid = alone_spatial.position();
        let avoidance = expected_avoidance(slid, Some(boss), &neighbours);
        assert!(avoidance.length() > 0.2, "Neighbour is inside the band");
        let expected = slid + avoidance * DT * crowded.speed();
        assert!((crowded_spatial.position() - expected).length() < 1e-9);
        assert!(
            crowded_spatial.position().distance(neighbours[0]) > slid.distance(neighbours[0]),
            "Pushed away from the neighbour"
        );
    }

    #[test]
    fn test_chase_to_aim_fires_and_speeds_up() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: None,
            visible: true,
        };
        // Sitting on the follow point.
        let mut spatial = Spatial::new(DVec3::new(90.0, 0.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut launches: Vec<BulletLaunch> = Vec::new();

        brain.update(&mut spatial, &senses(&detector, false), &mut rng, DT, &mut launches);
        assert_eq!(brain.state(), Some(VesselState::Chase));
        brain.update(&mut spatial, &senses(&detector, false), &mut rng, DT, &mut launches);
        assert_eq!(brain.state(), Some(VesselState::Aim));
        assert_eq!(brain.speed(), 120.0, "Aiming doubles the speed");

        assert_eq!(launches.len(), 3, "First volley of the burst");
        for launch in &launches {
            assert!((launch.velocity - DVec3::new(200.0, 0.0, 0.0)).length() < 1e-6);
        }

        // The detection timer sends the vessel back through Chase, which resets the speed.
        let mut ticks = 0;
        while brain.state() == Some(VesselState::Aim) && ticks < 60 {
            brain.update(&mut spatial, &senses(&detector, false), &mut rng, DT, &mut launches);
            ticks += 1;
        }
        assert_eq!(brain.state(), Some(VesselState::Chase));
        assert_eq!(brain.speed(), 60.0, "Speed does not compound across cycles");
    }

    #[test]
    fn test_aim_mirrors_target_frame() {
        let mut brain = VesselBrain::new(VesselProfile::default()).unwrap();
        let detector = ScriptedDetector {
            boss_distance: None,
            visible: true,
        };
        let mut spatial = Spatial::new(DVec3::new(90.0, 0.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..2 {
            brain.update(&mut spatial, &senses(&detector, false), &mut rng, DT, &mut Vec::new());
        }
        assert_eq!(brain.state(), Some(VesselState::Aim));
        assert_eq!(spatial.up(), DVec3::Y);
        assert_eq!(spatial.right(), DVec3::Z, "Right mirrors the target's");
        let facing = spatial.orientation() * DVec3::Z;
        assert!((facing - DVec3::X).length() < 1e-9, "Faces the target");
    }
}
