#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use glam::{DQuat, DVec3};

    use crate::aabb::Aabb;
    use crate::body::CollisionBody;
    use crate::oriented_box::OrientedBox;
    use crate::sphere::Sphere;

    fn cube(position: DVec3) -> OrientedBox {
        OrientedBox::new(position, DVec3::splat(2.0), DQuat::IDENTITY)
    }

    fn rotated_cube(position: DVec3) -> OrientedBox {
        OrientedBox::new(position, DVec3::splat(2.0), DQuat::from_rotation_z(FRAC_PI_4))
    }

    // ---- Box / Box ----

    #[test]
    fn test_axis_aligned_boxes_apart() {
        let mut a = cube(DVec3::ZERO);
        let mut b = cube(DVec3::new(3.0, 0.0, 0.0));
        assert!(!a.collides_with(&mut b), "Boxes 3 apart with size 2 must not collide");
    }

    #[test]
    fn test_axis_aligned_boxes_overlapping() {
        let mut a = cube(DVec3::ZERO);
        let mut b = cube(DVec3::new(1.0, 0.0, 0.0));
        assert!(a.collides_with(&mut b));
        assert!(b.collides_with(&mut a), "Test must be symmetric");
    }

    #[test]
    fn test_rotated_box_touching_along_axis() {
        let mut a = cube(DVec3::ZERO);
        let mut b = rotated_cube(DVec3::new(2.3, 0.0, 0.0));
        assert!(a.collides_with(&mut b), "Rotated corner reaches x = 0.886");

        let mut c = rotated_cube(DVec3::new(2.5, 0.0, 0.0));
        assert!(!a.collides_with(&mut c), "Rotated corner stops at x = 1.086");
    }

    #[test]
    fn test_rotated_box_corner_overlap() {
        let mut a = cube(DVec3::ZERO);
        let mut b = rotated_cube(DVec3::new(1.6, 1.6, 0.0));
        assert!(a.collides_with(&mut b), "Rotated face should cut the corner");
    }

    #[test]
    fn test_rotated_box_separated_by_diagonal_axis() {
        let mut a = cube(DVec3::ZERO);
        let mut b = rotated_cube(DVec3::new(1.9, 1.9, 0.0));
        assert!(
            a.bounding_box().intersects(&b.bounding_box()),
            "Bounding boxes overlap, so only the SAT can reject this pair"
        );
        assert!(!a.collides_with(&mut b), "Diagonal axis separates the boxes");
    }

    #[test]
    fn test_box_derived_state_is_lazy() {
        let mut b = cube(DVec3::ZERO);
        assert!(b.is_dirty());
        b.ensure_not_dirty();
        assert!(!b.is_dirty());

        b.set_position(DVec3::new(10.0, 0.0, 0.0));
        assert!(b.is_dirty(), "Moving must flag the derived geometry");
        let bounds = b.bounding_box();
        assert!(!b.is_dirty());
        assert_eq!(bounds.min, DVec3::new(9.0, -1.0, -1.0));
        assert_eq!(bounds.max, DVec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_box_edges_follow_orientation() {
        let mut b = OrientedBox::new(
            DVec3::ZERO,
            DVec3::new(4.0, 2.0, 2.0),
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
        );
        let edges = *b.edges();
        assert!((edges[0] - DVec3::Y).length() < 1e-9, "X axis rotated onto Y");
        let corners = *b.corners();
        let max_y = corners.iter().map(|c| c.y).fold(f64::MIN, f64::max);
        assert!((max_y - 2.0).abs() < 1e-9, "Long side now spans Y");
    }

    #[test]
    fn test_intersects_without_refresh_uses_current_geometry() {
        let mut a = cube(DVec3::ZERO);
        let mut b = cube(DVec3::new(1.0, 0.0, 0.0));
        a.ensure_not_dirty();
        b.ensure_not_dirty();
        b.set_position(DVec3::new(5.0, 0.0, 0.0));
        assert!(!a.intersects(&b), "Stale cache must not be used after a move");
    }

    // ---- Sphere ----

    #[test]
    fn test_sphere_sphere() {
        let a = Sphere::new(DVec3::ZERO, 1.0);
        let b = Sphere::new(DVec3::new(2.0, 0.0, 0.0), 1.0);
        let c = Sphere::new(DVec3::new(2.1, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b), "Touching spheres collide");
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_sphere_box_clamp() {
        let b = OrientedBox::new(DVec3::ZERO, DVec3::splat(4.0), DQuat::IDENTITY);
        let far = Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0);
        let near = Sphere::new(DVec3::new(2.5, 0.0, 0.0), 1.0);
        assert!(!far.intersects_box(&b), "Gap of 2 must not collide");
        assert!(near.intersects_box(&b), "Overlap of 0.5 must collide");
    }

    #[test]
    fn test_sphere_box_uses_box_local_frame() {
        // Long thin box rotated onto the Y axis.
        let b = OrientedBox::new(
            DVec3::ZERO,
            DVec3::new(20.0, 1.0, 1.0),
            DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
        );
        let above = Sphere::new(DVec3::new(0.0, 9.0, 0.0), 1.0);
        let beside = Sphere::new(DVec3::new(9.0, 0.0, 0.0), 1.0);
        assert!(above.intersects_box(&b));
        assert!(!beside.intersects_box(&b));
    }

    #[test]
    fn test_sphere_bounds_mirror_position() {
        let mut s = Sphere::new(DVec3::new(1.0, 2.0, 3.0), 2.0);
        let bounds = s.bounding_box();
        assert_eq!(bounds, Aabb::new(DVec3::new(-1.0, 0.0, 1.0), DVec3::new(3.0, 4.0, 5.0)));
    }

    // ---- Tagged body ----

    #[test]
    fn test_body_dispatch_is_order_independent() {
        let mut sphere = CollisionBody::sphere(DVec3::new(2.5, 0.0, 0.0), 1.0);
        let mut cuboid = CollisionBody::cuboid(DVec3::ZERO, DVec3::splat(4.0), DQuat::IDENTITY);
        assert!(sphere.collides_with(&mut cuboid));
        assert!(cuboid.collides_with(&mut sphere));
    }

    #[test]
    fn test_body_orientation_ignored_by_sphere() {
        let mut body = CollisionBody::sphere(DVec3::ZERO, 1.0);
        body.ensure_not_dirty();
        body.set_orientation(DQuat::from_rotation_x(1.0));
        assert!(!body.is_dirty());
    }

    #[test]
    fn test_ray_distances() {
        let sphere = CollisionBody::sphere(DVec3::new(10.0, 0.0, 0.0), 2.0);
        let hit = sphere.ray_distance(DVec3::ZERO, DVec3::X);
        assert!((hit.unwrap_or_default() - 8.0).abs() < 1e-9);
        assert!(sphere.ray_distance(DVec3::ZERO, -DVec3::X).is_none());

        let cuboid = CollisionBody::cuboid(DVec3::new(0.0, 10.0, 0.0), DVec3::splat(2.0), DQuat::IDENTITY);
        let hit = cuboid.ray_distance(DVec3::ZERO, DVec3::Y);
        assert!((hit.unwrap_or_default() - 9.0).abs() < 1e-9);
        assert!(cuboid.ray_distance(DVec3::ZERO, DVec3::X).is_none());
    }
}
