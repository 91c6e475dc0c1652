//! Analytic inverse kinematics for the planar two-link arm.
//!
//! Uses the law of cosines for the elbow angle and the elbow-up branch
//! (non-negative `sin θ2`) only. Targets outside the reachable annulus have
//! no solution; that is an expected outcome, reported as `None`.

use twolink_core::{ArmGeometry, JointAngles, TargetPoint};

use crate::chain::{ArmPose, forward_kinematics};

/// Closed-form two-link IK solver bound to one [`ArmGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicsSolver {
    geometry: ArmGeometry,
}

impl KinematicsSolver {
    /// Create a solver for the given geometry.
    #[must_use]
    pub const fn new(geometry: ArmGeometry) -> Self {
        Self { geometry }
    }

    /// The geometry this solver was built with.
    #[must_use]
    pub const fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    /// Whether `(x, y)` lies in the closed annulus `[min_reach, max_reach]`,
    /// up to the rounding slack of [`ArmGeometry::contains`].
    #[must_use]
    pub fn is_reachable(&self, x: f64, y: f64) -> bool {
        self.geometry.contains(TargetPoint::new(x, y))
    }

    /// Solve for the joint angles placing the end-effector at `(x, y)`.
    ///
    /// Returns `None` when the target is unreachable or not finite.
    #[must_use]
    pub fn solve(&self, x: f64, y: f64) -> Option<JointAngles> {
        if !self.is_reachable(x, y) {
            return None;
        }

        let l1 = self.geometry.segment1_length();
        let l2 = self.geometry.segment2_length();
        let d_sq = x.mul_add(x, y * y);

        // Rounding can push the cosine just past ±1 on the annulus edges.
        let cos_theta2 = ((d_sq - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
        let sin_theta2 = cos_theta2.mul_add(-cos_theta2, 1.0).max(0.0).sqrt();
        let theta2 = sin_theta2.atan2(cos_theta2);

        let theta1 = y.atan2(x) - (l2 * sin_theta2).atan2(l2.mul_add(cos_theta2, l1));

        Some(JointAngles::new(theta1, theta2))
    }

    /// [`solve`](Self::solve) for a [`TargetPoint`].
    #[must_use]
    pub fn solve_point(&self, target: TargetPoint) -> Option<JointAngles> {
        self.solve(target.x, target.y)
    }

    /// Forward kinematics under this solver's geometry.
    #[must_use]
    pub fn forward(&self, angles: JointAngles) -> ArmPose {
        forward_kinematics(&self.geometry, angles)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use approx::assert_abs_diff_eq;
    use twolink_test_utils::{
        default_geometry, random_elbow_up_angles, random_point, random_reachable_point,
        seeded_rng,
    };

    use super::*;

    fn default_solver() -> KinematicsSolver {
        KinematicsSolver::new(default_geometry())
    }

    /// Difference between two angles wrapped into `(-π, π]`.
    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        if d > PI { d - TAU } else { d }
    }

    fn assert_reaches(solver: &KinematicsSolver, x: f64, y: f64) {
        let angles = solver
            .solve(x, y)
            .unwrap_or_else(|| panic!("({x}, {y}) should be reachable"));
        let pose = solver.forward(angles);
        let tol = 1e-9 * x.hypot(y).max(1.0);
        assert_abs_diff_eq!(pose.effector.x, x, epsilon = tol);
        assert_abs_diff_eq!(pose.effector.y, y, epsilon = tol);
    }

    // ---- concrete cases ----

    #[test]
    fn reachable_point_on_axis() {
        let solver = default_solver();
        assert_reaches(&solver, 50.0, 0.0);
    }

    #[test]
    fn far_point_is_unreachable() {
        assert_eq!(default_solver().solve(200.0, 0.0), None);
    }

    #[test]
    fn near_point_is_unreachable() {
        assert_eq!(default_solver().solve(5.0, 0.0), None);
    }

    #[test]
    fn origin_is_unreachable_for_unequal_segments() {
        assert_eq!(default_solver().solve(0.0, 0.0), None);
    }

    #[test]
    fn non_finite_target_is_unreachable() {
        let solver = default_solver();
        assert_eq!(solver.solve(f64::NAN, 1.0), None);
        assert_eq!(solver.solve(20.0, f64::INFINITY), None);
    }

    // ---- reachability boundary ----

    #[test]
    fn outer_boundary_is_inclusive() {
        let solver = default_solver();
        let angles = solver.solve(90.0, 0.0).unwrap();
        assert_abs_diff_eq!(angles.theta1, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles.theta2, 0.0, epsilon = 1e-12);

        for (x, y) in [(0.0, 90.0), (-90.0, 0.0), (0.0, -90.0)] {
            assert_reaches(&solver, x, y);
        }
    }

    #[test]
    fn inner_boundary_is_inclusive() {
        let solver = default_solver();
        let angles = solver.solve(10.0, 0.0).unwrap();
        assert_abs_diff_eq!(angles.theta2, PI, epsilon = 1e-12);
        assert_abs_diff_eq!(angles.theta1, 0.0, epsilon = 1e-12);

        for (x, y) in [(0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)] {
            assert_reaches(&solver, x, y);
        }
    }

    #[test]
    fn just_outside_boundaries_is_unreachable() {
        let solver = default_solver();
        assert_eq!(solver.solve(90.0 + 1e-9, 0.0), None);
        assert_eq!(solver.solve(0.0, 10.0 - 1e-9), None);
    }

    #[test]
    fn boundary_cosine_is_clamped() {
        // Off-axis points exactly on both circles: |(54, 72)| = 90, |(6, 8)| = 10.
        let solver = default_solver();
        let outer = solver.solve(54.0, 72.0).expect("outer circle is reachable");
        assert!(outer.theta1.is_finite());
        assert_abs_diff_eq!(outer.theta2, 0.0, epsilon = 1e-6);
        assert_reaches(&solver, 54.0, 72.0);

        let inner = solver.solve(6.0, 8.0).expect("inner circle is reachable");
        assert!(inner.theta1.is_finite());
        assert_abs_diff_eq!(inner.theta2, PI, epsilon = 1e-6);
        assert_reaches(&solver, 6.0, 8.0);
    }

    #[test]
    fn solution_iff_inside_annulus() {
        let solver = default_solver();
        let mut rng = seeded_rng(7);
        for _ in 0..2_000 {
            let p = random_point(&mut rng, 120.0);
            let (x, y) = (p.x, p.y);
            let d = p.norm();
            let inside = (10.0..=90.0).contains(&d);
            assert_eq!(solver.solve(x, y).is_some(), inside, "({x}, {y}) d={d}");
        }
    }

    // ---- elbow-up convention ----

    #[test]
    fn elbow_angle_is_never_negative() {
        let solver = default_solver();
        let mut rng = seeded_rng(11);
        for _ in 0..500 {
            let target = random_reachable_point(&mut rng, solver.geometry(), 1e-6);
            let angles = solver.solve_point(target).expect("inside the annulus");
            assert!((0.0..=PI).contains(&angles.theta2));
        }
    }

    // ---- round trip ----

    #[test]
    fn roundtrip_angles_fk_ik() {
        let solver = default_solver();
        let mut rng = seeded_rng(42);
        for _ in 0..1_000 {
            let angles = random_elbow_up_angles(&mut rng, 0.05);
            let (theta1, theta2) = (angles.theta1, angles.theta2);
            let pose = solver.forward(angles);

            let solved = solver
                .solve(pose.effector.x, pose.effector.y)
                .expect("FK output must be reachable");
            assert_abs_diff_eq!(angle_diff(solved.theta1, theta1), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(solved.theta2, theta2, epsilon = 1e-9);
        }
    }

    #[test]
    fn roundtrip_stretched_and_folded_elbow() {
        // Recovering θ2 from cos θ2 loses about sqrt(ε) near 0 and π, so the
        // angles get a looser bound there; the effector position does not.
        let solver = default_solver();
        for theta2 in [0.0, 1e-8, PI - 1e-8, PI] {
            for theta1 in [-3.0, -1.0, 0.0, 0.3, 1.0, 2.5, 3.1] {
                let pose = solver.forward(JointAngles::new(theta1, theta2));
                let (x, y) = (pose.effector.x, pose.effector.y);
                let solved = solver
                    .solve(x, y)
                    .unwrap_or_else(|| panic!("θ1={theta1} θ2={theta2} should round-trip"));

                assert!((0.0..=PI).contains(&solved.theta2));
                assert_abs_diff_eq!(solved.theta2, theta2, epsilon = 1e-6);
                assert_abs_diff_eq!(angle_diff(solved.theta1, theta1), 0.0, epsilon = 1e-6);

                let back = solver.forward(solved);
                assert_abs_diff_eq!(back.effector.x, x, epsilon = 1e-9);
                assert_abs_diff_eq!(back.effector.y, y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn roundtrip_points_ik_fk() {
        let solver = KinematicsSolver::new(ArmGeometry::new(120.0, 35.5).unwrap());
        let mut rng = seeded_rng(3);
        for _ in 0..1_000 {
            let p = random_reachable_point(&mut rng, solver.geometry(), 1e-6);
            assert_reaches(&solver, p.x, p.y);
        }
    }

    #[test]
    fn solve_is_deterministic() {
        let solver = default_solver();
        assert_eq!(solver.solve(-30.0, 25.0), solver.solve(-30.0, 25.0));
        assert_eq!(
            solver.solve_point(TargetPoint::new(-30.0, 25.0)),
            solver.solve(-30.0, 25.0)
        );
    }
}
