//! Iterative contact solver and semi-implicit Euler integration.
//!
//! Contacts are relaxed Gauss-Seidel style: a fixed number of sweeps over
//! the equation list, each sweep computing and applying a non-negative
//! normal impulse per contact. The solver always halts after the configured
//! sweep count; leftover penetration is tolerated for a step and bled off
//! by the Baumgarte bias on following steps.

use glam::{Quat, Vec3};
use tumble_geom::EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::narrowphase::ContactEquation;

/// Solver tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepSettings {
    /// Number of Gauss-Seidel sweeps over the contact list.
    pub iterations: u32,
    /// Baumgarte coefficient: fraction of penetration error fed back as
    /// velocity bias each step.
    pub baumgarte: f32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            iterations: 20,
            baumgarte: 0.2,
        }
    }
}

/// Integrates gravity and accumulated forces into velocities.
pub(crate) fn integrate_forces(bodies: &mut [Body], gravity: Vec3, dt: f32) {
    for body in bodies {
        if body.is_static() {
            continue;
        }
        body.velocity += (gravity + body.force * body.inv_mass) * dt;
        body.angular_velocity += body.inv_inertia_world() * body.torque * dt;
    }
}

/// Relaxes all contact equations against the current velocities.
pub(crate) fn solve_contacts(
    bodies: &mut [Body],
    contacts: &[ContactEquation],
    dt: f32,
    settings: &StepSettings,
) {
    for _ in 0..settings.iterations {
        for contact in contacts {
            // Narrow phase orders each equation's bodies by id, so the
            // split point is always contact.body2.
            let (head, tail) = bodies.split_at_mut(contact.body2.index());
            let b1 = &mut head[contact.body1.index()];
            let b2 = &mut tail[0];

            let inv_i1 = b1.inv_inertia_world();
            let inv_i2 = b2.inv_inertia_world();
            let ni = contact.ni;

            let v_rel = (b2.velocity + b2.angular_velocity.cross(contact.rj)
                - b1.velocity
                - b1.angular_velocity.cross(contact.ri))
            .dot(ni);

            let m_eff = b1.inv_mass
                + b2.inv_mass
                + ni.dot((inv_i1 * contact.ri.cross(ni)).cross(contact.ri))
                + ni.dot((inv_i2 * contact.rj.cross(ni)).cross(contact.rj));
            if m_eff <= EPSILON {
                continue;
            }

            // Positional bias: feed a fraction of the penetration back as
            // separating velocity; non-penetrating contacts get none.
            let bias = -settings.baumgarte * contact.depth.min(0.0) / dt;
            let lambda = ((-v_rel + bias) / m_eff).max(0.0);
            let impulse = ni * lambda;

            b1.velocity -= impulse * b1.inv_mass;
            b1.angular_velocity -= inv_i1 * contact.ri.cross(impulse);
            b2.velocity += impulse * b2.inv_mass;
            b2.angular_velocity += inv_i2 * contact.rj.cross(impulse);
        }
    }
}

/// Integrates velocities into poses and clears force accumulators.
pub(crate) fn integrate_poses(bodies: &mut [Body], dt: f32) {
    for body in bodies {
        if !body.is_static() {
            body.position += body.velocity * dt;

            let w = body.angular_velocity;
            let q = body.rotation;
            let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q * 0.5 * dt;
            body.rotation = (q + dq).normalize();
        }
        body.clear_forces();
    }
}
