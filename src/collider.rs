use glam::Vec3;

use crate::PhysicsError;
use crate::RigidBody;

/// # Collider
///
/// Shape attached to a body, centered on the body origin and rotated with it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Collider {
    /// Solid sphere.
    Sphere {
        /// Radius of the sphere.
        radius: f32,
    },
    /// Solid box.
    Cuboid {
        /// Half of the box size along each local axis.
        half_extents: Vec3,
    },
}

impl Collider {
    /// Returns a sphere collider.
    pub const fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Returns a box collider.
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Self::Cuboid { half_extents }
    }

    /// Returns the radius of a sphere around the body origin that contains the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Collider::Sphere { radius } => *radius,
            Collider::Cuboid { half_extents } => half_extents.length(),
        }
    }

    /// Sets the inertia tensor of the body for this shape using the current body mass.
    pub fn apply_inertia(&self, body: &mut RigidBody) {
        match self {
            Collider::Sphere { .. } => body.set_sphere_inertia(),
            Collider::Cuboid { half_extents } => body.set_box_inertia(*half_extents),
        }
    }

    /// Returns the contacts between the shape carried by `body` and `plane`.
    pub fn plane_contacts(&self, body: &RigidBody, plane: &Plane) -> Vec<Contact> {
        match self {
            Collider::Sphere { radius } => {
                let center = body.lin_position();
                let depth = radius - plane.distance_to(center);
                if depth > 0.0 {
                    vec![Contact {
                        point: center - plane.normal * *radius,
                        normal: plane.normal,
                        depth,
                    }]
                } else {
                    Vec::new()
                }
            }
            Collider::Cuboid { half_extents } => {
                let transform = body.transform();
                corners(*half_extents)
                    .into_iter()
                    .map(|corner| transform.transform_point3(corner))
                    .filter_map(|point| {
                        let depth = -plane.distance_to(point);
                        (depth > 0.0).then_some(Contact {
                            point,
                            normal: plane.normal,
                            depth,
                        })
                    })
                    .collect()
            }
        }
    }
}

fn corners(half_extents: Vec3) -> [Vec3; 8] {
    let Vec3 { x, y, z } = half_extents;
    [
        Vec3::new(-x, -y, -z),
        Vec3::new(x, -y, -z),
        Vec3::new(-x, y, -z),
        Vec3::new(x, y, -z),
        Vec3::new(-x, -y, z),
        Vec3::new(x, -y, z),
        Vec3::new(-x, y, z),
        Vec3::new(x, y, z),
    ]
}

/// # Plane
///
/// Immovable surface made of the points `p` where `p.dot(normal) == distance`. The side the
/// normal points to is open space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    /// Unit surface normal.
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along the normal.
    pub distance: f32,
}

impl Plane {
    /// The `y = 0` plane facing up.
    pub const GROUND: Self = Self {
        normal: Vec3::Y,
        distance: 0.0,
    };

    /// Returns a plane with the given normal, normalized, and distance from the origin.
    pub fn new(normal: Vec3, distance: f32) -> Result<Self, PhysicsError> {
        let length = normal.length();
        if !length.is_finite() || length == 0.0 || !distance.is_finite() {
            return Err(PhysicsError::InvalidNormal);
        }

        Ok(Self {
            normal: normal / length,
            distance,
        })
    }

    /// Returns the signed distance from the plane to `point`, positive on the open side.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        point.dot(self.normal) - self.distance
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::GROUND
    }
}

/// # Contact
///
/// A point where a body touches another object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Contact point in world space.
    pub point: Vec3,
    /// Unit normal pointing from the other object toward the body.
    pub normal: Vec3,
    /// Penetration depth along the normal.
    pub depth: f32,
}

/// Returns the contact between two bodies approximated by their bounding spheres. The normal
/// points from `b` toward `a`.
pub(crate) fn sphere_contact(
    a: &RigidBody,
    a_collider: &Collider,
    b: &RigidBody,
    b_collider: &Collider,
) -> Option<Contact> {
    let a_radius = a_collider.bounding_radius();
    let b_radius = b_collider.bounding_radius();
    let offset = a.lin_position() - b.lin_position();
    let distance = offset.length();
    let depth = a_radius + b_radius - distance;
    if depth <= 0.0 {
        return None;
    }

    // Coincident centers have no preferred direction.
    let normal = if distance > 0.0 {
        offset / distance
    } else {
        Vec3::Y
    };

    let a_surface = a.lin_position() - normal * a_radius;
    let b_surface = b.lin_position() + normal * b_radius;

    Some(Contact {
        point: (a_surface + b_surface) * 0.5,
        normal,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use approx::assert_abs_diff_eq;
    use glam::Mat4;
    use glam::Quat;

    use super::*;

    fn body_at(position: Vec3) -> RigidBody {
        let mut body = RigidBody::new();
        body.set_position(position);
        body
    }

    #[test]
    fn plane_new_normalizes_normal() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), 1.0).unwrap();

        assert_eq!(plane.normal, Vec3::Y);
        assert_eq!(plane.distance, 1.0);
    }

    #[test]
    fn plane_new_zero_normal_returns_error() {
        let plane = Plane::new(Vec3::ZERO, 0.0);

        assert_eq!(plane, Err(PhysicsError::InvalidNormal));
    }

    #[test]
    fn plane_distance_to_returns_signed_distance() {
        let plane = Plane::new(Vec3::Y, 1.0).unwrap();

        assert_eq!(plane.distance_to(Vec3::new(5.0, 3.0, 0.0)), 2.0);
        assert_eq!(plane.distance_to(Vec3::new(5.0, -1.0, 0.0)), -2.0);
    }

    #[test]
    fn bounding_radius_cuboid_returns_half_diagonal() {
        let collider = Collider::cuboid(Vec3::new(1.0, 2.0, 2.0));

        assert_eq!(collider.bounding_radius(), 3.0);
    }

    #[test]
    fn apply_inertia_cuboid_sets_box_tensor() {
        let mut body = RigidBody::new();
        body.set_mass(12.0);

        let collider = Collider::cuboid(Vec3::new(1.0, 2.0, 3.0));
        collider.apply_inertia(&mut body);

        assert_eq!(
            body.object_inertia(),
            glam::Mat3::from_diagonal(Vec3::new(13.0, 10.0, 5.0))
        );
    }

    #[test]
    fn sphere_above_plane_contacts_returns_empty() {
        let body = body_at(Vec3::new(0.0, 2.0, 0.0));

        let contacts = Collider::sphere(1.0).plane_contacts(&body, &Plane::GROUND);

        assert!(contacts.is_empty());
    }

    #[test]
    fn sphere_into_plane_contacts_returns_deepest_point() {
        let body = body_at(Vec3::new(3.0, 0.75, 0.0));

        let contacts = Collider::sphere(1.0).plane_contacts(&body, &Plane::GROUND);

        assert_eq!(
            contacts,
            vec![Contact {
                point: Vec3::new(3.0, -0.25, 0.0),
                normal: Vec3::Y,
                depth: 0.25,
            }]
        );
    }

    #[test]
    fn flat_cuboid_into_plane_contacts_returns_bottom_corners() {
        let body = body_at(Vec3::new(0.0, 0.5, 0.0));

        let contacts = Collider::cuboid(Vec3::ONE).plane_contacts(&body, &Plane::GROUND);

        assert_eq!(contacts.len(), 4);
        for contact in contacts {
            assert_abs_diff_eq!(contact.point.y, -0.5, epsilon = 1e-6);
            assert_abs_diff_eq!(contact.depth, 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn tilted_cuboid_into_plane_contacts_returns_lowest_edge() {
        let mut body = RigidBody::new();
        body.set_transform(&Mat4::from_rotation_translation(
            Quat::from_rotation_z(FRAC_PI_4),
            Vec3::new(0.0, 1.3, 0.0),
        ));

        let contacts = Collider::cuboid(Vec3::ONE).plane_contacts(&body, &Plane::GROUND);

        // The lowest edge sits sqrt(2) below the center.
        assert_eq!(contacts.len(), 2);
        for contact in contacts {
            assert_abs_diff_eq!(contact.point.x, 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(contact.depth, 2f32.sqrt() - 1.3, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_contact_separated_returns_none() {
        let a = body_at(Vec3::new(0.0, 3.0, 0.0));
        let b = body_at(Vec3::ZERO);

        let contact = sphere_contact(&a, &Collider::sphere(1.0), &b, &Collider::sphere(1.0));

        assert_eq!(contact, None);
    }

    #[test]
    fn sphere_contact_overlapping_returns_normal_toward_first() {
        let a = body_at(Vec3::new(0.0, 1.5, 0.0));
        let b = body_at(Vec3::ZERO);

        let contact = sphere_contact(&a, &Collider::sphere(1.0), &b, &Collider::sphere(1.0));

        assert_eq!(
            contact,
            Some(Contact {
                point: Vec3::new(0.0, 0.75, 0.0),
                normal: Vec3::Y,
                depth: 0.5,
            })
        );
    }
}
