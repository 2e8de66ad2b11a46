use glam::Mat3;
use glam::Mat4;
use glam::Quat;
use glam::Vec3;

/// # Rigid Body
///
/// A free body with six degrees of freedom.
///
/// Momentum is the integrated state. Linear and angular velocity are always derived from it, so
/// they are only exposed through accessors and the setters that keep both in step.
///
/// The body performs no validation: a zero mass or a singular inertia tensor turns the state into
/// NaN or infinity instead of producing an error. Hardening belongs to the owner of the body (see
/// [crate::World::insert]).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RigidBody {
    /// Force accumulated for the current tick.
    pub force: Vec3,
    /// Torque accumulated for the current tick.
    pub torque: Vec3,
    /// Collision restitution, nominally in `[0, 1]`.
    pub restitution: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,

    object_inertia: Mat3,
    inv_object_inertia: Mat3,
    inv_world_inertia: Mat3,

    lin_velocity: Vec3,
    lin_position: Vec3,
    lin_momentum: Vec3,

    ang_velocity: Vec3,
    ang_momentum: Vec3,
    ang_position: Quat,

    center_of_mass: Vec3,
    world_center_of_mass: Vec3,

    mass: f32,
    one_over_mass: f32,

    at_rest: bool,
}

impl RigidBody {
    /// Returns a unit mass body at the origin with identity orientation and inertia.
    pub const fn new() -> Self {
        Self {
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            restitution: 0.3,
            friction: 0.5,
            object_inertia: Mat3::IDENTITY,
            inv_object_inertia: Mat3::IDENTITY,
            inv_world_inertia: Mat3::IDENTITY,
            lin_velocity: Vec3::ZERO,
            lin_position: Vec3::ZERO,
            lin_momentum: Vec3::ZERO,
            ang_velocity: Vec3::ZERO,
            ang_momentum: Vec3::ZERO,
            ang_position: Quat::IDENTITY,
            center_of_mass: Vec3::ZERO,
            world_center_of_mass: Vec3::ZERO,
            mass: 1.0,
            one_over_mass: 1.0,
            at_rest: false,
        }
    }

    /// Returns the mass.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Returns the cached reciprocal of the mass.
    pub fn one_over_mass(&self) -> f32 {
        self.one_over_mass
    }

    /// Sets the mass and rederives the linear velocity from the unchanged momentum. The inertia
    /// tensor is left alone; call one of the inertia setters afterwards.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.one_over_mass = 1.0 / mass;
        self.update_lin_velocity();
    }

    /// Returns the body-space moment of inertia tensor.
    pub fn object_inertia(&self) -> Mat3 {
        self.object_inertia
    }

    /// Returns the inverse of the body-space inertia tensor.
    pub fn inv_object_inertia(&self) -> Mat3 {
        self.inv_object_inertia
    }

    /// Returns the inverse inertia tensor rotated into world space.
    pub fn inv_world_inertia(&self) -> Mat3 {
        self.inv_world_inertia
    }

    /// Returns the world position of the body origin.
    pub fn lin_position(&self) -> Vec3 {
        self.lin_position
    }

    /// Returns the linear velocity.
    pub fn lin_velocity(&self) -> Vec3 {
        self.lin_velocity
    }

    /// Returns the linear momentum.
    pub fn lin_momentum(&self) -> Vec3 {
        self.lin_momentum
    }

    /// Returns the orientation.
    pub fn ang_position(&self) -> Quat {
        self.ang_position
    }

    /// Returns the world-space angular velocity.
    pub fn ang_velocity(&self) -> Vec3 {
        self.ang_velocity
    }

    /// Returns the world-space angular momentum.
    pub fn ang_momentum(&self) -> Vec3 {
        self.ang_momentum
    }

    /// Returns the center of mass in body space.
    pub fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    /// Returns the center of mass in world space.
    pub fn world_center_of_mass(&self) -> Vec3 {
        self.world_center_of_mass
    }

    /// Sets the linear momentum and rederives the linear velocity.
    pub fn set_lin_momentum(&mut self, momentum: Vec3) {
        self.lin_momentum = momentum;
        self.update_lin_velocity();
    }

    /// Sets the linear velocity by way of the momentum.
    pub fn set_lin_velocity(&mut self, velocity: Vec3) {
        self.set_lin_momentum(velocity * self.mass);
    }

    /// Sets the angular momentum and rederives the angular velocity.
    pub fn set_ang_momentum(&mut self, momentum: Vec3) {
        self.ang_momentum = momentum;
        self.update_ang_velocity();
    }

    /// Sets the angular velocity by way of the momentum, using the world inertia tensor for the
    /// current orientation.
    pub fn set_ang_velocity(&mut self, velocity: Vec3) {
        let rotation = Mat3::from_quat(self.ang_position);
        let world_inertia = rotation * self.object_inertia * rotation.transpose();
        self.set_ang_momentum(world_inertia * velocity);
    }

    /// Zeroes the force and torque accumulators.
    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Accumulates a force acting through the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulates a force acting at offset `r` from the world center of mass.
    pub fn apply_force_at(&mut self, r: Vec3, force: Vec3) {
        self.force += force;
        self.torque += r.cross(force);
    }

    /// Advances the body by `dt` seconds.
    ///
    /// The steps run in a fixed order: orientation (and the position swing around the center of
    /// mass), angular momentum, position from the velocity of the previous step, linear momentum,
    /// and finally the derived velocities, world inertia and world center of mass.
    pub fn integrate(&mut self, dt: f32) {
        let angle = self.ang_velocity.length();
        if angle != 0.0 {
            let (sin_half_angle, cos_half_angle) = (angle * dt * 0.5).sin_cos();
            let axis = self.ang_velocity * (sin_half_angle / angle);
            let dq = Quat::from_xyzw(axis.x, axis.y, axis.z, cos_half_angle);
            self.ang_position = (dq * self.ang_position).normalize();

            let lever = self.lin_position - self.world_center_of_mass;
            self.lin_position = dq * lever + self.world_center_of_mass;
        }

        self.ang_momentum += self.torque * dt;

        self.lin_position += self.lin_velocity * dt;
        self.lin_momentum += self.force * dt;
        self.lin_velocity = self.lin_momentum * self.one_over_mass;

        self.update_inertial_tensor();
        self.update_ang_velocity();
        self.update_center_of_mass();
    }

    /// Returns the offset of world point `p` from the world center of mass.
    pub fn origin_vector(&self, p: Vec3) -> Vec3 {
        p - self.world_center_of_mass
    }

    /// Returns the world velocity of the point at offset `r` from the world center of mass.
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.ang_velocity.cross(r) + self.lin_velocity
    }

    /// Applies an instantaneous impulse at offset `r` from the world center of mass. Wakes the
    /// body. Only momenta and velocities change.
    pub fn apply_impulse(&mut self, r: Vec3, impulse: Vec3) {
        self.at_rest = false;

        self.lin_momentum += impulse;
        self.update_lin_velocity();

        self.ang_momentum += r.cross(impulse);
        self.update_ang_velocity();
    }

    /// Resolves a contact with another body at world point `p`. `normal` is unit length and points
    /// from `other` toward `self`.
    ///
    /// Returns false without applying anything when the bodies are already separating.
    pub fn resolve_collision_with(&mut self, p: Vec3, normal: Vec3, other: &mut RigidBody) -> bool {
        self.at_rest = false;

        let r1 = self.origin_vector(p);
        let v1 = self.velocity_at(r1);
        let r2 = other.origin_vector(p);
        let v2 = other.velocity_at(r2);

        let nv = v1.dot(normal) - v2.dot(normal);
        if nv > 0.0 {
            return false;
        }

        // Combined restitution term is 2 + e1 * e2, not 1 + e.
        let n = -nv * (2.0 + self.restitution * other.restitution);
        let c1 = self.angular_response(r1, normal);
        let c2 = other.angular_response(r2, normal);
        let d = self.one_over_mass + other.one_over_mass + (c1 + c2).dot(normal);
        let impulse = normal * (n / d);

        self.apply_impulse(r1, impulse);
        other.apply_impulse(r2, -impulse);
        true
    }

    /// Resolves a contact against an immovable surface at world point `p` with unit surface
    /// `normal`, including a friction impulse capped by the Coulomb limit.
    ///
    /// Always returns true, even when the body is moving away and nothing is applied.
    pub fn resolve_collision(&mut self, p: Vec3, normal: Vec3) -> bool {
        self.at_rest = false;

        let r = self.origin_vector(p);
        let v = self.velocity_at(r);
        let n = -v.dot(normal);
        if n >= 0.0 {
            let d = self.zero_impulse(r, normal);
            let j = n * (1.0 + self.restitution) * d;
            let mut impulse = normal * j;

            let mut uv = v + normal * n;
            let ul = uv.length();
            if ul != 0.0 {
                uv /= -ul;
                let u = (ul * self.zero_impulse(r, uv)).min(j * self.friction);
                impulse += uv * u;
            }

            self.apply_impulse(r, impulse);
        }
        true
    }

    /// Returns the impulse magnitude along `normal` at offset `r` that brings the velocity of that
    /// point along `normal` to zero per unit of approach speed.
    pub fn zero_impulse(&self, r: Vec3, normal: Vec3) -> f32 {
        let c = self.angular_response(r, normal);
        1.0 / (self.one_over_mass + c.dot(normal))
    }

    fn angular_response(&self, r: Vec3, normal: Vec3) -> Vec3 {
        let a = r.cross(normal);
        let b = self.inv_world_inertia * a;
        b.cross(r)
    }

    /// Sets the inertia tensor of a box with the given extents.
    pub fn set_box_inertia(&mut self, half_extents: Vec3) {
        let ot = self.mass / 12.0;
        let a = half_extents.x * half_extents.x;
        let b = half_extents.y * half_extents.y;
        let c = half_extents.z * half_extents.z;

        self.object_inertia =
            Mat3::from_diagonal(Vec3::new(ot * (b + c), ot * (c + a), ot * (a + b)));
        self.invert_object_inertia();
        self.update_inertial_tensor();
    }

    /// Sets the inertia tensor of a solid unit sphere.
    pub fn set_sphere_inertia(&mut self) {
        let radius = 1.0;
        self.object_inertia = Mat3::from_diagonal(Vec3::splat(0.4 * self.mass * radius * radius));
        self.invert_object_inertia();
        self.update_inertial_tensor();
    }

    /// Recomputes the cached inverse of the body-space tensor. A singular tensor is not detected.
    pub fn invert_object_inertia(&mut self) {
        self.inv_object_inertia = self.object_inertia.inverse();
    }

    /// Sets the body-space center of mass.
    pub fn set_center_of_mass(&mut self, center: Vec3) {
        self.center_of_mass = center;
        self.update_center_of_mass();
    }

    /// Moves the reference point of the body-space inertia tensor from `old_pos` to `new_pos`.
    /// Each entry gains `mass * (old² - new²)` of the matching cross product matrix entries,
    /// squared one by one rather than as a matrix product. The inverse tensors are not refreshed.
    pub fn translate_center_of_mass(&mut self, old_pos: Vec3, new_pos: Vec3) {
        let old_cross = cross_product_matrix(old_pos);
        let new_cross = cross_product_matrix(new_pos);
        for c in 0..3 {
            let o = old_cross.col(c);
            let n = new_cross.col(c);
            *self.object_inertia.col_mut(c) += (o * o - n * n) * self.mass;
        }

        // Subtraction leaves the tensor slightly asymmetric; mirror the upper triangle.
        let m = &mut self.object_inertia;
        m.x_axis.y = m.y_axis.x;
        m.x_axis.z = m.z_axis.x;
        m.y_axis.z = m.z_axis.y;
    }

    /// Returns the kinetic energy, linear plus rotational.
    pub fn kinetic_energy(&self) -> f32 {
        let w = self.ang_position.inverse() * self.ang_velocity;
        let f = &self.inv_object_inertia;
        0.5 * (self.mass * self.lin_velocity.dot(self.lin_velocity)
            + w.x * w.x / f.x_axis.x
            + w.y * w.y / f.y_axis.y
            + w.z * w.z / f.z_axis.z)
    }

    /// Returns the rigid transform of the body origin.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.ang_position, self.lin_position)
    }

    /// Places the body using the rotation and translation of `transform`.
    pub fn set_transform(&mut self, transform: &Mat4) {
        self.ang_position = Quat::from_mat4(transform).normalize();
        self.lin_position = transform.w_axis.truncate();

        self.update_inertial_tensor();
        self.update_ang_velocity();
        self.update_center_of_mass();
    }

    /// Moves the body origin without changing its orientation or momenta.
    pub fn set_position(&mut self, position: Vec3) {
        self.lin_position = position;
        self.update_center_of_mass();
    }

    /// Returns whether the body has been put to rest. No motion heuristic is applied here.
    pub fn check_rest_condition(&self) -> bool {
        self.at_rest
    }

    /// Puts the body to rest, zeroing its velocities and momenta. Accumulated force and torque
    /// are kept.
    pub fn set_at_rest(&mut self) {
        self.at_rest = true;
        self.lin_velocity = Vec3::ZERO;
        self.lin_momentum = Vec3::ZERO;
        self.ang_velocity = Vec3::ZERO;
        self.ang_momentum = Vec3::ZERO;
    }

    fn update_lin_velocity(&mut self) {
        self.lin_velocity = self.lin_momentum * self.one_over_mass;
    }

    fn update_ang_velocity(&mut self) {
        self.ang_velocity = self.inv_world_inertia * self.ang_momentum;
    }

    fn update_inertial_tensor(&mut self) {
        let rotation = Mat3::from_quat(self.ang_position);
        self.inv_world_inertia = rotation * self.inv_object_inertia * rotation.transpose();
    }

    fn update_center_of_mass(&mut self) {
        self.world_center_of_mass = self.ang_position * self.center_of_mass + self.lin_position;
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

fn cross_product_matrix(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}
