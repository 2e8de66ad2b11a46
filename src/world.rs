use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use log::debug;
use nohash::IntMap;

use crate::systems;
use crate::Collider;
use crate::PhysicsError;
use crate::Plane;
use crate::RigidBody;
use crate::Settings;

static ALLOCATOR: AtomicUsize = AtomicUsize::new(1);

/// # Body Handle
///
/// Identifies a body inside a [World]. Handles are never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BodyHandle {
    id: usize,
}

impl BodyHandle {
    fn new() -> Self {
        Self {
            id: ALLOCATOR.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl nohash::IsEnabled for BodyHandle {}

/// # Body Event
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BodyEvent {
    /// Body was added to the world.
    Added(BodyHandle),
    /// Body was removed from the world.
    Removed(BodyHandle),
    /// Body received a collision impulse, either from a plane (`None`) or from another body.
    Contact(BodyHandle, Option<BodyHandle>),
    /// Body was put to rest.
    Slept(BodyHandle),
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) handle: BodyHandle,
    pub(crate) body: RigidBody,
    pub(crate) collider: Collider,
    pub(crate) still_ticks: u32,
}

/// # World
///
/// Owns the bodies and static planes of a simulation and steps them one tick at a time.
pub struct World {
    indexes: IntMap<BodyHandle, usize>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) planes: Vec<Plane>,
    pub(crate) events: Vec<BodyEvent>,
}

impl World {
    /// Returns an empty world.
    pub fn new() -> Self {
        Self {
            indexes: IntMap::default(),
            entries: Vec::new(),
            planes: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Returns the number of bodies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the world has no bodies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the world contains the given body.
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.indexes.contains_key(&handle)
    }

    /// Adds a body with the given collider. The body keeps its own inertia tensor; use
    /// [Collider::apply_inertia] beforehand to derive it from the shape.
    pub fn insert(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> Result<BodyHandle, PhysicsError> {
        let mass = body.mass();
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let handle = BodyHandle::new();
        self.indexes.insert(handle, self.entries.len());
        self.entries.push(Entry {
            handle,
            body,
            collider,
            still_ticks: 0,
        });
        self.events.push(BodyEvent::Added(handle));
        debug!("added body {handle:?} with mass {mass}");

        Ok(handle)
    }

    /// Removes the body and returns it.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let index = self.indexes.remove(&handle)?;
        let entry = self.entries.swap_remove(index);
        if let Some(moved) = self.entries.get(index) {
            self.indexes.insert(moved.handle, index);
        }

        self.events.push(BodyEvent::Removed(handle));
        debug!("removed body {handle:?}");

        Some(entry.body)
    }

    /// Returns the body for the given handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.entry(handle).map(|entry| &entry.body)
    }

    /// Returns the mutable body for the given handle.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let index = *self.indexes.get(&handle)?;
        Some(&mut self.entries[index].body)
    }

    /// Returns the body for the given handle or [PhysicsError::BodyNotFound].
    pub fn try_body(&self, handle: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.body(handle).ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Returns the mutable body for the given handle or [PhysicsError::BodyNotFound].
    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        let error = PhysicsError::BodyNotFound(handle);
        self.body_mut(handle).ok_or(error)
    }

    /// Returns the collider of the given body.
    pub fn collider(&self, handle: BodyHandle) -> Option<Collider> {
        self.entry(handle).map(|entry| entry.collider)
    }

    /// Returns the handles of all the bodies.
    pub fn handles<'a>(&'a self) -> impl 'a + Iterator<Item = BodyHandle> {
        self.entries.iter().map(|entry| entry.handle)
    }

    /// Returns all the bodies with their handles.
    pub fn bodies<'a>(&'a self) -> impl 'a + Iterator<Item = (BodyHandle, &'a RigidBody)> {
        self.entries.iter().map(|entry| (entry.handle, &entry.body))
    }

    /// Adds a static plane.
    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    /// Returns the static planes.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Returns the events raised since the last [World::clear_events].
    ///
    /// Events are kept until cleared. Callers driving [World::step] themselves drain them once
    /// per tick; [crate::Application::run] does so after forwarding them.
    pub fn events(&self) -> &[BodyEvent] {
        &self.events
    }

    /// Clears the events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Advances the world by one tick of `settings.tick` seconds. Events of the tick are appended
    /// to [World::events].
    pub fn step(&mut self, settings: &Settings) {
        systems::apply_gravity(self, settings.gravity);
        systems::integrate_bodies(self, settings.tick);
        systems::resolve_plane_contacts(self, settings.penetration_correction);
        systems::resolve_body_contacts(self, settings.penetration_correction);
        systems::update_sleep(self, settings);
    }

    fn entry(&self, handle: BodyHandle) -> Option<&Entry> {
        let index = *self.indexes.get(&handle)?;
        Some(&self.entries[index])
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn ball(mass: f32) -> RigidBody {
        let mut body = RigidBody::new();
        body.set_mass(mass);
        body.set_sphere_inertia();
        body
    }

    #[test]
    fn insert_contains_returns_true() {
        let mut world = World::new();

        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        assert!(world.contains(handle));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn insert_zero_mass_returns_invalid_mass() {
        let mut world = World::new();

        let result = world.insert(ball(0.0), Collider::sphere(1.0));

        assert_eq!(result, Err(PhysicsError::InvalidMass(0.0)));
        assert!(world.is_empty());
    }

    #[test]
    fn insert_nan_mass_returns_invalid_mass() {
        let mut world = World::new();

        let result = world.insert(ball(f32::NAN), Collider::sphere(1.0));

        assert!(matches!(result, Err(PhysicsError::InvalidMass(_))));
    }

    #[test]
    fn insert_events_returns_added_event() {
        let mut world = World::new();

        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        assert_eq!(world.events(), &[BodyEvent::Added(handle)]);
    }

    #[test]
    fn insert_twice_returns_distinct_handles() {
        let mut world = World::new();

        let first = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();
        let second = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn remove_contains_returns_false() {
        let mut world = World::new();
        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        let removed = world.remove(handle);

        assert_eq!(removed.map(|body| body.mass()), Some(1.0));
        assert!(!world.contains(handle));
        assert_eq!(world.body(handle), None);
    }

    #[test]
    fn remove_keeps_moved_body_reachable() {
        let mut world = World::new();
        let first = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();
        let second = world.insert(ball(2.0), Collider::sphere(1.0)).unwrap();
        let third = world.insert(ball(3.0), Collider::sphere(1.0)).unwrap();

        world.remove(first);

        assert_eq!(world.body(second).map(RigidBody::mass), Some(2.0));
        assert_eq!(world.body(third).map(RigidBody::mass), Some(3.0));
    }

    #[test]
    fn remove_events_returns_removed_event() {
        let mut world = World::new();
        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        world.remove(handle);

        assert_eq!(
            world.events(),
            &[BodyEvent::Added(handle), BodyEvent::Removed(handle)]
        );
    }

    #[test]
    fn remove_missing_returns_none() {
        let mut world = World::new();
        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();
        world.remove(handle);

        assert_eq!(world.remove(handle), None);
    }

    #[test]
    fn try_body_missing_returns_body_not_found() {
        let mut world = World::new();
        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();
        world.remove(handle);

        assert_eq!(
            world.try_body(handle).err(),
            Some(PhysicsError::BodyNotFound(handle))
        );
    }

    #[test]
    fn body_mut_set_position_is_visible() {
        let mut world = World::new();
        let handle = world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        world
            .try_body_mut(handle)
            .unwrap()
            .set_position(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(
            world.body(handle).map(RigidBody::lin_position),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn clear_events_events_returns_empty() {
        let mut world = World::new();
        world.insert(ball(1.0), Collider::sphere(1.0)).unwrap();

        world.clear_events();

        assert_eq!(world.events(), &[]);
    }

    #[test]
    fn add_plane_planes_returns_plane() {
        let mut world = World::new();

        world.add_plane(Plane::GROUND);

        assert_eq!(world.planes(), &[Plane::GROUND]);
    }

    #[test]
    fn step_without_planes_falls() {
        let mut world = World::new();
        let handle = world.insert(ball(2.0), Collider::sphere(1.0)).unwrap();
        let settings = Settings::DEFAULT.without_sleep();

        world.step(&settings);
        world.step(&settings);

        let body = world.try_body(handle).unwrap();
        assert!(body.lin_velocity().y < 0.0);
        assert!(body.lin_position().y < 0.0);
    }

    #[test]
    fn step_events_are_kept_until_cleared() {
        let mut world = World::new();
        world.add_plane(Plane::GROUND);
        let mut body = ball(1.0);
        body.set_position(Vec3::new(0.0, 0.5, 0.0));
        let handle = world.insert(body, Collider::sphere(1.0)).unwrap();
        world.clear_events();
        let settings = Settings::DEFAULT.without_sleep();
        let contact = BodyEvent::Contact(handle, None);

        world.step(&settings);
        world.step(&settings);
        assert_eq!(world.events(), &[contact, contact]);

        world.clear_events();
        world.step(&settings);
        assert_eq!(world.events(), &[contact]);
    }
}
