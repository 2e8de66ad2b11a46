//! # Systems
//!
//! Passes run by [World::step] once per tick, in the order they appear here. They are public so a
//! game can run its own step with extra work between passes.

use glam::Vec3;
use log::debug;
use log::trace;

use crate::collider::sphere_contact;
use crate::BodyEvent;
use crate::Contact;
use crate::Settings;
use crate::World;

/// Replaces the accumulated force on every awake body with its weight under `gravity`.
pub fn apply_gravity(world: &mut World, gravity: Vec3) {
    for entry in world.entries.iter_mut() {
        let body = &mut entry.body;
        if body.check_rest_condition() {
            continue;
        }

        body.clear_forces();
        body.apply_force(gravity * body.mass());
    }
}

/// Integrates every awake body over `dt` seconds.
pub fn integrate_bodies(world: &mut World, dt: f32) {
    for entry in world.entries.iter_mut() {
        if !entry.body.check_rest_condition() {
            entry.body.integrate(dt);
        }
    }
}

/// Resolves the contacts between awake bodies and the static planes, then pushes each body out
/// of the plane by `correction` times its deepest penetration.
pub fn resolve_plane_contacts(world: &mut World, correction: f32) {
    for entry in world.entries.iter_mut() {
        if entry.body.check_rest_condition() {
            continue;
        }

        for plane in world.planes.iter() {
            let contacts = entry.collider.plane_contacts(&entry.body, plane);
            if contacts.is_empty() {
                continue;
            }

            let mut depth = 0.0f32;
            for contact in &contacts {
                trace!(
                    "body {:?} touches plane at {} with depth {}",
                    entry.handle,
                    contact.point,
                    contact.depth
                );
                entry.body.resolve_collision(contact.point, contact.normal);
                depth = depth.max(contact.depth);
            }

            let push = plane.normal * (depth * correction);
            let position = entry.body.lin_position();
            entry.body.set_position(position + push);
            world.events.push(BodyEvent::Contact(entry.handle, None));
        }
    }
}

/// Resolves the contacts between pairs of bodies using their bounding spheres, then separates
/// each pair by `correction` times the penetration, split by inverse mass. Pairs where both bodies
/// rest are skipped.
pub fn resolve_body_contacts(world: &mut World, correction: f32) {
    let count = world.entries.len();
    for j in 1..count {
        let (head, tail) = world.entries.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            if a.body.check_rest_condition() && b.body.check_rest_condition() {
                continue;
            }

            let Some(contact) = sphere_contact(&a.body, &a.collider, &b.body, &b.collider) else {
                continue;
            };
            let Contact {
                point,
                normal,
                depth,
            } = contact;

            trace!(
                "body {:?} touches body {:?} at {} with depth {}",
                a.handle,
                b.handle,
                point,
                depth
            );
            a.body.resolve_collision_with(point, normal, &mut b.body);

            let a_share = a.body.one_over_mass();
            let b_share = b.body.one_over_mass();
            let push = normal * (depth * correction / (a_share + b_share));
            let a_position = a.body.lin_position();
            a.body.set_position(a_position + push * a_share);
            let b_position = b.body.lin_position();
            b.body.set_position(b_position - push * b_share);

            let event = BodyEvent::Contact(a.handle, Some(b.handle));
            world.events.push(event);
        }
    }
}

/// Puts bodies to rest once their kinetic energy per unit mass has stayed below
/// [Settings::sleep_energy] for [Settings::sleep_ticks] ticks in a row.
pub fn update_sleep(world: &mut World, settings: &Settings) {
    if !settings.sleep_enabled() {
        return;
    }

    for entry in world.entries.iter_mut() {
        if entry.body.check_rest_condition() {
            entry.still_ticks = 0;
            continue;
        }

        let energy = entry.body.kinetic_energy() / entry.body.mass();
        if energy >= settings.sleep_energy {
            entry.still_ticks = 0;
            continue;
        }

        entry.still_ticks += 1;
        if entry.still_ticks >= settings.sleep_ticks {
            entry.body.set_at_rest();
            entry.still_ticks = 0;
            world.events.push(BodyEvent::Slept(entry.handle));
            debug!("body {:?} is at rest", entry.handle);
        }
    }
}
