#![warn(missing_docs)]

//! # Rigid
//!
//! ![MIT](https://img.shields.io/badge/license-MIT-blue.svg)
//!
//! ## What is Rigid?
//!
//! Rigid is the rigid body dynamics core of a real-time game engine. It provides:
//! - [RigidBody], a six degrees of freedom body integrated from its linear and angular momentum
//!   with semi-implicit Euler steps
//! - Impulse based collision response between two bodies and against immovable surfaces, with
//!   Coulomb friction against surfaces
//! - Inertia tensor setup for boxes and spheres and re-centering under a moving center of mass
//! - A [World] that owns bodies and static planes, finds contacts between simple colliders, and
//!   puts still bodies to rest
//! - A fixed-tick [Application] loop to drive the world
//!
//! Math types come from [glam].
//!
//! ```
//! use glam::Vec3;
//! use rigid::Collider;
//! use rigid::Plane;
//! use rigid::RigidBody;
//! use rigid::Settings;
//! use rigid::World;
//!
//! let mut world = World::new();
//! world.add_plane(Plane::GROUND);
//!
//! let collider = Collider::sphere(0.5);
//! let mut ball = RigidBody::new();
//! ball.set_mass(2.0);
//! collider.apply_inertia(&mut ball);
//! ball.set_position(Vec3::new(0.0, 3.0, 0.0));
//! let handle = world.insert(ball, collider)?;
//!
//! let settings = Settings::default();
//! for _ in 0..100 {
//!     world.step(&settings);
//! }
//!
//! let ball = world.try_body(handle)?;
//! assert!(ball.lin_position().y < 3.0);
//! # Ok::<(), rigid::PhysicsError>(())
//! ```

pub use crate::app::Application;
pub use crate::app::ApplicationState;
pub use crate::app::Stepper;
pub use crate::collider::Collider;
pub use crate::collider::Contact;
pub use crate::collider::Plane;
pub use crate::error::PhysicsError;
pub use crate::rigid::RigidBody;
pub use crate::settings::Settings;
pub use crate::world::BodyEvent;
pub use crate::world::BodyHandle;
pub use crate::world::World;

mod app;
mod collider;
mod error;
mod rigid;
mod settings;
pub mod systems;
mod world;
