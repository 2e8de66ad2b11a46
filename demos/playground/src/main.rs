use glam::Mat4;
use glam::Quat;
use glam::Vec3;
use log::debug;
use log::info;
use log::LevelFilter;
use rigid::Application;
use rigid::ApplicationState;
use rigid::BodyEvent;
use rigid::BodyHandle;
use rigid::Collider;
use rigid::PhysicsError;
use rigid::Plane;
use rigid::RigidBody;
use rigid::Settings;
use rigid::World;

const MAX_UPDATES: u32 = 600;

struct Playground {
    state: ApplicationState,
    world: World,
    updates: u32,
}

impl Playground {
    fn new() -> Result<Self, PhysicsError> {
        let mut world = World::new();
        world.add_plane(Plane::GROUND);

        let ball = Collider::sphere(0.5);
        let mut body = RigidBody::new();
        body.set_mass(2.0);
        ball.apply_inertia(&mut body);
        body.set_position(Vec3::new(-2.0, 4.0, 0.0));
        body.set_ang_velocity(Vec3::new(0.0, 0.0, -3.0));
        world.insert(body, ball)?;

        let crate_box = Collider::cuboid(Vec3::new(0.5, 0.25, 0.5));
        let mut body = RigidBody::new();
        body.set_mass(5.0);
        crate_box.apply_inertia(&mut body);
        body.set_position(Vec3::new(2.0, 3.0, 0.0));
        body.set_transform(&Mat4::from_rotation_translation(
            Quat::from_rotation_x(0.4),
            body.lin_position(),
        ));
        body.restitution = 0.1;
        world.insert(body, crate_box)?;

        Ok(Self {
            state: ApplicationState::Running,
            world,
            updates: 0,
        })
    }

    fn report(&self, handle: BodyHandle) {
        if let Some(body) = self.world.body(handle) {
            info!(
                "body {:?} at {} moving {}",
                handle,
                body.lin_position(),
                body.lin_velocity()
            );
        }
    }
}

impl Application for Playground {
    fn state(&self) -> ApplicationState {
        self.state
    }

    fn settings(&self) -> Settings {
        Settings::DEFAULT.with_tick(1.0 / 60.0)
    }

    fn handle_event(&mut self, event: BodyEvent) {
        match event {
            BodyEvent::Contact(handle, None) => debug!("body {:?} touches the ground", handle),
            BodyEvent::Contact(a, Some(b)) => info!("bodies {:?} and {:?} collided", a, b),
            BodyEvent::Slept(handle) => {
                info!("body {:?} came to rest", handle);
                self.report(handle);
            }
            BodyEvent::Added(_) | BodyEvent::Removed(_) => {}
        }
    }

    fn update(&mut self) {
        self.updates += 1;

        let mut bodies = self.world.bodies();
        let resting = bodies.all(|(_, body)| body.check_rest_condition());
        if resting || self.updates == MAX_UPDATES {
            for handle in self.world.handles().collect::<Vec<_>>() {
                self.report(handle);
            }
            self.state = ApplicationState::Finished;
        }
    }

    fn world(&self) -> &World {
        &self.world
    }

    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

fn main() -> Result<(), PhysicsError> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    Playground::new()?.run()
}
