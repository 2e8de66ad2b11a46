use std::thread;
use std::time::Duration;
use std::time::Instant;

use log::debug;
use log::warn;

use crate::BodyEvent;
use crate::PhysicsError;
use crate::Settings;
use crate::World;

/// # Application
///
/// Entry-point for a game that drives a [World] at a fixed tick rate.
pub trait Application: Sized {
    /// Returns the current state of the application. The run loop exits if this returns
    /// [ApplicationState::Finished] after [Application::handle_event] or [Application::update] is
    /// called.
    fn state(&self) -> ApplicationState;

    /// Returns the simulation settings. They are read once when the run loop starts.
    fn settings(&self) -> Settings {
        Settings::DEFAULT
    }

    /// Handles an event raised by the world during the last tick.
    fn handle_event(&mut self, event: BodyEvent);

    /// Updates the application after the ticks for the current frame have run.
    fn update(&mut self);

    /// Returns a reference to the application's world.
    fn world(&self) -> &World;

    /// Returns a mutable reference to the application's world.
    fn world_mut(&mut self) -> &mut World;

    /// Runs the application until it finishes. Fails if the settings don't validate.
    fn run(self) -> Result<(), PhysicsError> {
        run_application(self)
    }
}

/// # Application State
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ApplicationState {
    /// Application is running.
    Running,
    /// Application has finished running.
    Finished,
}

/// # Stepper
///
/// Converts elapsed wall-clock time into whole simulation ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stepper {
    settings: Settings,
    accumulator: f32,
}

impl Stepper {
    /// Returns a stepper for validated settings.
    pub fn new(settings: Settings) -> Result<Self, PhysicsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            accumulator: 0.0,
        })
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the time carried over to the next update, in seconds.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Adds `elapsed` seconds and runs the ticks that fit, at most
    /// [Settings::max_ticks_per_update]. Returns the number of ticks run. `on_tick` is called after
    /// every tick with the world, which still holds the events of that tick.
    pub fn advance(
        &mut self,
        world: &mut World,
        elapsed: f32,
        mut on_tick: impl FnMut(&mut World),
    ) -> u32 {
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.settings.tick {
            if ticks == self.settings.max_ticks_per_update {
                warn!("simulation fell behind, dropping {}s", self.accumulator);
                self.accumulator = 0.0;
                break;
            }

            world.step(&self.settings);
            on_tick(world);
            self.accumulator -= self.settings.tick;
            ticks += 1;
        }

        ticks
    }
}

fn run_application(mut app: impl Application) -> Result<(), PhysicsError> {
    let mut stepper = Stepper::new(app.settings())?;
    let tick = Duration::from_secs_f32(stepper.settings().tick);
    let mut last_frame = Instant::now();

    debug!("running with {:?}", stepper.settings());

    while app.state() == ApplicationState::Running {
        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let mut events = Vec::new();
        stepper.advance(app.world_mut(), elapsed, |world| {
            events.extend_from_slice(world.events());
            world.clear_events();
        });

        for event in events {
            app.handle_event(event);
        }

        if app.state() == ApplicationState::Finished {
            break;
        }

        app.update();

        let frame = now.elapsed();
        if frame < tick {
            thread::sleep(tick - frame);
        }
    }

    Ok(())
}
