use crate::core::config::DemoConfig;
use bevy::prelude::*;

#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

/// Exits the app `window.autoClose` seconds after startup (disabled when 0).
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose.run_if(resource_exists::<AutoCloseTimer>));
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<DemoConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "session", seconds = secs, "auto-close armed");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    mut timer: ResMut<AutoCloseTimer>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if timer.tick(time.delta()).just_finished() {
        info!(target: "session", "auto-close timer finished, requesting app exit");
        ev_exit.write(AppExit::Success);
    }
}
