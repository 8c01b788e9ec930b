//! On-screen and keyboard controls for both views.
//!
//! Handlers here never touch simulation state. They edit the color inputs and
//! emit `RecolorRequested` / `ResetBoxes`, which the owning plugins consume in
//! `PrePhysicsSet`.

use bevy::prelude::*;
use bevy::ui::{AlignItems, FlexDirection, JustifyContent, Node};

use crate::core::components::{UiCamera, ViewKind};
use crate::core::config::DemoConfig;
use crate::core::system::system_order::{ControlsSet, PrePhysicsSet};
use crate::galaxy::palette::ColorInputs;
use crate::galaxy::RecolorRequested;
use crate::physics::boxes::ResetBoxes;

/// One of the three color inputs; clicking cycles it through the swatches.
#[derive(Component, Debug, Clone, Copy)]
pub struct ColorSwatchButton {
    pub slot: usize,
}

#[derive(Component, Debug, Clone, Copy)]
struct SwatchLabel {
    slot: usize,
}

#[derive(Component)]
pub struct ApplyColorsButton;

#[derive(Component)]
pub struct ResetBoxesButton;

const PANEL_BG: Color = Color::srgba(0.02, 0.02, 0.05, 0.85);
const BUTTON_IDLE: Color = Color::srgba(0.05, 0.05, 0.08, 0.9);
const BUTTON_HOVER: Color = Color::srgba(0.08, 0.08, 0.12, 0.9);
const BUTTON_PRESSED: Color = Color::srgba(0.15, 0.15, 0.25, 0.9);
const SWATCH_INVALID: Color = Color::srgb(0.3, 0.3, 0.3);

const SWATCH_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, ControlsSet.before(PrePhysicsSet))
            .add_systems(PostStartup, spawn_control_panels)
            .add_systems(
                Update,
                (
                    swatch_button_clicks,
                    apply_button_clicks,
                    reset_button_clicks,
                    keyboard_controls,
                    button_hover_feedback,
                )
                    .in_set(ControlsSet),
            )
            .add_systems(
                Update,
                refresh_swatches
                    .after(ControlsSet)
                    .run_if(resource_exists_and_changed::<ColorInputs>),
            );
    }
}

fn swatch_color(raw: &str) -> Color {
    Srgba::hex(raw).map_or(SWATCH_INVALID, Color::from)
}

/// The strip below the 3D surface.
fn panel_root(ui_camera: Entity, surface_fraction: f32) -> impl Bundle {
    let surface = surface_fraction.clamp(0.0, 1.0) * 100.0;
    (
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(surface),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0 - surface),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            padding: UiRect::all(Val::Px(16.0)),
            column_gap: Val::Px(12.0),
            ..default()
        },
        BackgroundColor(PANEL_BG),
        UiTargetCamera(ui_camera),
    )
}

fn button_node() -> Node {
    Node {
        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn spawn_control_panels(
    mut commands: Commands,
    cfg: Res<DemoConfig>,
    inputs: Option<Res<ColorInputs>>,
    ui_cameras: Query<(Entity, &UiCamera)>,
) {
    for (camera, view) in &ui_cameras {
        let root = commands
            .spawn(panel_root(camera, cfg.window.height_fraction))
            .id();
        match view.0 {
            ViewKind::Galaxy => {
                let values = inputs
                    .as_deref()
                    .map(|i| i.values.clone())
                    .unwrap_or_else(|| cfg.galaxy.initial_colors.clone());
                commands.entity(root).with_children(|p| {
                    for (slot, value) in values.iter().enumerate() {
                        p.spawn((
                            Button,
                            button_node(),
                            BackgroundColor(swatch_color(value)),
                            ColorSwatchButton { slot },
                        ))
                        .with_children(|b| {
                            b.spawn((Text::new(value.clone()), SwatchLabel { slot }));
                        });
                    }
                    p.spawn((Button, button_node(), BackgroundColor(BUTTON_IDLE), ApplyColorsButton))
                        .with_children(|b| {
                            b.spawn(Text::new("Apply"));
                        });
                    p.spawn(Text::new("1/2/3 cycle colors, Enter applies"));
                });
            }
            ViewKind::Boxes => {
                commands.entity(root).with_children(|p| {
                    p.spawn((Button, button_node(), BackgroundColor(BUTTON_IDLE), ResetBoxesButton))
                        .with_children(|b| {
                            b.spawn(Text::new("Reset"));
                        });
                    p.spawn(Text::new("R resets, Esc quits"));
                });
            }
        }
        info!(target: "controls", view = ?view.0, "control panel spawned");
    }
}

fn cycle_swatch(inputs: &mut ColorInputs, slot: usize, swatches: &[String]) {
    match inputs.cycle(slot, swatches) {
        Some(v) => debug!(target: "controls", slot, value = v, "color input changed"),
        None => warn!(target: "controls", slot, "no swatches configured; color input unchanged"),
    }
}

fn swatch_button_clicks(
    q: Query<(&Interaction, &ColorSwatchButton), Changed<Interaction>>,
    inputs: Option<ResMut<ColorInputs>>,
    cfg: Res<DemoConfig>,
) {
    let Some(mut inputs) = inputs else {
        return;
    };
    for (interaction, swatch) in &q {
        if *interaction == Interaction::Pressed {
            cycle_swatch(&mut inputs, swatch.slot, &cfg.galaxy.swatches);
        }
    }
}

fn apply_button_clicks(
    q: Query<&Interaction, (Changed<Interaction>, With<ApplyColorsButton>)>,
    mut recolor: EventWriter<RecolorRequested>,
) {
    if q.iter().any(|i| *i == Interaction::Pressed) {
        recolor.write(RecolorRequested);
    }
}

fn reset_button_clicks(
    q: Query<&Interaction, (Changed<Interaction>, With<ResetBoxesButton>)>,
    mut reset: EventWriter<ResetBoxes>,
) {
    if q.iter().any(|i| *i == Interaction::Pressed) {
        reset.write(ResetBoxes);
    }
}

pub fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    inputs: Option<ResMut<ColorInputs>>,
    cfg: Res<DemoConfig>,
    mut recolor: EventWriter<RecolorRequested>,
    mut reset: EventWriter<ResetBoxes>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(mut inputs) = inputs {
        for (slot, key) in SWATCH_KEYS.iter().enumerate() {
            if keys.just_pressed(*key) {
                cycle_swatch(&mut inputs, slot, &cfg.galaxy.swatches);
            }
        }
    }
    if keys.just_pressed(KeyCode::Enter) {
        recolor.write(RecolorRequested);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        reset.write(ResetBoxes);
    }
    if keys.just_pressed(KeyCode::Escape) {
        info!(target: "controls", "escape pressed; requesting exit");
        exit.write(AppExit::Success);
    }
}

fn button_hover_feedback(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            Or<(With<ApplyColorsButton>, With<ResetBoxesButton>)>,
        ),
    >,
) {
    for (interaction, mut bg) in &mut q {
        *bg = BackgroundColor(match *interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        });
    }
}

fn refresh_swatches(
    inputs: Res<ColorInputs>,
    mut swatches: Query<(&ColorSwatchButton, &mut BackgroundColor)>,
    mut labels: Query<(&SwatchLabel, &mut Text)>,
) {
    for (swatch, mut bg) in &mut swatches {
        if let Some(value) = inputs.values.get(swatch.slot) {
            bg.set_if_neq(BackgroundColor(swatch_color(value)));
        }
    }
    for (label, mut text) in &mut labels {
        if let Some(value) = inputs.values.get(label.slot) {
            if text.as_str() != value {
                *text = Text::new(value.clone());
            }
        }
    }
}
