use std::f32::consts::FRAC_PI_2;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::sprite::Anchor;
use nbcalibrator::chart::{self, Bounds, Chart};
use nbcalibrator::{logging, CalibratorForm, Environment, Field, FormDefaults};

const PLOT_WIDTH: f32 = 600.0;
const PLOT_HEIGHT: f32 = 440.0;
// Plot area sits right of the input fields.
const PLOT_CENTER: Vec2 = Vec2::new(150.0, 0.0);
const GRID_DIVISIONS: usize = 5;

const FORM_LEFT: f32 = -465.0;
const FORM_TOP: f32 = 180.0;
const FORM_LINE: f32 = 34.0;

const BACKGROUND: Color = Color::rgb(0.06, 0.07, 0.1);
const GRID: Color = Color::rgb(0.22, 0.24, 0.3);
const FRAME: Color = Color::rgb(0.7, 0.72, 0.78);
const SELECTED: Color = Color::rgb(1.0, 0.85, 0.3);
const WARNING: Color = Color::rgb(0.9, 0.25, 0.2);

#[derive(Resource)]
struct Calibrator {
    form: CalibratorForm,
    selected: Field,
    chart: Option<(Chart, Bounds)>,
    status: String,
}

impl Calibrator {
    fn new(form: CalibratorForm) -> Self {
        let mut calibrator = Self {
            form,
            selected: Field::Weight,
            chart: None,
            status: String::new(),
        };
        calibrator.plot();
        calibrator
    }

    fn plot(&mut self) {
        match self.form.plot() {
            Ok(plot) => {
                let chart = Chart::from_curve(&plot.curve);
                self.status = match chart.bounds() {
                    Some(b) => format!(
                        "Depth {:.2} m to {:.2} m. Enter: plot, Esc: clear.",
                        b.y_min, b.y_max
                    ),
                    None => "No finite depths to draw. Esc: clear.".to_string(),
                };
                self.chart = chart.bounds().map(|b| (chart, b.widened()));
            }
            // A rejected form leaves the chart as it was.
            Err(err) => self.status = err.user_message().to_string(),
        }
    }

    fn clear(&mut self) {
        self.form.clear();
        self.selected = Field::Weight;
        self.chart = None;
        self.status = "Cleared. Type weight and height, then Enter.".to_string();
    }
}

fn accepts(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E' | '_')
}

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct FieldText(Field);

fn label(value: &str, size: f32, color: Color) -> Text {
    Text::from_section(
        value,
        TextStyle {
            font_size: size,
            color,
            ..default()
        },
    )
}

fn spawn_chart_labels(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());

    let half_w = PLOT_WIDTH / 2.0;
    let half_h = PLOT_HEIGHT / 2.0;
    let (cx, cy) = (PLOT_CENTER.x, PLOT_CENTER.y);

    commands.spawn(Text2dBundle {
        text: label(chart::TITLE, 24.0, Color::WHITE),
        transform: Transform::from_xyz(cx, cy + half_h + 40.0, 0.0),
        ..default()
    });
    commands.spawn(Text2dBundle {
        text: label(chart::X_LABEL, 18.0, Color::WHITE),
        transform: Transform::from_xyz(cx, cy - half_h - 24.0, 0.0),
        ..default()
    });
    commands.spawn(Text2dBundle {
        text: label(chart::Y_LABEL, 18.0, Color::WHITE),
        transform: Transform::from_xyz(cx - half_w - 24.0, cy, 0.0)
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
        ..default()
    });
    let legend = Chart::from_curve(&nbcalibrator::BuoyancyCurve::default());
    for (i, series) in legend.series.iter().enumerate() {
        let (r, g, b) = series.color;
        commands.spawn(Text2dBundle {
            text: label(series.label, 16.0, Color::rgb_u8(r, g, b)),
            transform: Transform::from_xyz(cx + half_w - 80.0, cy + half_h - 16.0 - 20.0 * i as f32, 0.0),
            ..default()
        });
    }
    commands.spawn(Text2dBundle {
        text: label(chart::WARNING, 15.0, WARNING),
        transform: Transform::from_xyz(cx, cy - half_h - 70.0, 0.0),
        ..default()
    });
    commands.spawn((
        Text2dBundle {
            text: label("", 15.0, FRAME),
            transform: Transform::from_xyz(cx, cy + half_h + 14.0, 0.0),
            ..default()
        },
        StatusText,
    ));

    commands.spawn(Text2dBundle {
        text: label("Tab/Up/Down: select field", 14.0, FRAME),
        text_anchor: Anchor::CenterLeft,
        transform: Transform::from_xyz(FORM_LEFT, FORM_TOP + FORM_LINE, 0.0),
        ..default()
    });
    for field in Field::ALL {
        let y = FORM_TOP - FORM_LINE * field.index() as f32;
        commands.spawn((
            Text2dBundle {
                text: Text::from_sections([
                    TextSection::new(
                        format!("{}\n", field.label()),
                        TextStyle {
                            font_size: 13.0,
                            color: FRAME,
                            ..default()
                        },
                    ),
                    TextSection::new(
                        "",
                        TextStyle {
                            font_size: 16.0,
                            color: Color::WHITE,
                            ..default()
                        },
                    ),
                ]),
                text_anchor: Anchor::CenterLeft,
                transform: Transform::from_xyz(FORM_LEFT, y, 0.0),
                ..default()
            },
            FieldText(field),
        ));
    }
}

fn handle_keys(keys: Res<Input<KeyCode>>, mut calibrator: ResMut<Calibrator>) {
    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    if keys.just_pressed(KeyCode::Escape) {
        calibrator.clear();
    } else if keys.just_pressed(KeyCode::Return) || keys.just_pressed(KeyCode::Space) {
        calibrator.plot();
    } else if keys.just_pressed(KeyCode::Down) || (keys.just_pressed(KeyCode::Tab) && !shift) {
        calibrator.selected = calibrator.selected.next();
    } else if keys.just_pressed(KeyCode::Up) || (keys.just_pressed(KeyCode::Tab) && shift) {
        calibrator.selected = calibrator.selected.previous();
    } else if keys.just_pressed(KeyCode::Back) {
        let field = calibrator.selected;
        calibrator.form.pop_char(field);
    }
}

fn handle_typing(mut chars: EventReader<ReceivedCharacter>, mut calibrator: ResMut<Calibrator>) {
    for event in chars.iter().filter(|event| accepts(event.char)) {
        let field = calibrator.selected;
        calibrator.form.push_char(field, event.char);
    }
}

fn update_status(calibrator: Res<Calibrator>, mut query: Query<&mut Text, With<StatusText>>) {
    if !calibrator.is_changed() {
        return;
    }
    for mut text in &mut query {
        text.sections[0].value = calibrator.status.clone();
    }
}

fn update_fields(calibrator: Res<Calibrator>, mut query: Query<(&mut Text, &FieldText)>) {
    if !calibrator.is_changed() {
        return;
    }
    for (mut text, FieldText(field)) in &mut query {
        let selected = *field == calibrator.selected;
        let value = &mut text.sections[1];
        value.value = if selected {
            format!("{}_", calibrator.form.get(*field))
        } else {
            calibrator.form.get(*field).to_string()
        };
        value.style.color = if selected { SELECTED } else { Color::WHITE };
    }
}

fn draw_chart(mut gizmos: Gizmos, calibrator: Res<Calibrator>) {
    let half = Vec2::new(PLOT_WIDTH, PLOT_HEIGHT) / 2.0;
    let origin = PLOT_CENTER - half;
    for i in 0..=GRID_DIVISIONS {
        let t = i as f32 / GRID_DIVISIONS as f32;
        let x = origin.x + t * PLOT_WIDTH;
        let y = origin.y + t * PLOT_HEIGHT;
        gizmos.line_2d(Vec2::new(x, origin.y), Vec2::new(x, origin.y + PLOT_HEIGHT), GRID);
        gizmos.line_2d(Vec2::new(origin.x, y), Vec2::new(origin.x + PLOT_WIDTH, y), GRID);
    }
    gizmos.rect_2d(PLOT_CENTER, 0.0, half * 2.0, FRAME);

    let Some((chart, bounds)) = &calibrator.chart else {
        return;
    };
    let to_world = |(x, y): (f64, f64)| -> Vec2 {
        let tx = (x - bounds.x_min) / (bounds.x_max - bounds.x_min);
        let ty = (y - bounds.y_min) / (bounds.y_max - bounds.y_min);
        origin + Vec2::new(tx as f32 * PLOT_WIDTH, ty as f32 * PLOT_HEIGHT)
    };
    for series in &chart.series {
        let (r, g, b) = series.color;
        for segment in series.segments() {
            gizmos.linestrip_2d(segment.iter().copied().map(to_world), Color::rgb_u8(r, g, b));
        }
    }
}

// --name value pairs, the same spelling as the command line calculator
fn parse_args(args: &[String], form: &mut CalibratorForm) -> Result<(), String> {
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {flag}."))?;
        let field = Field::from_flag(flag).ok_or_else(|| format!("Unknown option {flag}."))?;
        form.set(field, value.as_str());
    }
    Ok(())
}

// Removes `flag value` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let index = args.iter().position(|arg| arg == flag)?;
    if index + 1 >= args.len() {
        return None;
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Some(value)
}

fn main() -> anyhow::Result<()> {
    let _logger = logging::setup()?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut defaults = match take_option(&mut args, "--config") {
        Some(path) => FormDefaults::load_or_default(path),
        None => FormDefaults::default(),
    };
    if let Some(name) = take_option(&mut args, "--water") {
        match Environment::preset(&name) {
            Some(env) => defaults = defaults.with_environment(env),
            None => anyhow::bail!("Unknown water {name}, expected fresh or sea."),
        }
    }
    let mut form = CalibratorForm::new(defaults);
    if let Err(message) = parse_args(&args, &mut form) {
        anyhow::bail!("{message}");
    }

    App::new()
        .insert_resource(ClearColor(BACKGROUND))
        .insert_resource(Calibrator::new(form))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: chart::TITLE.into(),
                        resolution: (960.0, 680.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, spawn_chart_labels)
        .add_systems(
            Update,
            (handle_keys, handle_typing, update_status, update_fields, draw_chart).chain(),
        )
        .run();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_number_characters_are_typed() {
        for c in "0123456789.-+eE_".chars() {
            assert!(accepts(c), "{c}");
        }
        for c in "rR x\t".chars() {
            assert!(!accepts(c), "{c:?}");
        }
    }

    #[test]
    fn typing_after_clear_plots_again() {
        let mut calibrator = Calibrator::new(CalibratorForm::default());
        calibrator.clear();
        calibrator.plot();
        assert!(calibrator.chart.is_none());

        for c in "80".chars() {
            calibrator.form.push_char(calibrator.selected, c);
        }
        calibrator.selected = calibrator.selected.next();
        for c in "1.8".chars() {
            calibrator.form.push_char(calibrator.selected, c);
        }
        calibrator.plot();
        assert!(calibrator.chart.is_some());
        assert!(calibrator.status.starts_with("Depth"));
    }

    #[test]
    fn config_and_water_options_are_taken_out() {
        let mut args: Vec<String> = ["--weight", "80", "--water", "sea"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(take_option(&mut args, "--water"), Some("sea".to_string()));
        assert_eq!(args, ["--weight", "80"]);
        assert_eq!(take_option(&mut args, "--config"), None);
    }
}
