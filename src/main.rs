use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use nbcalibrator::chart::{self, Chart};
use nbcalibrator::{export, logging, CalibratorForm, Environment, Field, FormDefaults, Intermediates};

const SVG_WIDTH: u32 = 800;
const SVG_HEIGHT: u32 = 600;

#[derive(Debug, Default)]
struct CliArgs {
    fields: Vec<(Field, String)>,
    config: Option<PathBuf>,
    water: Option<Environment>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    svg: Option<PathBuf>,
    help: bool,
}

// flag/value pairs; field values stay raw text for the form to validate
fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        if flag == "-h" || flag == "--help" {
            cli.help = true;
            continue;
        }
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {flag}."))?
            .clone();
        match flag.as_str() {
            "--config" => cli.config = Some(value.into()),
            "--water" => {
                let env = Environment::preset(&value)
                    .ok_or_else(|| format!("Unknown water {value}, expected fresh or sea."))?;
                cli.water = Some(env);
            }
            "--csv" => cli.csv = Some(value.into()),
            "--json" => cli.json = Some(value.into()),
            "--svg" => cli.svg = Some(value.into()),
            other => {
                let field = Field::from_flag(other).ok_or_else(|| format!("Unknown option {other}."))?;
                cli.fields.push((field, value));
            }
        }
    }
    Ok(cli)
}

fn print_usage() {
    let mut usage = String::from("Usage: nbcalibrator --weight <kg> --height <m> [options]\n");
    for field in Field::ALL {
        usage.push_str(&format!("  {:<16} {}\n", field.flag(), field.label()));
    }
    usage.push_str(
        "  --config <json>  Defaults for the optional fields\n\
         \x20 --water <kind>   fresh or sea, replaces density, gravity and p0 defaults\n\
         \x20 --csv <path>     Write the curve as CSV\n\
         \x20 --json <path>    Write parameters and curve as JSON\n\
         \x20 --svg <path>     Write the chart as SVG",
    );
    eprintln!("{usage}");
}

fn run(cli: CliArgs) -> Result<ExitCode> {
    let _logger = logging::setup()?;

    let mut defaults = match &cli.config {
        Some(path) => FormDefaults::load(path)
            .with_context(|| format!("Unable to use defaults from {}", path.display()))?,
        None => FormDefaults::default(),
    };
    if let Some(env) = cli.water {
        defaults = defaults.with_environment(env);
    }

    let mut form = CalibratorForm::new(defaults);
    for (field, value) in &cli.fields {
        form.set(*field, value.as_str());
    }

    let (params, curve) = match form.plot() {
        Ok(plot) => (plot.parameters, plot.curve.clone()),
        Err(err) => {
            eprintln!("Error: {}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    let derived = Intermediates::from_parameters(&params);

    println!(
        "Diver: weight={} kg, equipment={} kg, height={} m, depth={} m",
        params.weight, params.equip_weight, params.height, params.depth
    );
    println!(
        "Environment: p0={} Pa, density={} kg/m³, gravity={} m/s², drag coefficient={}",
        params.p0, params.density, params.gravity, params.drag_coefficient
    );
    println!(
        "Pressure at depth: {:.1} Pa ({:.3} m of fluid column)",
        derived.pressure,
        params.environment().pressure_head(derived.pressure)
    );
    println!(
        "V0={:.6} m³, A={:.6} m², V1={:.6} m³, fb={:.4} N",
        derived.body_volume, derived.frontal_area, derived.equipment_volume, derived.buoyant_force
    );
    println!();
    println!("{}", chart::TITLE);
    println!(
        "{:>16} {:>16} {:>16}",
        chart::X_LABEL,
        chart::DESCENT_LABEL,
        chart::ASCENT_LABEL
    );
    for (velocity, descent, ascent) in curve.samples() {
        println!("{velocity:>16.4} {descent:>16.4} {ascent:>16.4}");
    }
    println!();
    println!("{}", chart::WARNING);

    if let Some(path) = &cli.csv {
        export::export_csv(&curve, path)
            .with_context(|| format!("Unable to write {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        export::export_json(&params, &curve, path)
            .with_context(|| format!("Unable to write {}", path.display()))?;
    }
    if let Some(path) = &cli.svg {
        let svg = Chart::from_curve(&curve)
            .to_svg(SVG_WIDTH, SVG_HEIGHT)
            .context("Unable to render chart")?;
        export::export_svg(&svg, path)
            .with_context(|| format!("Unable to write {}", path.display()))?;
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) if cli.help => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
