mod args;

use anyhow::Context;
use args::{BirthArgs, Cli, Command};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use urania::chart::{ChartComposer, ChartInput, ChartResult, ChartSettings};
use urania::{
    annual_profection_with, generate_astrocartography, generate_composite, generate_progression,
    generate_synastry, generate_transits, lunar_return, saturn_return, solar_return, TransitRange,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            urania_config::parse_config(&text)?
        }
        None => urania_config::load_or_default()?,
    };
    let composer = ChartComposer::new(config.engine);
    let defaults = config.settings;

    match cli.command {
        Command::Chart { birth, settings } => {
            let settings = settings.apply(defaults);
            let chart = natal(&composer, &birth, &settings)?;
            emit(&chart, cli.pretty)
        }
        Command::Composite {
            first,
            second,
            method,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let a = chart_from_file(&composer, &first, &settings)?;
            let b = chart_from_file(&composer, &second, &settings)?;
            let composite = generate_composite(&composer, &a, &b, method, &settings)?;
            emit(&composite, cli.pretty)
        }
        Command::Synastry {
            first,
            second,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let a = chart_from_file(&composer, &first, &settings)?;
            let b = chart_from_file(&composer, &second, &settings)?;
            emit(&generate_synastry(&a, &b, &settings), cli.pretty)
        }
        Command::Transits {
            birth,
            from,
            to,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let base = natal(&composer, &birth, &settings)?;
            let range = TransitRange::new(from, to)?;
            emit(&generate_transits(&composer, &base, range, &settings)?, cli.pretty)
        }
        Command::Progression {
            birth,
            target,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let base = natal(&composer, &birth, &settings)?;
            emit(&generate_progression(&composer, &base, target, &settings)?, cli.pretty)
        }
        Command::SolarReturn {
            birth,
            year,
            location,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let base = natal(&composer, &birth, &settings)?;
            let location = location.coordinates()?;
            let result = solar_return(&composer, &base, year, location.as_ref(), &settings)?;
            emit(&result, cli.pretty)
        }
        Command::LunarReturn {
            birth,
            year,
            month,
            location,
            settings,
        } => {
            let settings = settings.apply(defaults);
            let base = natal(&composer, &birth, &settings)?;
            let location = location.coordinates()?;
            let result = lunar_return(&composer, &base, year, month, location.as_ref(), &settings)?;
            emit(&result, cli.pretty)
        }
        Command::Profection {
            birth,
            on,
            modern_rulers,
        } => {
            let base = natal(&composer, &birth, &defaults)?;
            emit(&annual_profection_with(&base, on, modern_rulers)?, cli.pretty)
        }
        Command::SaturnReturn { birth } => {
            let base = natal(&composer, &birth, &defaults)?;
            emit(&saturn_return(&composer, &base)?, cli.pretty)
        }
        Command::Astrocartography { birth, settings } => {
            let settings = settings.apply(defaults);
            let base = natal(&composer, &birth, &settings)?;
            emit(&generate_astrocartography(&base, &settings), cli.pretty)
        }
    }
}

fn natal(composer: &ChartComposer, birth: &BirthArgs, settings: &ChartSettings) -> anyhow::Result<ChartResult> {
    let input = birth.to_input()?;
    composer
        .generate_chart(&input, settings)
        .with_context(|| format!("Failed to cast chart for {} {}", input.date, input.time))
}

/// Read a JSON `ChartInput` and cast it.
fn chart_from_file(composer: &ChartComposer, path: &Path, settings: &ChartSettings) -> anyhow::Result<ChartResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart input {}", path.display()))?;
    let input: ChartInput = serde_json::from_str(&text)
        .with_context(|| format!("Invalid chart input JSON in {}", path.display()))?;
    log::debug!("Loaded chart input from {}", path.display());
    composer
        .generate_chart(&input, settings)
        .with_context(|| format!("Failed to cast chart from {}", path.display()))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
