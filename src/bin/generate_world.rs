//! World generator binary: runs one generation pass and prints a summary.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --theme <NAME>       forest, winter, or inferno (default: forest)
//!   --seed <SEED>        Decoration and cloud seed (default: from config)
//!   --noise-seed <SEED>  Height noise seed (default: from config)
//!   --radius <R>         Play radius in world units (default: 16)
//!   --config <PATH>      JSON generation config; flags override its values

use std::process::ExitCode;
use std::str::FromStr;

use serde_json::json;

use hexscape::core::{Error, Result};
use hexscape::generation::{GeneratedWorld, GenerationConfig, GenerationPipeline, Theme};

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let mut config = match parse_arg::<String>(args, "--config")? {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = parse_arg(args, "--seed")? {
        config.rng_seed = seed;
    }
    if let Some(seed) = parse_arg(args, "--noise-seed")? {
        config.noise_seed = seed;
    }
    if let Some(radius) = parse_arg(args, "--radius")? {
        config.grid.play_radius = radius;
    }

    let theme_name = parse_arg::<String>(args, "--theme")?.unwrap_or_else(|| "forest".to_string());
    let theme = Theme::by_name(&theme_name)
        .ok_or_else(|| Error::InvalidConfig(format!("unknown theme '{}'", theme_name)))?;

    let world = GenerationPipeline::new(config, theme)?.generate();
    let summary = summarize(&world);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(world: &GeneratedWorld) -> serde_json::Value {
    let batches: Vec<_> = world
        .batches
        .iter()
        .map(|b| {
            json!({
                "biome": b.biome,
                "material": b.material,
                "vertices": b.buffer.vertex_count(),
                "triangles": b.buffer.triangle_count(),
                "bounds": b.buffer.bounds(),
            })
        })
        .collect();

    let clouds: Vec<_> = world
        .clouds
        .iter()
        .map(|c| json!({ "offset": c.offset, "yaw": c.yaw, "material": c.material }))
        .collect();

    let fixtures: Vec<_> = world
        .fixtures
        .iter()
        .map(|f| {
            json!({
                "kind": f.kind,
                "material": f.material,
                "triangles": f.buffer.triangle_count(),
            })
        })
        .collect();

    json!({
        "theme": world.theme.name,
        "palette": world.theme.palette,
        "batches": batches,
        "terrain_bounds": world.terrain_bounds(),
        "placements": world.placements.len(),
        "clouds": clouds,
        "fixtures": fixtures,
        "stats": world.stats,
    })
}

/// Value following `flag`. A flag with a missing or malformed value is an error.
fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args
        .get(i + 1)
        .ok_or_else(|| Error::InvalidConfig(format!("missing value for {}", flag)))?;
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidConfig(format!("invalid value '{}' for {}", value, flag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_arg_present() {
        let argv = args(&["generate_world", "--seed", "42", "--radius", "8.5"]);
        assert_eq!(parse_arg::<u64>(&argv, "--seed").unwrap(), Some(42));
        assert_eq!(parse_arg::<f32>(&argv, "--radius").unwrap(), Some(8.5));
        assert_eq!(parse_arg::<u32>(&argv, "--noise-seed").unwrap(), None);
    }

    #[test]
    fn test_parse_arg_malformed_value() {
        let argv = args(&["generate_world", "--seed", "abc"]);
        let err = parse_arg::<u64>(&argv, "--seed").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let argv = args(&["generate_world", "--seed"]);
        assert!(parse_arg::<u64>(&argv, "--seed").is_err());
    }

    #[test]
    fn test_run_rejects_malformed_seed() {
        let argv = args(&["generate_world", "--seed", "abc"]);
        assert!(run(&argv).is_err());
    }
}
