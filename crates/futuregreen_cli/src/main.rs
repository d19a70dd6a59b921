//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `futuregreen_core` linkage from a tiny executable.
//! - Run the pure derived-field rules from the command line.
//!
//! Usage:
//! - `futuregreen_cli` prints the core version.
//! - `futuregreen_cli convert <area> <from_unit> <to_unit>`
//! - `futuregreen_cli split <full name...>`
//! - `futuregreen_cli render <mode> <text>`

use futuregreen_core::{
    convert, core_version, init_logging_from_config, split_name, AreaUnit, MarkupMode,
    MarkupRenderer, SiteConfig,
};
use rust_decimal::Decimal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = SiteConfig::from_env();
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(format!("futuregreen_core version={}", core_version()));
    };

    match command.as_str() {
        "convert" => {
            let [area, from, to] = rest else {
                return Err("usage: convert <area> <from_unit> <to_unit>".to_string());
            };
            let area = area
                .parse::<Decimal>()
                .map_err(|err| format!("invalid area `{area}`: {err}"))?;
            let from = parse_unit(from)?;
            let to = parse_unit(to)?;
            let converted = convert(area, from, to).map_err(|err| err.to_string())?;
            Ok(format!("{converted} {to}"))
        }
        "split" => {
            let parts = split_name(&rest.join(" ")).map_err(|err| err.to_string())?;
            Ok(format!(
                "first={:?} middle={:?} last={:?}",
                parts.first_name, parts.middle_name, parts.last_name
            ))
        }
        "render" => {
            let [mode, text] = rest else {
                return Err("usage: render <mode> <text>".to_string());
            };
            Ok(MarkupRenderer::default().render(text, MarkupMode::parse(mode)))
        }
        other => Err(format!("unknown command `{other}`")),
    }
}

fn parse_unit(value: &str) -> Result<AreaUnit, String> {
    AreaUnit::parse(value).ok_or_else(|| {
        format!("unknown unit `{value}`; expected square_foot|square_meter|acre|hectare")
    })
}

#[cfg(test)]
mod tests {
    use super::run;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn convert_command_prints_value_and_unit() {
        let output = run(&args(&["convert", "1", "acre", "sqft"])).unwrap();
        assert_eq!(output, "43560 square feet");
    }

    #[test]
    fn split_command_joins_arguments() {
        let output = run(&args(&["split", "Jane", "Q", "Doe"])).unwrap();
        assert_eq!(output, "first=\"Jane\" middle=\"Q\" last=\"Doe\"");
    }

    #[test]
    fn unknown_unit_is_reported() {
        let err = run(&args(&["convert", "1", "acre", "rood"])).unwrap_err();
        assert!(err.contains("unknown unit"));
    }
}
