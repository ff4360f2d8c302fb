// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils;
use clap::Args as ClapArgs;
use cscore::property::{PropertyKind, VideoProperty};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Camera device number or path
    device: String,

    /// Set a property before listing, as name=value (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PropertyInfo {
    name: String,
    kind: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<String>,
}

fn describe(property: &VideoProperty) -> Result<PropertyInfo, CliError> {
    let mut info = PropertyInfo {
        name: property.name()?,
        kind: property.kind().to_string(),
        value: String::new(),
        min: None,
        max: None,
        step: None,
        default: None,
        choices: Vec::new(),
    };

    if property.is_string() {
        info.value = property.get_string()?;
        return Ok(info);
    }

    let value = property.get()?;
    info.value = value.to_string();
    info.min = Some(property.min()?);
    info.max = Some(property.max()?);
    info.step = Some(property.step()?);
    info.default = Some(property.default_value()?);

    if property.is_enum() {
        info.choices = property.choices()?;
        if let Some(label) = usize::try_from(value)
            .ok()
            .and_then(|i| info.choices.get(i))
        {
            info.value = format!("{} ({})", value, label);
        }
    }

    Ok(info)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Apply `value` to `property` according to its kind. Enum properties accept
/// either an index or one of their choice labels.
fn assign(property: &VideoProperty, name: &str, value: &str) -> Result<(), CliError> {
    let invalid = || CliError::InvalidArgs(format!("Invalid value for {}: {}", name, value));

    match property.kind() {
        PropertyKind::String => property.set_string(value)?,
        PropertyKind::Boolean => {
            let flag = parse_bool(value).ok_or_else(invalid)?;
            property.set(i32::from(flag))?;
        }
        PropertyKind::Integer => property.set(value.parse().map_err(|_| invalid())?)?,
        PropertyKind::Enum => {
            let index = match value.parse::<i32>() {
                Ok(index) => index,
                Err(_) => {
                    let position = property
                        .choices()?
                        .iter()
                        .position(|choice| choice.eq_ignore_ascii_case(value))
                        .ok_or_else(invalid)?;
                    i32::try_from(position).map_err(|_| invalid())?
                }
            };
            property.set(index)?;
        }
        PropertyKind::None => {
            return Err(CliError::InvalidArgs(format!("No such property: {}", name)))
        }
    }

    log::info!("Set {} = {}", name, value);
    Ok(())
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing props command: {:?}", args);

    // Validate assignments before opening the camera
    let assignments = args
        .set
        .iter()
        .map(|s| utils::parse_assignment(s))
        .collect::<Result<Vec<_>, _>>()?;

    crate::forward_engine_logs();
    let camera = utils::open_camera("props", &args.device)?;

    for (name, value) in &assignments {
        let property = camera.property(name)?;
        assign(&property, name, value)?;
    }

    let properties = camera
        .enumerate_properties()?
        .iter()
        .map(describe)
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        return utils::print_json(&properties);
    }

    for info in &properties {
        let range = match (info.min, info.max, info.step, info.default) {
            (Some(min), Some(max), Some(step), Some(default)) => format!(
                " [min={} max={} step={} default={}]",
                min, max, step, default
            ),
            _ => String::new(),
        };
        println!("{:<32} {:<8} {}{}", info.name, info.kind, info.value, range);
        if !info.choices.is_empty() {
            for (i, choice) in info.choices.iter().enumerate() {
                println!("{:>36} {}", i, choice);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("On"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
