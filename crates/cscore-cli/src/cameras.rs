// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils;
use clap::Args as ClapArgs;
use cscore::camera::{UsbCamera, UsbCameraInfo};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Also list alternate device paths (by-id, by-path links)
    #[arg(short, long)]
    all_paths: bool,
}

#[derive(Debug, Serialize)]
struct CameraEntry {
    device: i32,
    path: String,
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    other_paths: Vec<String>,
    vendor_id: String,
    product_id: String,
}

impl CameraEntry {
    fn new(info: UsbCameraInfo, all_paths: bool) -> Self {
        CameraEntry {
            device: info.device,
            path: info.path,
            name: info.name,
            other_paths: if all_paths {
                info.other_paths
            } else {
                Vec::new()
            },
            vendor_id: format!("{:04x}", info.vendor_id),
            product_id: format!("{:04x}", info.product_id),
        }
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing cameras command: {:?}", args);
    crate::forward_engine_logs();

    let cameras: Vec<CameraEntry> = UsbCamera::enumerate()?
        .into_iter()
        .map(|info| CameraEntry::new(info, args.all_paths))
        .collect();

    if json {
        return utils::print_json(&cameras);
    }

    if cameras.is_empty() {
        println!("No USB cameras found");
        return Ok(());
    }

    for camera in &cameras {
        println!(
            "{:>3}  {:<20} {:<32} [{}:{}]",
            camera.device, camera.path, camera.name, camera.vendor_id, camera.product_id
        );
        for path in &camera.other_paths {
            println!("     {}", path);
        }
    }

    Ok(())
}
