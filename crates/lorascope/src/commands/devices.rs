//! Device command handlers.

use tabled::Tabled;

use lorascope_core::table::PLACEHOLDER;
use lorascope_core::{Controller, DeviceSummary};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "DevEUI")]
    dev_eui: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Events")]
    events: u64,
}

impl From<&DeviceSummary> for DeviceRow {
    fn from(d: &DeviceSummary) -> Self {
        Self {
            dev_eui: d.dev_eui.clone(),
            name: d.device_name.clone().unwrap_or_else(|| PLACEHOLDER.into()),
            events: d.event_count,
        }
    }
}

fn render_devices(format: &OutputFormat, devices: &[DeviceSummary]) -> String {
    output::render_list(format, devices, |d| DeviceRow::from(d), |d| d.dev_eui.clone())
}

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = controller.list_devices().await?;
            let out = render_devices(&global.output, &devices);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
