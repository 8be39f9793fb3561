mod app;
mod cli;

use anyhow::Result;

use roundcut_engine::device::GpuInit;
use roundcut_engine::logging::{init_logging, LoggingConfig};
use roundcut_engine::render::reference::render_reference;
use roundcut_engine::window::{Runtime, RuntimeConfig};

use crate::app::DemoApp;
use crate::cli::{Command, Options};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let options = Options::parse(std::env::args().skip(1))?;
    let config = options.renderer_config();

    match options.command {
        Command::Window => {
            log::info!(
                "opening window: radius={} precision={}",
                config.geometry.radius,
                config.geometry.precision
            );
            Runtime::run(
                RuntimeConfig {
                    title: "Rounded corners (stencil)".to_string(),
                    ..RuntimeConfig::default()
                },
                GpuInit::default(),
                DemoApp::new(config),
            )
        }
        Command::Ascii { width, height } => {
            let fb = render_reference(&config, width, height);
            print!("{}", fb.to_ascii(config.fill_color));
            Ok(())
        }
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(())
        }
    }
}
