use anyhow::{bail, Context, Result};

use roundcut_engine::geometry::CutoutParams;
use roundcut_engine::render::RendererConfig;

pub const USAGE: &str = "\
usage: roundcut-demo [--radius R] [--precision N] [--ascii [WxH]]

  --radius R      corner radius as a fraction of the half-extent (default 0.5)
  --precision N   arc points per corner (default 256)
  --ascii [WxH]   render on the CPU and print the frame as text (default 64x32)
  --help          show this message";

const DEFAULT_ASCII: (u32, u32) = (64, 32);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    Window,
    Ascii { width: u32, height: u32 },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub command: Command,
    pub geometry: CutoutParams,
}

impl Options {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options {
            command: Command::Window,
            geometry: CutoutParams::default(),
        };
        let mut args = args.into_iter().peekable();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--radius" => {
                    let v = args.next().context("--radius needs a value")?;
                    options.geometry.radius =
                        v.parse().with_context(|| format!("invalid radius {v:?}"))?;
                }
                "--precision" => {
                    let v = args.next().context("--precision needs a value")?;
                    options.geometry.precision =
                        v.parse().with_context(|| format!("invalid precision {v:?}"))?;
                }
                "--ascii" => {
                    let (width, height) = match args.next_if(|a| !a.starts_with("--")) {
                        Some(size) => parse_size(&size)?,
                        None => DEFAULT_ASCII,
                    };
                    options.command = Command::Ascii { width, height };
                }
                "-h" | "--help" => options.command = Command::Help,
                other => bail!("unknown argument {other:?}\n\n{USAGE}"),
            }
        }

        if options.geometry.radius > 1.0 {
            log::warn!("radius {} > 1: corner arcs will overlap", options.geometry.radius);
        }
        if options.geometry.precision == 0 {
            log::warn!("precision 0: no corner cutouts will be drawn");
        }

        Ok(options)
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            geometry: self.geometry,
            ..RendererConfig::default()
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("size {s:?} is not WxH"))?;
    let width: u32 = w.parse().with_context(|| format!("invalid width in {s:?}"))?;
    let height: u32 = h.parse().with_context(|| format!("invalid height in {s:?}"))?;
    anyhow::ensure!(width > 0 && height > 0, "size {s:?} must be non-zero");
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_opens_a_window_with_defaults() {
        let o = parse(&[]).unwrap();
        assert_eq!(o.command, Command::Window);
        assert_eq!(o.geometry, CutoutParams::default());
    }

    #[test]
    fn geometry_flags_override_defaults() {
        let o = parse(&["--radius", "0.25", "--precision", "32"]).unwrap();
        assert_eq!(o.geometry, CutoutParams { radius: 0.25, precision: 32 });
        assert_eq!(o.renderer_config().geometry.precision, 32);
    }

    #[test]
    fn ascii_size_is_optional() {
        assert_eq!(
            parse(&["--ascii"]).unwrap().command,
            Command::Ascii { width: 64, height: 32 }
        );
        assert_eq!(
            parse(&["--ascii", "40x20", "--radius", "0.3"]).unwrap().command,
            Command::Ascii { width: 40, height: 20 }
        );
        assert_eq!(
            parse(&["--ascii", "--precision", "8"]).unwrap().geometry.precision,
            8
        );
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(parse(&["--radius"]).is_err());
        assert!(parse(&["--precision", "-3"]).is_err());
        assert!(parse(&["--ascii", "40by20"]).is_err());
        assert!(parse(&["--ascii", "0x20"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
