// config.rs - Command-line options for the viewer

use clap::{Parser, ValueEnum};
use grid_display::{
    ConfigError, Encoding, EngineOptions, GridDimensions, RateConfig, RenderConfig, SchedulerConfig, MAX_CELL_SIZE,
    MAX_RENDERS_PER_SECOND,
};

/// Command-line arguments for launching the viewer.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Grid dimensions expressed as WIDTHxHEIGHT (for example 96x64), each side 1..=1024.
    #[arg(
        short = 's',
        long = "size",
        value_name = "WIDTHxHEIGHT",
        default_value = "64x64",
        value_parser = parse_grid_size
    )]
    pub size: GridDimensions,
    /// Pixels per cell, not counting the one pixel grid line.
    #[arg(
        long = "cell-size",
        value_name = "PIXELS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=MAX_CELL_SIZE as i64)
    )]
    pub cell_size: u32,
    /// Generations drawn per second. 0 holds the current generation.
    #[arg(
        short = 'r',
        long = "rate",
        value_name = "PER_SECOND",
        default_value_t = 15,
        value_parser = clap::value_parser!(u32).range(0..=MAX_RENDERS_PER_SECOND as i64)
    )]
    pub rate: u32,
    /// Display refresh rate the throttle divides down from.
    #[arg(
        long = "native-rate",
        value_name = "HZ",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=480)
    )]
    pub native_rate: u32,
    /// How the engine packs cells into memory.
    #[arg(long, value_enum, default_value_t = EncodingArg::Bit)]
    pub encoding: EncodingArg,
    /// Start from an empty grid instead of a random soup.
    #[arg(long)]
    pub empty: bool,
    /// Seed for the random soup; omitted means a fresh soup every reset.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Initial display zoom (displayed pixels per surface pixel).
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    /// One byte per cell
    Byte,
    /// One bit per cell
    Bit,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Byte => Encoding::BytePerCell,
            EncodingArg::Bit => Encoding::BitPerCell,
        }
    }
}

/// `WIDTHxHEIGHT` (case-insensitive `x`, blanks allowed around the numbers).
fn parse_grid_size(value: &str) -> Result<GridDimensions, String> {
    let Some((width, height)) = value.split_once(['x', 'X']) else {
        return Err(format!("`{value}` is not WIDTHxHEIGHT"));
    };
    let side = |text: &str, what: &str| {
        text.trim()
            .parse::<u32>()
            .map_err(|err| format!("{what} `{}`: {err}", text.trim()))
    };
    GridDimensions::checked(side(width, "width")?, side(height, "height")?).map_err(|err| err.to_string())
}

impl CliArgs {
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        Ok(SchedulerConfig {
            render: RenderConfig::new(self.cell_size)?,
            rate: RateConfig::new(self.rate)?,
            native_frame_rate: self.native_rate,
            engine: EngineOptions {
                empty: self.empty,
                size: Some(self.size),
            },
            ..SchedulerConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grid_size() {
        assert_eq!(parse_grid_size("96x64"), Ok(GridDimensions::new(96, 64)));
        assert_eq!(parse_grid_size(" 8 X 4 "), Ok(GridDimensions::new(8, 4)));
        assert!(parse_grid_size("96").is_err());
        assert!(parse_grid_size("0x5").is_err());
        assert!(parse_grid_size("ax5").is_err());
    }

    #[test]
    fn huge_grid_is_refused() {
        assert!(parse_grid_size("1000000000x1").is_err());
        assert!(parse_grid_size("1025x8").is_err());
        assert_eq!(parse_grid_size("1024x1024"), Ok(GridDimensions::square(1024)));
        assert!(CliArgs::try_parse_from(["conway_canvas", "--size", "1000000000x1"]).is_err());
    }

    #[test]
    fn defaults_build_a_config() {
        let args = CliArgs::try_parse_from(["conway_canvas"]).unwrap();
        let config = args.scheduler_config().unwrap();
        assert_eq!(config.render.cell_size(), 5);
        assert_eq!(config.rate.target(), 15);
        assert_eq!(config.native_frame_rate, 60);
        assert_eq!(config.engine.size, Some(GridDimensions::square(64)));
        assert!(!config.engine.empty);
        assert_eq!(Encoding::from(args.encoding), Encoding::BitPerCell);
    }

    #[test]
    fn flags_are_applied() {
        let args = CliArgs::try_parse_from([
            "conway_canvas", "--size", "20x10", "--cell-size", "3", "--rate", "0", "--encoding", "byte", "--empty",
            "--seed", "9",
        ])
        .unwrap();
        let config = args.scheduler_config().unwrap();
        assert_eq!(config.engine.size, Some(GridDimensions::new(20, 10)));
        assert_eq!(config.render.cell_size(), 3);
        assert_eq!(config.rate.target(), 0);
        assert!(config.engine.empty);
        assert_eq!(args.seed, Some(9));
        assert_eq!(Encoding::from(args.encoding), Encoding::BytePerCell);
    }

    #[test]
    fn rate_above_sixty_is_refused() {
        assert!(CliArgs::try_parse_from(["conway_canvas", "--rate", "61"]).is_err());
        assert!(CliArgs::try_parse_from(["conway_canvas", "--cell-size", "0"]).is_err());
    }
}
