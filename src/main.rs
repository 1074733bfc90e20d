// in-crate modules
mod config;

// in-crate imports
use config::*;
use max44004::{LightReading, MAX44004, MainConfig, ReceiverConfig, Register};

// my libraries
use xdg_dirs::{dirs, xdg_location_of, xdg_user_dir};

// STD
use std::convert::Infallible;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::{fs, thread, time};

// 3rd party libraries
use anyhow::Context;
use clap::{Parser, Subcommand};
use embedded_hal::i2c::I2c;
use ftdi_embedded_hal as hal;

const CONFIG_PATH: &str = "max44004/config.ron";

const DEFAULT_CONFIG: &str = r#"
(
bus: (
    vendor_id: 0x0403,
    product_id: 0x6014,
    address: 0x40,
),
// green + IR photodiodes, trim off, interrupt off
main_config: Some(0x04),
// 100ms conversion (14 bits), 1x gain
receiver_config: Some(0x00),
poll_interval_ms: 1000,
)
"#;

/// Parse a register byte given as decimal, `0x` hex or `0b` binary.
fn parse_byte(s: &str) -> Result<u8, String> {
    let res = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u8::from_str_radix(&bin.replace('_', ""), 2)
    } else {
        s.parse::<u8>()
    };
    res.map_err(|e| format!("`{s}` is not a byte value: {e}"))
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    #[command(
        about = "(default) Apply the configured settings, then poll the light value periodically."
    )]
    Watch,

    #[command(about = "Read and decode the interrupt status register.")]
    Status,

    #[command(about = "Read and decode the main and receiver configuration registers.")]
    Config,

    #[command(about = "Read the current light value.")]
    Lux,

    #[command(about = "Read and print every register of the sensor.")]
    Dump,

    #[command(about = "Write the main configuration register. Values with reserved bits set are rejected.")]
    SetMain {
        #[arg(value_parser = parse_byte)]
        value: u8,
    },

    #[command(
        about = "Write the receiver configuration register. Values with reserved bits set are rejected."
    )]
    SetReceiver {
        #[arg(value_parser = parse_byte)]
        value: u8,
    },

    #[command(about = "Write the configuration registers from the config file.")]
    Apply,

    #[command(
        about = "Check configuration file syntax and print out the settings that will be applied."
    )]
    Check,

    #[command(about = "Generate a default config file")]
    GenConfig,
}

#[derive(Debug, Parser, PartialEq)]
#[command(
    about = "Diagnostics and control for a MAX44004 ambient light sensor behind an FTDI USB-to-I2C bridge",
    version
)]
struct Args {
    #[arg(
        global = true,
        short,
        long = "config",
        help = format!("Path to configuration file. Defaults to `{CONFIG_PATH}` under the user's config directory."),
    )]
    config_path: Option<PathBuf>,

    #[arg(
        global = true,
        short,
        long,
        value_parser = parse_byte,
        help = "7-bit I2C address of the sensor, overrides the config file."
    )]
    address: Option<u8>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    /// Get the config path, and verify the file exists. This is the either the path passed as an arg, or from the XDG directory if not specified.
    ///
    /// This returns error if the path does not exist.
    fn get_config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config_path {
            Some(path) => path
                .canonicalize()
                .with_context(|| format!("Could not open config file `{0}`", path.display())),
            None => xdg_location_of(&dirs::CONFIG, CONFIG_PATH)
                .with_context(|| "Could not open config file"),
        }
    }
}

/// Load the configuration based on arguments.
/// Uses the file supplied to the CLI, or in the default location if not specified, or the default config if there is no file.
fn get_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match args.get_config_path() {
        Ok(path) => {
            log::info!("Reading config from {path}", path = path.display());
            Config::read_from_file(&path)
                .with_context(|| format!("Failed to parse config file {0}", path.display()))?
        }
        Err(err) => {
            log::warn!(
                "Config file not found in any standard locations, using default configuration."
            );
            log::warn!("  Config search error: {err:#}");
            Config::from_str(DEFAULT_CONFIG)?
        }
    };

    if let Some(address) = args.address {
        config.bus.address = address;
    }

    Ok(config)
}

/// Open the FTDI bridge and attach the sensor on it. No sensor I/O happens here.
fn open_sensor(bus: &BusConfig) -> anyhow::Result<MAX44004<impl I2c>> {
    let device = ftdi::find_by_vid_pid(bus.vendor_id, bus.product_id)
        .interface(ftdi::Interface::A)
        .open()
        .with_context(|| {
            format!(
                "Could not open FTDI device {0:04x}:{1:04x}",
                bus.vendor_id, bus.product_id
            )
        })?;
    let i2c = hal::FtHal::init_default(device)?.i2c()?;

    log::debug!("Attached MAX44004 at address {0:#04x}", bus.address);
    Ok(MAX44004::open_at(i2c, bus.address))
}

/// Driver errors carry the transport's error type, which isn't necessarily `Send + Sync`; flatten to a message.
fn driver_err<E: std::fmt::Debug>(err: max44004::Error<E>) -> anyhow::Error {
    anyhow::anyhow!("{err}")
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::debug!("args = {args:?}");

    // process commands
    match args.command {
        // Primary behaviour: apply settings then repeatedly read the light value
        None | Some(Command::Watch) => watch(&args),

        Some(Command::Status) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            print!("{}", sensor.read_status().map_err(driver_err)?);
            Ok(())
        }

        Some(Command::Config) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            print!("{}", sensor.read_main_config().map_err(driver_err)?);
            print!("{}", sensor.read_receiver_config().map_err(driver_err)?);
            Ok(())
        }

        Some(Command::Lux) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            print!("{}", sensor.read_light_value().map_err(driver_err)?);
            Ok(())
        }

        Some(Command::Dump) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            dump_registers(&sensor)
        }

        Some(Command::SetMain { value }) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            sensor
                .write_main_config(value)
                .map_err(driver_err)
                .context("Main config not written")?;
            print!("{}", sensor.read_main_config().map_err(driver_err)?);
            Ok(())
        }

        Some(Command::SetReceiver { value }) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            sensor
                .write_receiver_config(value)
                .map_err(driver_err)
                .context("Receiver config not written")?;
            print!("{}", sensor.read_receiver_config().map_err(driver_err)?);
            Ok(())
        }

        Some(Command::Apply) => {
            let config = get_config(&args)?;
            let sensor = open_sensor(&config.bus)?;
            apply_config(&sensor, &config)
        }

        // Test config file: make sure it exists, can be read, and can be parsed
        Some(Command::Check) => check_config(&args),

        // Generate config file: if the file does not already exist, write
        Some(Command::GenConfig) => gen_config_file(&args),
    }
}

/// Write the configuration bytes from the config file, if any are set.
/// Nothing is written unless every configured byte is valid.
fn apply_config<I: I2c>(sensor: &MAX44004<I>, config: &Config) -> anyhow::Result<()> {
    sensor
        .apply_config(config.main_config, config.receiver_config)
        .map_err(driver_err)
        .context("Failed to apply configuration from the config file")?;

    if let Some(main) = config.main_config {
        log::info!("Applied main config {main:#04x}");
    }
    if let Some(receiver) = config.receiver_config {
        log::info!("Applied receiver config {receiver:#04x}");
    }
    Ok(())
}

/// Validate and decode the configured register bytes, without touching a device.
fn validate_config(
    config: &Config,
) -> anyhow::Result<(Option<MainConfig>, Option<ReceiverConfig>)> {
    let main = config
        .main_config
        .map(MainConfig::validate::<Infallible>)
        .transpose()
        .context("main_config in the config file is not writable")?;
    let receiver = config
        .receiver_config
        .map(ReceiverConfig::validate::<Infallible>)
        .transpose()
        .context("receiver_config in the config file is not writable")?;
    Ok((main, receiver))
}

fn dump_registers<I: I2c>(sensor: &MAX44004<I>) -> anyhow::Result<()> {
    for register in Register::ALL {
        let value = sensor.read_register(register).map_err(driver_err)?;
        println!("{0:#04x} {register:?} : {value:#04x}", register.addr());
    }
    Ok(())
}

/// Verify the config file: Make sure it can be found at the expected location (passed through CLI or using XDG config location), and parses properly.
fn check_config(args: &Args) -> anyhow::Result<()> {
    // Try to _find_ the config file
    let path = args
        .get_config_path()
        .with_context(|| "Failed to find config file")?;

    // Try to _parse_ the config file
    println!("Attempting to load config from `{0}`", path.display());
    let config = Config::read_from_file(path).with_context(|| "Failed to parse configuration")?;

    println!("Successfully read config: {config:#?}");

    // Decode the configured bytes the way the sensor would see them
    let (main, receiver) = validate_config(&config)?;
    if let Some(main) = main {
        println!("main_config: {main:?}");
    }
    if let Some(receiver) = receiver {
        println!("receiver_config: {receiver:?}");
    }

    Ok(())
}

/// Generate a default configuration file, at the expected location based on args or environment variables.
fn gen_config_file(args: &Args) -> anyhow::Result<()> {
    // CLI arg path, or default from environment
    let path = args
        .config_path
        .clone()
        .map_or_else(|| xdg_user_dir(&dirs::CONFIG, CONFIG_PATH), Ok)
        .with_context(|| "Could not determine location for config file")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "Failed to create parent directory of the new config file {0}",
                path.display()
            )
        })?;
    }

    // Never overwrite an existing file
    let mut file = File::create_new(&path)
        .with_context(|| format!("Failed to create new config file {0}", path.display()))?;

    write!(file, "{}", DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write the new config file {0}", path.display()))?;

    println!("Wrote default configuration to {0}", path.display());
    Ok(())
}

/// Default behaviour: apply the configuration, then read the light value forever.
fn watch(args: &Args) -> anyhow::Result<()> {
    let config = get_config(args)?;
    log::info!("Loaded configuration: {config:?}");

    let sensor = open_sensor(&config.bus)?;
    apply_config(&sensor, &config)?;

    let interval = time::Duration::from_millis(config.poll_interval_ms);
    let mut last = None;
    loop {
        let reading = sensor.read_light_value().map_err(driver_err)?;

        if last != Some(reading) {
            match reading {
                LightReading::Counts(counts) => log::info!("light={counts}"),
                LightReading::Overflow => log::warn!("light reading overflowed, lower the gain"),
            }
        }
        print!("{reading}");
        last = Some(reading);

        thread::sleep(interval);
    }
}
