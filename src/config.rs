use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_vendor_id() -> u16 {
    0x0403
}

fn default_product_id() -> u16 {
    0x6014
}

fn default_address() -> u8 {
    max44004::I2C_ADDR
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

/// USB-to-I2C bridge and sensor address.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct BusConfig {
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
    #[serde(default = "default_address")]
    pub address: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            address: default_address(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub bus: BusConfig,

    /// Raw main config byte to apply before polling. Validated like any other write.
    #[serde(default)]
    pub main_config: Option<u8>,

    /// Raw receiver config byte to apply before polling.
    #[serde(default)]
    pub receiver_config: Option<u8>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Config {
    pub fn from_str(conf: &str) -> Result<Self, anyhow::Error> {
        Ok(ron::from_str::<Config>(conf)?)
    }

    pub fn read_from_file<P: AsRef<Path>>(file: P) -> Result<Self, anyhow::Error> {
        Ok(ron::de::from_reader(BufReader::new(File::open(file)?))?)
    }
}
