use clap::Parser;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{Delay, SpidevDevice};
use max31865::{Max31865Builder, SPI_CLOCK_HZ, WiringMode};

/// Poll a MAX31865 RTD front end and log the resistance codes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to SPI device (e.g., /dev/spidev0.0)
    #[arg(short, long)]
    path: String,
    /// Number of RTD lead wires (2, 3 or 4)
    #[arg(short, long, default_value_t = 4)]
    wires: u8,
    /// Milliseconds between readings
    #[arg(short, long, default_value_t = 1000)]
    interval: u64,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    let wires = match args.wires {
        2 => WiringMode::TwoWire,
        3 => WiringMode::ThreeWire,
        4 => WiringMode::FourWire,
        n => panic!("Unsupported RTD wire count: {n}"),
    };
    // Open the SPI bus with the electrical parameters the chip requires
    let mut spi = SpidevDevice::open(&args.path).expect("Failed to open SPI device");
    spi.0
        .configure(
            &SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(SPI_CLOCK_HZ)
                .mode(SpiModeFlags::SPI_MODE_1)
                .build(),
        )
        .expect("Failed to configure SPI device");
    // Create a MAX31865 instance with the chip in a known state
    let mut rtd = Max31865Builder::default()
        .with_wires(wires)
        .build(spi, Delay)
        .expect("Failed to create MAX31865 instance");
    loop {
        // Run a one-shot conversion
        let code = rtd.read_rtd().expect("Failed to read RTD");
        log::info!("RTD code: {code}");
        // Faults are latched; report and clear them
        let status = rtd.read_fault().expect("Failed to read fault status");
        if status.has_fault() {
            log::warn!("Fault status: {status:?}");
            rtd.clear_fault().expect("Failed to clear faults");
        }
        std::thread::sleep(std::time::Duration::from_millis(args.interval));
    }
}
