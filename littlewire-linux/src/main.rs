use clap::Parser;
use littlewire::{AdcChannel, LittleWireBuilder, VoltageRef};
use littlewire_linux::{DeviceFilter, DeviceList, RusbSource};

/// List the Little Wire devices, then enumerate the 1-Wire bus of one of them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Serial number of the device to open
    #[arg(short, long)]
    serial: Option<i32>,
    /// Position of the device in the scan, used when no serial is given
    #[arg(short, long, default_value_t = 0)]
    index: usize,
    /// Request timeout in milliseconds
    #[arg(short, long, default_value_t = littlewire::commands::DEFAULT_TIMEOUT_MS)]
    timeout: u32,
    /// Also sample the ADC on pin 2
    #[arg(short, long)]
    adc: bool,
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Find every attached Little Wire
    let mut source = RusbSource::new().expect("Failed to initialize libusb");
    let devices: DeviceList<_> =
        littlewire_linux::scan(&mut source, &DeviceFilter::new()).expect("Failed to scan USB");
    log::info!("Found {} devices", devices.len());
    if devices.dropped() > 0 {
        log::warn!("{} more devices did not fit the list", devices.dropped());
    }
    for (i, dev) in devices.iter().enumerate() {
        log::info!("#{i}: serial {}", dev.serial_number);
    }
    let chosen = match args.serial {
        Some(serial) => devices.find_by_serial(serial),
        None => devices.get(args.index),
    }
    .expect("No matching Little Wire");
    // Open the session
    let mut lw = littlewire_linux::connect(
        &chosen.device,
        LittleWireBuilder::new().with_timeout_ms(args.timeout),
    )
    .expect("Failed to open device");
    let version = lw
        .firmware_version()
        .expect("Failed to read firmware version");
    log::info!("Serial {}, firmware {version}", chosen.serial_number);
    // Enumerate devices on the 1-Wire bus
    let mut rom = lw
        .onewire_first_address()
        .expect("Failed to search 1-Wire bus");
    let mut count = 0;
    while let Some(addr) = rom {
        count += 1;
        log::info!("ROM: {addr}");
        rom = lw
            .onewire_next_address()
            .expect("Failed to search 1-Wire bus");
    }
    log::info!("Found {count} 1-Wire devices");
    if args.adc {
        lw.analog_init(VoltageRef::Vcc)
            .expect("Failed to initialize ADC");
        let value = lw
            .analog_read(AdcChannel::Pin2)
            .expect("Failed to read ADC");
        log::info!("ADC pin 2: {value}");
    }
}
