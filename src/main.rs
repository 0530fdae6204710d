//! Demo: draw a greeting on the 2.7" panel wired to an ESP32-S3
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::iso_8859_15::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{self, InterruptType, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi;

use epaper::epd::{Pins, SPI_FREQUENCY_HZ, SPI_MODE};
use epaper::{Epd, PanelModel, PixelSource, Timing};

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    log::info!(
        "Panel wiring: CS {} DC {} RST {} BUSY {} SCK {} MOSI {} POWER {}",
        Pins::CS,
        Pins::DC,
        Pins::RST,
        Pins::BUSY,
        Pins::SCK,
        Pins::MOSI,
        Pins::POWER
    );

    // Chip select is driven by the driver itself, one bracket per byte
    let driver = spi::SpiDriver::new(
        peripherals.spi2,
        pins.gpio12,                    // SCK - Pins::SCK
        pins.gpio11,                    // MOSI - Pins::MOSI
        Option::<gpio::AnyIOPin>::None, // the panel is write-only
        &spi::SpiDriverConfig::new(),
    )?;
    let bus_config = spi::SpiConfig::new()
        .baudrate(SPI_FREQUENCY_HZ.Hz())
        .data_mode(SPI_MODE);
    let bus = spi::SpiBusDriver::new(driver, &bus_config)?;

    log::info!("Enabling display power (pin 7)");
    let mut power = gpio::PinDriver::output(pins.gpio7)?;
    power.set_high()?;

    let mut busy = gpio::PinDriver::input(pins.gpio48)?; // Pins::BUSY
    busy.set_pull(Pull::Down)?;
    busy.set_interrupt_type(InterruptType::PosEdge)?;

    let delay = Delay::default();
    delay.delay_ms(100); // Wait for power to stabilize

    let mut epd = Epd::new(
        bus,
        gpio::PinDriver::output(pins.gpio45)?, // Pins::CS
        gpio::PinDriver::output(pins.gpio46)?, // Pins::DC
        gpio::PinDriver::output(pins.gpio47)?, // Pins::RST
        busy,
        delay,
        PanelModel::EPD_2IN7,
        Timing::default(),
    )?;

    epd.init()?;
    epd.clear_screen()?;

    let width = epd.model().width();
    let height = epd.model().height();

    let title = epd.write("Hello from Rust", &FONT_10X20);
    epd.add_layer(&title, 0, 4, false);

    // Reads top to bottom along the right edge
    let side = epd.write_rotated("epaper demo", &FONT_6X10);
    let side_x = (width - PixelSource::size(&side).width) as i32;
    epd.add_layer(&side, side_x, 0, true);

    Rectangle::new(Point::new(8, 40), Size::new(width - 32, height - 56))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
        .draw(epd.canvas_mut())?;

    epd.print_display()?;
    log::info!("Frame sent, putting the panel to sleep");
    epd.sleep()?;

    Ok(())
}
