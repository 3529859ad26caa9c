use std::thread;

use anyhow::Context;
use clap::Parser;
use mb4052::{Channel, Mb4052, Mb4052Hardwired, StdClock};
use mb4052_pi::cli::Args;
use rppal::gpio::Gpio;
use rppal::hal::Delay;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let gpio = Gpio::new()?;

    let cs = gpio.get(args.cs).context("chip-select pin")?.into_output_high();
    let clk = gpio.get(args.clk).context("clock pin")?.into_output_low();
    let data = gpio.get(args.data).context("data pin")?.into_input_pullup();

    let channels: Vec<Channel> = args.channels().into_iter().map(Channel::from).collect();

    match args.hardwired {
        Some(wired) => {
            let mut mb = Mb4052Hardwired::new(
                cs,
                clk,
                data,
                Channel::from(wired),
                StdClock::new(),
                Delay::new(),
            );
            mb.initialize()?;

            tracing::info!(channel = wired, "reading hardwired MB4052");

            sweep(&args, &channels, |_| mb.convert())
        }
        None => {
            let c0 = gpio.get(args.c0).context("C0 pin")?.into_output();
            let c1 = gpio.get(args.c1).context("C1 pin")?.into_output();

            let mut mb = Mb4052::new(cs, clk, data, c0, c1, StdClock::new(), Delay::new());
            mb.initialize()?;

            tracing::info!(?channels, "reading MB4052");

            sweep(&args, &channels, |channel| mb.convert(channel))
        }
    }
}

fn sweep(
    args: &Args,
    channels: &[Channel],
    mut convert: impl FnMut(Channel) -> Result<u8, mb4052::Error>,
) -> Result<(), anyhow::Error> {
    let mut done = 0;

    while args.keep_going(done) {
        for &channel in channels {
            let value = convert(channel).with_context(|| format!("converting {channel:?}"))?;

            tracing::info!(channel = u8::from(channel), value, "sample");
        }

        done += 1;

        thread::sleep(args.interval());
    }

    Ok(())
}
