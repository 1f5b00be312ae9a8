use anyhow::{Context, Result};
use log::info;
use pa1010::{FixRecord, Receiver, ReceiverConfig, StdClock, Transport};

mod cli;
mod render;
mod replay;
mod serial;

use cli::{Options, Source};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = cli::command().get_matches();
    let options = Options::from_matches(&matches);
    let config = ReceiverConfig::default();

    match &options.source {
        Source::Serial { port, baud } => {
            let bus = serial::SerialBus::open(port, *baud)?;
            run(
                Receiver::new(bus, StdClock::new(), config),
                &options,
                |bus: &serial::SerialBus| bus.ensure_connected().map(|()| false),
            )
        },
        Source::Replay(path) => {
            let bus = replay::ReplayBus::open(path)?;
            run(
                Receiver::new(bus, StdClock::new(), config),
                &options,
                |bus: &replay::ReplayBus| Ok(bus.is_exhausted()),
            )
        },
    }
}

fn configure<T: Transport>(gps: &mut Receiver<T, StdClock>, options: &Options) -> Result<()> {
    gps.init().context("Failed to initialize receiver")?;
    if options.cold_boot {
        info!("Cold boot, the next fix may take minutes");
        gps.cold_boot().context("Failed to send cold boot")?;
    }
    if let Some(rate) = options.rate {
        gps.set_update_rate(rate)
            .context("Failed to set update rate")?;
    }
    if let Some(enabled) = options.pps {
        gps.set_pps(enabled).context("Failed to set PPS output")?;
    }
    if let Some(seconds) = options.periodic {
        gps.set_periodic_mode(seconds)
            .context("Failed to enter periodic mode")?;
    }
    Ok(())
}

/// Poll until `finished` says the bus has nothing more to give or enough
/// fixes were printed. A fix is printed whenever it changes. An error from
/// `finished` ends the run with that error.
fn run<T: Transport>(
    mut gps: Receiver<T, StdClock>,
    options: &Options,
    finished: impl Fn(&T) -> Result<bool>,
) -> Result<()> {
    configure(&mut gps, options)?;

    let mut last = FixRecord::new();
    let mut printed = 0u64;
    loop {
        gps.poll();
        if *gps.fix() != last {
            print(gps.fix(), options.json)?;
            last.clone_from(gps.fix());
            printed += 1;
            if options.count.is_some_and(|count| printed >= count) {
                break;
            }
        }
        if finished(gps.bus())? {
            break;
        }
    }
    Ok(())
}

fn print(fix: &FixRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(fix)?);
    } else {
        println!("{}\n", render::lines(fix).join("\n"));
    }
    Ok(())
}
