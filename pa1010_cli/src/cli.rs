use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};

pub fn command() -> Command {
    Command::new("PA1010D receiver tool")
        .author(clap::crate_authors!())
        .about("Reads fixes from a PA1010D GNSS receiver and prints them")
        .arg_required_else_help(true)
        .arg(
            Arg::new("port")
                .value_name("port")
                .short('p')
                .long("port")
                .help("Serial port of the bridge the receiver is attached to"),
        )
        .arg(
            Arg::new("baud")
                .value_name("baud")
                .short('s')
                .long("baud")
                .required(false)
                .default_value("9600")
                .value_parser(value_parser!(u32))
                .help("Baud rate of the port to open"),
        )
        .arg(
            Arg::new("replay")
                .value_name("file")
                .long("replay")
                .value_parser(value_parser!(PathBuf))
                .help("Replay a captured byte stream instead of opening a port"),
        )
        .group(
            ArgGroup::new("source")
                .args(["port", "replay"])
                .required(true),
        )
        .arg(
            Arg::new("rate")
                .value_name("seconds")
                .long("rate")
                .value_parser(value_parser!(f32))
                .help("Seconds between fixes, clamped to 0.1..=10"),
        )
        .arg(
            Arg::new("pps")
                .long("pps")
                .value_parser(["on", "off"])
                .help("Pulse-per-second output, which also drives the fix LED"),
        )
        .arg(
            Arg::new("cold-boot")
                .long("cold-boot")
                .action(ArgAction::SetTrue)
                .help("Restart the receiver without any aiding data before reading"),
        )
        .arg(
            Arg::new("periodic")
                .value_name("seconds")
                .long("periodic")
                .value_parser(value_parser!(u32))
                .help("Sleep between fixes, one fix every 15..=300 seconds"),
        )
        .arg(
            Arg::new("count")
                .value_name("n")
                .short('n')
                .long("count")
                .value_parser(value_parser!(u64))
                .help("Stop after printing this many fixes"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print every fix as a JSON object"),
        )
}

#[derive(Debug)]
pub enum Source {
    Serial { port: String, baud: u32 },
    Replay(PathBuf),
}

#[derive(Debug)]
pub struct Options {
    pub source: Source,
    pub rate: Option<f32>,
    pub pps: Option<bool>,
    pub cold_boot: bool,
    pub periodic: Option<u32>,
    pub count: Option<u64>,
    pub json: bool,
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let source = match matches.get_one::<PathBuf>("replay") {
            Some(path) => Source::Replay(path.clone()),
            None => Source::Serial {
                port: matches
                    .get_one::<String>("port")
                    .cloned()
                    .unwrap_or_default(),
                baud: matches.get_one::<u32>("baud").cloned().unwrap_or(9600),
            },
        };

        Self {
            source,
            rate: matches.get_one::<f32>("rate").copied(),
            pps: matches
                .get_one::<String>("pps")
                .map(|s| s.as_str() == "on"),
            cold_boot: matches.get_flag("cold-boot"),
            periodic: matches.get_one::<u32>("periodic").copied(),
            count: matches.get_one::<u64>("count").copied(),
            json: matches.get_flag("json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        let matches = command()
            .try_get_matches_from(std::iter::once("pa1010").chain(args.iter().copied()))
            .unwrap();
        Options::from_matches(&matches)
    }

    #[test]
    fn serial_defaults() {
        let options = parse(&["--port", "/dev/ttyUSB0"]);
        assert!(matches!(
            options.source,
            Source::Serial { ref port, baud: 9600 } if port == "/dev/ttyUSB0"
        ));
        assert_eq!(options.rate, None);
        assert_eq!(options.pps, None);
        assert!(!options.cold_boot);
        assert!(!options.json);
    }

    #[test]
    fn replay_with_settings() {
        let options = parse(&[
            "--replay", "capture.bin", "--rate", "5", "--pps", "off", "--count", "3", "--json",
        ]);
        assert!(matches!(options.source, Source::Replay(ref p) if p == &PathBuf::from("capture.bin")));
        assert_eq!(options.rate, Some(5.0));
        assert_eq!(options.pps, Some(false));
        assert_eq!(options.count, Some(3));
        assert!(options.json);
    }

    #[test]
    fn port_and_replay_are_exclusive() {
        assert!(command()
            .try_get_matches_from(["pa1010", "--port", "a", "--replay", "b"])
            .is_err());
        assert!(command().try_get_matches_from(["pa1010", "--json"]).is_err());
    }
}
