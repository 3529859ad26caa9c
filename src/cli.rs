use std::time::Duration;

use clap::Parser;

/// Read an MB4052 ADC over bit-banged GPIO.
///
/// Pin numbers are BCM GPIO numbers.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Chip-select (CS) pin.
    #[arg(long, default_value_t = 17)]
    pub cs: u8,

    /// ADC clock pin.
    #[arg(long, default_value_t = 27)]
    pub clk: u8,

    /// Data out pin. The internal pull-up is enabled on it.
    #[arg(long, default_value_t = 22)]
    pub data: u8,

    /// C0 channel-select pin.
    #[arg(long, default_value_t = 23)]
    pub c0: u8,

    /// C1 channel-select pin.
    #[arg(long, default_value_t = 24)]
    pub c1: u8,

    /// Channel to read, may be repeated. Defaults to all four.
    #[arg(short, long = "channel", value_parser = clap::value_parser!(u8).range(0..=3))]
    pub channels: Vec<u8>,

    /// C0/C1 are strapped to this channel on the board; C0/C1 pins are not used.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3), conflicts_with = "channels")]
    pub hardwired: Option<u8>,

    /// Pause between sweeps, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Stop after this many sweeps.
    #[arg(long)]
    pub count: Option<u64>,
}

impl Args {
    /// Channels to sweep, in the order given.
    pub fn channels(&self) -> Vec<u8> {
        if let Some(channel) = self.hardwired {
            return vec![channel];
        }

        if self.channels.is_empty() {
            (0..4).collect()
        } else {
            self.channels.clone()
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Whether another sweep should run after `done` sweeps.
    pub fn keep_going(&self, done: u64) -> bool {
        self.count.map_or(true, |count| done < count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["pi"]).unwrap();

        assert_eq!((args.cs, args.clk, args.data), (17, 27, 22));
        assert_eq!((args.c0, args.c1), (23, 24));
        assert_eq!(args.channels(), [0, 1, 2, 3]);
        assert_eq!(args.interval(), Duration::from_millis(500));
        assert!(args.keep_going(u64::MAX));
    }

    #[test]
    fn repeated_channels_keep_order() {
        let args = Args::try_parse_from(["pi", "-c", "3", "--channel", "1"]).unwrap();

        assert_eq!(args.channels(), [3, 1]);
    }

    #[test]
    fn channel_out_of_range() {
        assert!(Args::try_parse_from(["pi", "--channel", "4"]).is_err());
        assert!(Args::try_parse_from(["pi", "--hardwired", "7"]).is_err());
    }

    #[test]
    fn hardwired_reads_one_channel() {
        let args = Args::try_parse_from(["pi", "--hardwired", "2", "--count", "3"]).unwrap();

        assert_eq!(args.channels(), [2]);
        assert!(args.keep_going(2));
        assert!(!args.keep_going(3));

        assert!(Args::try_parse_from(["pi", "--hardwired", "2", "-c", "1"]).is_err());
    }

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;

        Args::command().debug_assert();
    }
}
