use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Download vehicle images from IAA Canada auctions.
#[derive(Debug, Parser)]
#[command(name = "autosnap", version, about)]
pub struct Args {
    /// Vehicle details page to fetch right away.
    pub url: Option<String>,

    /// Scrape service base, e.g. http://localhost:5000/api.
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Where archives are saved.
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Settings file (RON). Defaults to ./autosnap.ron when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fetch URL, download its archive and exit without prompting.
    #[arg(long, requires = "url")]
    pub once: bool,

    /// Probe the service and exit.
    #[arg(long, conflicts_with = "once")]
    pub check: bool,

    /// Where log lines go.
    #[arg(long, value_enum, value_name = "DEST")]
    pub log: Option<LogDestination>,

    /// More log detail; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn once_requires_url() {
        assert!(Args::try_parse_from(["autosnap", "--once"]).is_err());
        let args =
            Args::try_parse_from(["autosnap", "--once", "https://ca.iaai.com/vehicle-details/1"])
                .unwrap();
        assert!(args.once);
        assert_eq!(
            args.url.as_deref(),
            Some("https://ca.iaai.com/vehicle-details/1")
        );
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["autosnap", "-vv", "--log", "both"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.log, Some(LogDestination::Both));
    }
}
