pub const TITLE: &str = "AutoSnap - Vehicle Image Downloader";
pub const URL_PROMPT: &str = "Vehicle Page URL (https://ca.iaai.com/vehicle-details/...):";
pub const SCRAPING_TEXT: &str = "Fetching vehicle images...";
pub const DOWNLOADING_TEXT: &str = "Preparing ZIP...";
pub const READY_HEADLINE: &str = "Images Ready!";
pub const DOWNLOADED_HEADLINE: &str = "Download Complete!";
pub const HELP_TEXT: &str = "Commands: <url> fetch a vehicle | d download | r start over | q quit | h help";
