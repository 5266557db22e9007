use autosnap_core::{AppViewModel, Msg, Phase};

/// What a line typed by the user asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    /// Nothing to do; carries a hint for the user, if any.
    Ignore(Option<&'static str>),
}

/// Interprets a typed line against the current view.
///
/// Keywords win over URLs; anything else typed while no result is shown is the URL.
pub fn interpret(line: &str, view: &AppViewModel) -> Command {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Command::Quit,
        "h" | "help" | "?" => return Command::Help,
        "r" | "reset" | "new" => return Command::Dispatch(vec![Msg::ResetClicked]),
        "d" | "download" => {
            return if view.can_download {
                Command::Dispatch(vec![Msg::DownloadClicked])
            } else {
                Command::Ignore(Some("Nothing to download yet."))
            };
        }
        "" => return Command::Ignore(None),
        _ => {}
    }

    match view.phase {
        Phase::Idle => Command::Dispatch(vec![
            Msg::InputChanged(trimmed.to_string()),
            Msg::SubmitClicked,
        ]),
        Phase::Scraping | Phase::Downloading => Command::Ignore(Some("Still working, please wait.")),
        Phase::Ready | Phase::Downloaded => {
            Command::Ignore(Some("Type 'r' to start over with a new URL."))
        }
    }
}
