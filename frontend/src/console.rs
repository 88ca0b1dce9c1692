//! Line-oriented front end. Each stdin line becomes zero or more
//! [`DashboardEvent`]s, so the console goes through exactly the same
//! reconciliation path a touch screen would.

use crate::dashboard::DashboardEvent;
use crate::error::ConsoleError;
use crate::interaction::ControlId;
use cardash_shared::ControlCommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub const HELP: &str = "\
play | next | back | seek <0-100> | volume <0-1>
hold <seek|volume> | move <seek|volume> <value> | release <seek|volume>
discoverable <on|off> | pairable <on|off> | shutdown | quit";

pub fn parse_line(line: &str) -> Result<Vec<DashboardEvent>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Vec::new());
    };
    let verb = verb.to_ascii_lowercase();

    let command = |c: ControlCommand| -> Result<Vec<DashboardEvent>, ConsoleError> {
        Ok(vec![DashboardEvent::Command(c)])
    };

    match verb.as_str() {
        "play" | "pause" | "toggle" => command(ControlCommand::PlayPause),
        "next" | "forward" => command(ControlCommand::SkipForward),
        "back" | "prev" | "previous" => command(ControlCommand::SkipBack),
        "shutdown" => command(ControlCommand::Shutdown),
        "discoverable" => command(ControlCommand::SetDiscoverable(switch(words.next())?)),
        "pairable" => command(ControlCommand::SetPairable(switch(words.next())?)),
        // A one-shot slide: grab, move, let go.
        "seek" | "volume" => {
            let control = match verb.as_str() {
                "seek" => ControlId::Seek,
                _ => ControlId::Volume,
            };
            let value = slider_value(control, words.next(), control.as_str())?;
            Ok(vec![
                DashboardEvent::GestureBegin(control),
                DashboardEvent::GestureMove(control, value),
                DashboardEvent::GestureEnd(control),
            ])
        }
        "hold" => Ok(vec![DashboardEvent::GestureBegin(control(words.next(), "hold")?)]),
        "move" => {
            let control = control(words.next(), "move")?;
            let value = slider_value(control, words.next(), "move")?;
            Ok(vec![DashboardEvent::GestureMove(control, value)])
        }
        "release" => Ok(vec![DashboardEvent::GestureEnd(control(
            words.next(),
            "release",
        )?)]),
        "quit" | "exit" => Ok(vec![DashboardEvent::Quit]),
        _ => Err(ConsoleError::UnknownCommand(verb)),
    }
}

fn control(word: Option<&str>, verb: &'static str) -> Result<ControlId, ConsoleError> {
    let word = word.ok_or(ConsoleError::MissingArgument(verb))?;
    ControlId::from_name(&word.to_ascii_lowercase())
        .ok_or_else(|| ConsoleError::UnknownControl(word.to_string()))
}

fn slider_value(
    control: ControlId,
    word: Option<&str>,
    verb: &'static str,
) -> Result<f32, ConsoleError> {
    let word = word.ok_or(ConsoleError::MissingArgument(verb))?;
    let value: f32 = word
        .parse()
        .map_err(|_| ConsoleError::InvalidNumber(word.to_string()))?;
    let (min, max) = control.range();
    if !(min..=max).contains(&value) {
        return Err(ConsoleError::OutOfRange { value, min, max });
    }
    Ok(value)
}

fn switch(word: Option<&str>) -> Result<bool, ConsoleError> {
    match word.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "true" | "1") => Ok(true),
        Some("off" | "false" | "0") => Ok(false),
        Some(_) => Err(ConsoleError::InvalidSwitch(word.unwrap_or_default().to_string())),
        None => Err(ConsoleError::MissingArgument("switch")),
    }
}

/// Feed stdin into the event queue until `quit`. EOF counts as `quit`.
pub async fn read_stdin(events: mpsc::Sender<DashboardEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    log::info!("[UI] console ready\n{HELP}");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("[UI] stdin error: {e}");
                break;
            }
        };

        match parse_line(&line) {
            Ok(parsed) => {
                for event in parsed {
                    let quit = event == DashboardEvent::Quit;
                    if events.send(event).await.is_err() || quit {
                        return;
                    }
                }
            }
            Err(e) => log::warn!("[UI] {e}"),
        }
    }

    let _ = events.send(DashboardEvent::Quit).await;
}
