use thiserror::Error;

/// Why a control command did not produce an acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The server answered with a non-success HTTP status.
    #[error("command rejected with HTTP status {0}")]
    Rejected(u16),

    /// The server answered 2xx but the body was not a player state.
    #[error("malformed command response: {0}")]
    Decode(String),

    /// No answer at all (connect refused, timeout, body cut off).
    #[error("player server unreachable: {0}")]
    Unreachable(String),
}

impl DispatchError {
    /// Short text for the on-screen notice. Decode failures are only logged.
    pub fn notice(&self) -> Option<String> {
        match self {
            DispatchError::Rejected(status) => Some(format!("Command rejected ({status})")),
            DispatchError::Decode(_) => None,
            DispatchError::Unreachable(_) => Some("Player server unreachable".to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("malformed push frame: {0}")]
    Decode(String),

    #[error("unknown push event `{0}`")]
    UnknownEvent(String),

    #[error("push transport error: {0}")]
    Transport(String),

    #[error("push channel closed by server")]
    Closed,
}

/// A gauge value that does not fit on its dial. The gauge is left as-is for
/// that tick instead of drawing garbage.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("value {value} is outside the gauge scale 0..={max}")]
pub struct OutOfRange {
    pub value: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("unknown command `{0}` (try: play, next, back, seek, volume, hold, move, release, discoverable, pairable, shutdown, quit)")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error("`{0}` is not a slider (expected seek or volume)")]
    UnknownControl(String),

    #[error("expected on or off, got `{0}`")]
    InvalidSwitch(String),

    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: f32, min: f32, max: f32 },
}
