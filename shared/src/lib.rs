use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DASHBOARD_UPDATE_EVENT: &str = "dashboard_update";
pub const PLAYER_UPDATE_EVENT: &str = "player_update";
pub const OBD_STATUS_EVENT: &str = "obd_status";

/// Playback snapshot returned by every `/player/*` endpoint.
///
/// The player server still speaks the older field names (`interpret`,
/// `length`), so those are accepted as aliases. Second counts may arrive as
/// fractional numbers and are truncated. A missing position means "unchanged
/// as far as the server knows", not zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub title: String,
    #[serde(default, alias = "interpret")]
    pub artist: String,
    pub is_playing: bool,
    /// The player server leaves this out of most acks.
    #[serde(
        default,
        alias = "position",
        alias = "current",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_whole_number"
    )]
    pub position_seconds: Option<u32>,
    #[serde(default, alias = "length", deserialize_with = "whole_number")]
    pub length_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

impl PlayerState {
    /// "artist - title", the way the song label has always been shown.
    pub fn song_line(&self) -> String {
        match (self.artist.is_empty(), self.title.is_empty()) {
            (true, true) => String::new(),
            (true, false) => self.title.clone(),
            (false, true) => self.artist.clone(),
            (false, false) => format!("{} - {}", self.artist, self.title),
        }
    }
}

/// One OBD sample. Replaces the previous one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetrySample {
    pub rpm: u32,
    pub kmh_speed: u32,
}

// ---------- Push channel payloads ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    #[serde(deserialize_with = "whole_number")]
    pub rpm: u32,
    #[serde(deserialize_with = "whole_number")]
    pub kmh: u32,
}

impl TelemetryMessage {
    pub fn sample(&self) -> TelemetrySample {
        TelemetrySample {
            rpm: self.rpm,
            kmh_speed: self.kmh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SongInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "interpret")]
    pub artist: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_whole_number"
    )]
    pub length: Option<u32>,
}

/// `player_update` payload. Position is never pushed; `length` and `volume`
/// only show up when the server happens to know them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMessage {
    pub song: SongInfo,
    pub is_playing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObdStatusMessage {
    pub message: String,
}

/// Frames on the push channel:
///   { "event": "dashboard_update", "data": { "rpm": 800, "kmh": 0 } }
///   { "event": "player_update",    "data": { "song": {..}, "isPlaying": true } }
///   { "event": "obd_status",       "data": { "message": "Car connected" } }
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum PushMessage {
    #[serde(rename = "dashboard_update")]
    Telemetry(TelemetryMessage),
    #[serde(rename = "player_update")]
    Player(PlayerMessage),
    #[serde(rename = "obd_status")]
    ObdStatus(ObdStatusMessage),
}

impl PushMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            PushMessage::Telemetry(_) => DASHBOARD_UPDATE_EVENT,
            PushMessage::Player(_) => PLAYER_UPDATE_EVENT,
            PushMessage::ObdStatus(_) => OBD_STATUS_EVENT,
        }
    }
}

// ---------- Control commands ----------

/// Everything the dashboard can ask the server to do.
///
/// `SeekTo` carries a percentage in `0..=100`, `SetVolume` a fraction in
/// `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    PlayPause,
    SkipForward,
    SkipBack,
    SeekTo(f32),
    SetVolume(f32),
    SetDiscoverable(bool),
    SetPairable(bool),
    Shutdown,
}

impl ControlCommand {
    pub fn path(&self) -> &'static str {
        match self {
            ControlCommand::PlayPause => "/player/play_pause",
            ControlCommand::SkipForward => "/player/forward",
            ControlCommand::SkipBack => "/player/back",
            ControlCommand::SeekTo(_) => "/player/skip_to",
            ControlCommand::SetVolume(_) => "/player/volume_to",
            ControlCommand::SetDiscoverable(_) => "/bluetooth/discoverable",
            ControlCommand::SetPairable(_) => "/bluetooth/pairable",
            ControlCommand::Shutdown => "/shutdown",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::PlayPause => "PlayPause",
            ControlCommand::SkipForward => "SkipForward",
            ControlCommand::SkipBack => "SkipBack",
            ControlCommand::SeekTo(_) => "SeekTo",
            ControlCommand::SetVolume(_) => "SetVolume",
            ControlCommand::SetDiscoverable(_) => "SetDiscoverable",
            ControlCommand::SetPairable(_) => "SetPairable",
            ControlCommand::Shutdown => "Shutdown",
        }
    }

    /// Flat key/value body, sent form-encoded.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            ControlCommand::SeekTo(percentage) | ControlCommand::SetVolume(percentage) => {
                vec![("percentage", percentage.to_string())]
            }
            ControlCommand::SetDiscoverable(status) | ControlCommand::SetPairable(status) => {
                vec![("status", status.to_string())]
            }
            _ => Vec::new(),
        }
    }

    /// Player commands answer with a `PlayerState`; bluetooth and shutdown
    /// answer with an empty body.
    pub fn expects_player_state(&self) -> bool {
        matches!(
            self,
            ControlCommand::PlayPause
                | ControlCommand::SkipForward
                | ControlCommand::SkipBack
                | ControlCommand::SeekTo(_)
                | ControlCommand::SetVolume(_)
        )
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCommand::SeekTo(p) => write!(f, "SeekTo({p}%)"),
            ControlCommand::SetVolume(v) => write!(f, "SetVolume({v})"),
            ControlCommand::SetDiscoverable(s) => write!(f, "SetDiscoverable({s})"),
            ControlCommand::SetPairable(s) => write!(f, "SetPairable({s})"),
            other => f.write_str(other.name()),
        }
    }
}

// ---------- Lenient numbers ----------
// The OBD side reports magnitudes as floats and older firmware sent them as
// strings. Everything is truncated to whole units; negatives are malformed.

#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl WholeNumber {
    fn to_u32(&self) -> Result<u32, String> {
        let value = match self {
            WholeNumber::Unsigned(v) => {
                return u32::try_from(*v).map_err(|_| format!("{v} does not fit in u32"));
            }
            WholeNumber::Float(v) => *v,
            WholeNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("`{s}` is not a number"))?,
        };

        if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
            return Err(format!("{value} is not a valid whole number"));
        }
        Ok(value.trunc() as u32)
    }
}

fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    WholeNumber::deserialize(deserializer)?
        .to_u32()
        .map_err(serde::de::Error::custom)
}

fn optional_whole_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WholeNumber>::deserialize(deserializer)?
        .map(|n| n.to_u32())
        .transpose()
        .map_err(serde::de::Error::custom)
}
