// crates/aiva-editor/src/voice.rs
//
// Voice command intents. Speech recognition itself happens elsewhere; what
// arrives here is an intent label plus the transcript, or a bare transcript
// that gets the keyword fallback below.

use aiva_core::commands::EditorCommand;
use aiva_core::jobs::AiAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceIntent {
    RemoveSilence,
    Cut,
    Play,
    Pause,
    Undo,
    Unknown,
}

impl VoiceIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            VoiceIntent::RemoveSilence => "REMOVE_SILENCE",
            VoiceIntent::Cut           => "CUT",
            VoiceIntent::Play          => "PLAY",
            VoiceIntent::Pause         => "PAUSE",
            VoiceIntent::Undo          => "UNDO",
            VoiceIntent::Unknown       => "UNKNOWN",
        }
    }

    /// Recognizer label → intent. Unrecognized labels are `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "REMOVE_SILENCE" => VoiceIntent::RemoveSilence,
            "CUT"            => VoiceIntent::Cut,
            "PLAY"           => VoiceIntent::Play,
            "PAUSE"          => VoiceIntent::Pause,
            "UNDO"           => VoiceIntent::Undo,
            _                => VoiceIntent::Unknown,
        }
    }

    /// Keyword match on a raw transcript. Checked in priority order, so
    /// "remove silence then play" is `RemoveSilence`.
    ///
    /// With a wake word set, transcripts that do not contain it are `Unknown`.
    pub fn parse(text: &str, wake_word: Option<&str>) -> Self {
        let t = text.to_lowercase();
        if let Some(wake) = wake_word.filter(|w| !w.is_empty()) {
            if !t.contains(&wake.to_lowercase()) {
                return VoiceIntent::Unknown;
            }
        }
        const KEYWORDS: [(&str, VoiceIntent); 5] = [
            ("remove silence", VoiceIntent::RemoveSilence),
            ("cut here",       VoiceIntent::Cut),
            ("play",           VoiceIntent::Play),
            ("pause",          VoiceIntent::Pause),
            ("undo",           VoiceIntent::Undo),
        ];
        KEYWORDS.iter()
            .find(|(kw, _)| t.contains(kw))
            .map(|&(_, intent)| intent)
            .unwrap_or(VoiceIntent::Unknown)
    }

    /// The command this intent triggers. `Unknown` triggers nothing.
    /// `RemoveSilence` targets the selection (the controller falls back to
    /// the clip under the playhead).
    pub fn command(self) -> Option<EditorCommand> {
        let cmd = match self {
            VoiceIntent::Cut   => EditorCommand::SplitAtPlayhead,
            VoiceIntent::Play  => EditorCommand::Play,
            VoiceIntent::Pause => EditorCommand::Pause,
            VoiceIntent::Undo  => EditorCommand::Undo,
            VoiceIntent::RemoveSilence => EditorCommand::ApplyAction {
                clip:   None,
                action: AiAction::RemoveSilence,
                params: serde_json::Value::Null,
            },
            VoiceIntent::Unknown => return None,
        };
        Some(cmd)
    }
}
