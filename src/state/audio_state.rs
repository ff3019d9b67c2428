//! Audio session state

use crate::services::MediaHandle;

/// Loaded file and play/pause flag of the audio player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioSession {
    pub handle: Option<MediaHandle>,
    pub file_name: Option<String>,
    pub is_playing: bool,
}

impl AudioSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    /// Bind a freshly created handle, returning the one it replaces.
    ///
    /// The caller is responsible for releasing the returned handle.
    pub fn replace(&mut self, handle: MediaHandle, file_name: String) -> Option<MediaHandle> {
        self.is_playing = false;
        self.file_name = Some(file_name);
        self.handle.replace(handle)
    }

    pub fn mark_paused(&mut self) {
        self.is_playing = false;
    }

    pub fn mark_playing(&mut self) {
        self.is_playing = true;
    }

    pub fn play_label(&self) -> &'static str {
        if self.is_playing {
            "pause"
        } else {
            "play"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_returns_previous_handle_and_pauses() {
        let mut session = AudioSession::new();
        assert!(session.replace(MediaHandle::new(1), "a.mp3".into()).is_none());
        session.mark_playing();
        assert_eq!(session.play_label(), "pause");

        let previous = session.replace(MediaHandle::new(2), "b.mp3".into());
        assert_eq!(previous, Some(MediaHandle::new(1)));
        assert!(!session.is_playing);
        assert_eq!(session.file_name.as_deref(), Some("b.mp3"));
        assert_eq!(session.play_label(), "play");
    }
}
