use std::io::Cursor;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::SpeechError;

/// Default output device that plays one clip at a time.
pub struct AudioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
}

impl AudioOutput {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self, SpeechError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| SpeechError::Output(err.to_string()))?;
        stream.log_on_drop(false);
        Ok(Self { stream, sink: None })
    }

    /// Replace whatever is playing with the audio file at `path`.
    pub fn play_file(&mut self, path: &Path) -> Result<(), SpeechError> {
        let bytes = std::fs::read(path).map_err(|source| SpeechError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source =
            Decoder::new(Cursor::new(bytes)).map_err(|err| SpeechError::Decode(err.to_string()))?;
        self.stop();
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    /// Block until the current clip finishes.
    pub fn wait_until_done(&self) {
        if let Some(sink) = &self.sink {
            sink.sleep_until_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn garbage_file_fails_to_decode() {
        // Machines without an audio device skip this.
        let Ok(mut output) = AudioOutput::open_default() else {
            return;
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"not audio at all").unwrap();
        assert!(matches!(
            output.play_file(&path),
            Err(SpeechError::Decode(_))
        ));
        assert!(!output.is_playing());
    }
}
