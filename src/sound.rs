//! Sound cues.
//!
//! The simulation never plays audio. It produces [`SoundCue`]s (from
//! [`SimEvent`]s and input feedback) and hands them to a [`CueFilter`],
//! which applies the enabled flag and the collision rate limit before
//! forwarding to a [`SoundSink`]. A sink that reports itself unavailable
//! switches sound off for the rest of the session; nothing else depends on
//! sound working.

use crate::error::SoundError;
use crate::physics::SimEvent;
use crate::zone::ZoneKind;

/// At most one collision cue per this many milliseconds.
pub const COLLISION_COOLDOWN_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    Added,
    Grabbed,
    Released,
    Collision { intensity: f32 },
    Boundary { intensity: f32 },
    Attraction,
    ZoneEntered(ZoneKind),
    ConnectionMade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// One synthesized note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: f32,
    pub waveform: Waveform,
    pub volume: f32,
    /// Start offset from the cue in milliseconds.
    pub delay_ms: u64,
}

const fn sine(frequency: f32, duration: f32, volume: f32, delay_ms: u64) -> Tone {
    Tone {
        frequency,
        duration,
        waveform: Waveform::Sine,
        volume,
        delay_ms,
    }
}

impl SoundCue {
    /// Cue for a simulation event, if it has one.
    pub fn from_event(event: &SimEvent) -> Option<Self> {
        match *event {
            SimEvent::Collision { intensity, .. } => Some(SoundCue::Collision { intensity }),
            SimEvent::Attraction { .. } => Some(SoundCue::Attraction),
            SimEvent::Boundary { speed, .. } => Some(SoundCue::Boundary {
                intensity: (speed / 10.0).min(1.0),
            }),
            SimEvent::ZoneReached { zone, .. } => Some(SoundCue::ZoneEntered(zone)),
        }
    }

    /// The notes that make up this cue.
    pub fn tones(&self) -> Vec<Tone> {
        match *self {
            SoundCue::Added => vec![sine(523.25, 0.1, 0.2, 0), sine(659.25, 0.1, 0.15, 50)],
            SoundCue::Grabbed => vec![sine(440.0, 0.05, 0.15, 0)],
            SoundCue::Released => vec![sine(349.23, 0.08, 0.12, 0)],
            SoundCue::Collision { intensity } => {
                vec![sine(80.0 + intensity * 120.0, 0.08, 0.1 * intensity, 0)]
            }
            SoundCue::Boundary { intensity } => {
                vec![sine(60.0 + intensity * 60.0, 0.06, 0.05 * intensity, 0)]
            }
            SoundCue::Attraction => vec![sine(880.0, 0.05, 0.08, 0), sine(1046.5, 0.05, 0.06, 30)],
            SoundCue::ZoneEntered(zone) => {
                let frequency = match zone {
                    ZoneKind::Creative => 587.33,
                    ZoneKind::Focus => 659.25,
                    ZoneKind::Organize => 698.46,
                    ZoneKind::Relax => 523.25,
                };
                vec![Tone {
                    frequency,
                    duration: 0.15,
                    waveform: Waveform::Triangle,
                    volume: 0.12,
                    delay_ms: 0,
                }]
            }
            SoundCue::ConnectionMade => vec![sine(800.0, 0.1, 0.15, 0), sine(1000.0, 0.1, 0.12, 50)],
        }
    }
}

/// Something that can voice cues.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError>;
}

/// Logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct TracingSink;

impl SoundSink for TracingSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        let tones = cue.tones();
        tracing::trace!(?cue, notes = tones.len(), first_hz = tones.first().map(|t| t.frequency), "sound cue");
        Ok(())
    }
}

/// Enabled flag plus rate limiting in front of a sink.
pub struct CueFilter<S: SoundSink> {
    sink: S,
    enabled: bool,
    last_collision_ms: Option<u64>,
}

impl<S: SoundSink> CueFilter<S> {
    pub fn new(sink: S, enabled: bool) -> Self {
        Self {
            sink,
            enabled,
            last_collision_ms: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Forward a cue if sound is on and the rate limit allows it.
    /// Returns whether the cue reached the sink.
    pub fn emit(&mut self, cue: SoundCue, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }

        if let SoundCue::Collision { .. } = cue {
            if let Some(last) = self.last_collision_ms {
                if now_ms.saturating_sub(last) < COLLISION_COOLDOWN_MS {
                    return false;
                }
            }
            self.last_collision_ms = Some(now_ms);
        }

        match self.sink.play(cue) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "sound unavailable, disabling cues");
                self.enabled = false;
                false
            }
        }
    }

    /// Forward the cues for a batch of simulation events.
    pub fn emit_events(&mut self, events: &[SimEvent], now_ms: u64) -> usize {
        events
            .iter()
            .filter_map(SoundCue::from_event)
            .filter(|cue| self.emit(*cue, now_ms))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thought::ThoughtId;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundCue>,
        broken: bool,
    }

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
            if self.broken {
                return Err(SoundError::Unavailable("no device".into()));
            }
            self.played.push(cue);
            Ok(())
        }
    }

    fn collision() -> SimEvent {
        SimEvent::Collision {
            a: ThoughtId(1),
            b: ThoughtId(2),
            at: Vec2::ZERO,
            intensity: 0.5,
        }
    }

    #[test]
    fn test_collision_rate_limit() {
        let mut filter = CueFilter::new(Recorder::default(), true);
        let burst = [collision(), collision(), collision()];
        assert_eq!(filter.emit_events(&burst, 1_000), 1);
        assert_eq!(filter.emit_events(&burst, 1_050), 0);
        assert_eq!(filter.emit_events(&burst, 1_100), 1);
        // other cues are not limited
        assert!(filter.emit(SoundCue::Grabbed, 1_100));
        assert!(filter.emit(SoundCue::Grabbed, 1_100));
    }

    #[test]
    fn test_disabled_filter_drops_everything() {
        let mut filter = CueFilter::new(Recorder::default(), false);
        assert!(!filter.emit(SoundCue::Added, 0));
        assert!(filter.sink().played.is_empty());
    }

    #[test]
    fn test_unavailable_sink_disables_itself() {
        let mut filter = CueFilter::new(
            Recorder {
                broken: true,
                ..Default::default()
            },
            true,
        );
        assert!(!filter.emit(SoundCue::Added, 0));
        assert!(!filter.enabled());
    }

    #[test]
    fn test_cue_tones() {
        assert_eq!(SoundCue::Added.tones().len(), 2);
        let hit = SoundCue::Collision { intensity: 1.0 }.tones();
        assert_eq!(hit[0].frequency, 200.0);
        assert_eq!(
            SoundCue::ZoneEntered(ZoneKind::Relax).tones()[0].waveform,
            Waveform::Triangle
        );
    }
}
