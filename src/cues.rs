//! Sound cues derived from simulation events
//!
//! The core never plays audio. Hosts bind each cue (and music track) to
//! whatever mixer channel they like.

use crate::sim::{AsteroidTier, EventSink, GameEvent, Outcome, Phase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Player bullet fired
    Shot,
    /// Large asteroid breaks apart
    AsteroidBreakLarge,
    /// Medium asteroid breaks apart
    AsteroidBreakMedium,
    /// Small asteroid shattered
    AsteroidBreakSmall,
    /// Ship lost a life
    ShipHit,
    /// Shield shot down
    ShieldBreak,
    /// Shield formation deployed
    FormationDeploy,
    /// Boss lost a life
    BossHit,
    /// New phase began
    PhaseStart,
    Victory,
    GameOver,
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Field,
    Boss,
    Silence,
}

impl MusicTrack {
    /// Track that accompanies a phase
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Field1 | Phase::Field2 => MusicTrack::Field,
            Phase::BossIntro | Phase::BossFight => MusicTrack::Boss,
            Phase::Victory | Phase::Defeat => MusicTrack::Silence,
        }
    }
}

impl SoundCue {
    /// Cue for an event, if it is audible
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let cue = match event {
            GameEvent::ShotFired { .. } => SoundCue::Shot,
            GameEvent::AsteroidDestroyed { tier, .. } => match tier {
                AsteroidTier::Large => SoundCue::AsteroidBreakLarge,
                AsteroidTier::Medium => SoundCue::AsteroidBreakMedium,
                AsteroidTier::Small => SoundCue::AsteroidBreakSmall,
            },
            GameEvent::ShipHit { .. } => SoundCue::ShipHit,
            GameEvent::ShieldDestroyed { .. } => SoundCue::ShieldBreak,
            GameEvent::FormationSpawned { .. } => SoundCue::FormationDeploy,
            GameEvent::BossDamaged { .. } => SoundCue::BossHit,
            // Terminal phases get their own GameOver cue
            GameEvent::PhaseChanged { to, .. } if to.is_terminal() => return None,
            GameEvent::PhaseChanged { .. } => SoundCue::PhaseStart,
            GameEvent::GameOver { outcome } => match outcome {
                Outcome::Victory => SoundCue::Victory,
                Outcome::Defeat => SoundCue::GameOver,
            },
        };
        Some(cue)
    }
}

/// Event sink that queues cues for a host audio layer
#[derive(Debug, Clone)]
pub struct CueLog {
    cues: Vec<SoundCue>,
    music: MusicTrack,
    muted: bool,
}

impl Default for CueLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CueLog {
    pub fn new() -> Self {
        Self {
            cues: Vec::new(),
            music: MusicTrack::Field,
            muted: false,
        }
    }

    /// Mute/unmute effects (music selection still tracks the phase)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Current music track
    pub fn music(&self) -> MusicTrack {
        self.music
    }

    /// Take all queued cues
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}

impl EventSink for CueLog {
    fn emit(&mut self, event: &GameEvent) {
        if let GameEvent::PhaseChanged { to, .. } = event {
            let track = MusicTrack::for_phase(*to);
            if track != self.music {
                log::debug!("Music: {:?} -> {:?}", self.music, track);
                self.music = track;
            }
        }
        if self.muted {
            return;
        }
        if let Some(cue) = SoundCue::for_event(event) {
            self.cues.push(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_asteroid_cue_by_tier() {
        let event = GameEvent::AsteroidDestroyed {
            tier: AsteroidTier::Medium,
            pos: Vec2::ZERO,
            children: 2,
        };
        assert_eq!(SoundCue::for_event(&event), Some(SoundCue::AsteroidBreakMedium));
    }

    #[test]
    fn test_terminal_phase_change_is_silent() {
        let event = GameEvent::PhaseChanged {
            from: Phase::BossFight,
            to: Phase::Victory,
        };
        assert_eq!(SoundCue::for_event(&event), None);
    }

    #[test]
    fn test_log_switches_music_and_queues_cues() {
        let mut log = CueLog::new();
        log.emit(&GameEvent::PhaseChanged {
            from: Phase::Field2,
            to: Phase::BossIntro,
        });
        log.emit(&GameEvent::ShipHit { lives_left: 2 });
        assert_eq!(log.music(), MusicTrack::Boss);
        assert_eq!(log.drain(), vec![SoundCue::PhaseStart, SoundCue::ShipHit]);
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_muted_log_still_tracks_music() {
        let mut log = CueLog::new();
        log.set_muted(true);
        log.emit(&GameEvent::PhaseChanged {
            from: Phase::BossFight,
            to: Phase::Defeat,
        });
        log.emit(&GameEvent::GameOver {
            outcome: Outcome::Defeat,
        });
        assert_eq!(log.music(), MusicTrack::Silence);
        assert!(log.drain().is_empty());
    }
}
