//! Audio cue sink
//!
//! The simulation names sound events; sinks decide how (or whether) to play
//! them. Sinks are fire-and-forget and must never fail into the caller.

use std::cell::RefCell;
use std::rc::Rc;

/// Named gameplay sound events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A preview item appeared
    SpawnPreview,
    /// A preview item became selectable
    Activate,
    /// Matching selection, pitched up by size and combo
    Success { count: usize, combo: u32 },
    /// Mixed selection
    Error,
    /// Run ended
    GameOver,
}

/// Consumer of gameplay sound cues
pub trait AudioSink {
    /// Play a cue (dropped silently if muted or unavailable)
    fn play(&mut self, cue: Cue);

    fn is_muted(&self) -> bool;

    /// Flip mute, returning the new muted state
    fn toggle_mute(&mut self) -> bool;

    /// Unlock audio output after a user gesture. Does not block.
    fn unlock(&mut self) {}
}

/// Sink that plays nothing (native builds, headless runs)
#[derive(Debug, Default)]
pub struct SilentAudio {
    muted: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: Cue) {
        if !self.muted {
            log::trace!("cue {:?}", cue);
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}

/// Sink that records every cue it receives. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    cues: Rc<RefCell<Vec<Cue>>>,
    muted: bool,
    unlocks: Rc<RefCell<u32>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far (including while muted)
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Cue) -> bool) -> usize {
        self.cues.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn unlock_count(&self) -> u32 {
        *self.unlocks.borrow()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn unlock(&mut self) {
        *self.unlocks.borrow_mut() += 1;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    //! Procedural Web Audio synthesis - no audio files needed

    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorType};

    use super::{AudioSink, Cue};

    /// Master gain when unmuted
    const MASTER_GAIN: f32 = 0.18;
    /// Oscillators below this frequency are inaudible clicks
    const MIN_HZ: f32 = 12.0;

    /// One oscillator sweep with an attack/release envelope
    struct Tone {
        start_hz: f32,
        end_hz: f32,
        duration: f64,
        kind: OscillatorType,
        peak: f32,
        attack: f64,
        release: f64,
        offset: f64,
    }

    /// Web Audio backed sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        muted: bool,
        unlocked: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let master = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.gain().set_value(MASTER_GAIN);
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            Self {
                ctx,
                master,
                muted: false,
                unlocked: false,
            }
        }

        fn tone(&self, tone: Tone) {
            if self.muted || !self.unlocked {
                return;
            }
            let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
                return;
            };
            let Ok(osc) = ctx.create_oscillator() else { return };
            let Ok(gain) = ctx.create_gain() else { return };

            let now = ctx.current_time() + tone.offset;
            let end = now + tone.duration;
            let attack_end = now + tone.attack;
            let release_start = attack_end.max(end - tone.release);

            osc.set_type(tone.kind);
            osc.frequency().set_value_at_time(tone.start_hz.max(MIN_HZ), now).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz.max(MIN_HZ), end)
                .ok();

            gain.gain().set_value_at_time(0.0001, now).ok();
            gain.gain().linear_ramp_to_value_at_time(tone.peak, attack_end).ok();
            gain.gain().set_value_at_time(tone.peak * 0.6, release_start).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.0001, end).ok();

            if osc.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(master).is_err()
            {
                return;
            }
            osc.start_with_when(now).ok();
            osc.stop_with_when(end + 0.01).ok();
        }

        fn play_success(&self, count: usize, combo: u32) {
            let count_boost = (count as f32 * 18.0).min(180.0);
            let combo_boost = (combo as f32 * 12.0).min(140.0);
            let base = 500.0 + count_boost + combo_boost;
            self.tone(Tone {
                start_hz: base,
                end_hz: base * 1.08,
                duration: 0.1,
                kind: OscillatorType::Triangle,
                peak: 0.1,
                attack: 0.008,
                release: 0.06,
                offset: 0.0,
            });
            self.tone(Tone {
                start_hz: base * 1.22,
                end_hz: base * 1.32,
                duration: 0.11,
                kind: OscillatorType::Square,
                peak: 0.08,
                attack: 0.008,
                release: 0.07,
                offset: 0.045,
            });
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: Cue) {
            match cue {
                Cue::SpawnPreview => self.tone(Tone {
                    start_hz: 680.0,
                    end_hz: 590.0,
                    duration: 0.055,
                    kind: OscillatorType::Triangle,
                    peak: 0.065,
                    attack: 0.006,
                    release: 0.04,
                    offset: 0.0,
                }),
                Cue::Activate => self.tone(Tone {
                    start_hz: 360.0,
                    end_hz: 520.0,
                    duration: 0.07,
                    kind: OscillatorType::Square,
                    peak: 0.075,
                    attack: 0.005,
                    release: 0.05,
                    offset: 0.0,
                }),
                Cue::Success { count, combo } => self.play_success(count, combo),
                Cue::Error => self.tone(Tone {
                    start_hz: 190.0,
                    end_hz: 95.0,
                    duration: 0.17,
                    kind: OscillatorType::Sawtooth,
                    peak: 0.12,
                    attack: 0.005,
                    release: 0.12,
                    offset: 0.0,
                }),
                Cue::GameOver => {
                    self.tone(Tone {
                        start_hz: 430.0,
                        end_hz: 210.0,
                        duration: 0.24,
                        kind: OscillatorType::Triangle,
                        peak: 0.1,
                        attack: 0.01,
                        release: 0.18,
                        offset: 0.0,
                    });
                    self.tone(Tone {
                        start_hz: 240.0,
                        end_hz: 120.0,
                        duration: 0.27,
                        kind: OscillatorType::Square,
                        peak: 0.08,
                        attack: 0.01,
                        release: 0.2,
                        offset: 0.1,
                    });
                }
            }
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn toggle_mute(&mut self) -> bool {
            self.muted = !self.muted;
            if let (Some(ctx), Some(master)) = (&self.ctx, &self.master) {
                let level = if self.muted { 0.0 } else { MASTER_GAIN };
                master.gain().set_value_at_time(level, ctx.current_time()).ok();
            }
            self.muted
        }

        fn unlock(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            self.unlocked = true;
            if ctx.state() != AudioContextState::Running {
                // Browsers require a user gesture; resolve in the background
                if let Ok(promise) = ctx.resume() {
                    wasm_bindgen_futures::spawn_local(async move {
                        if wasm_bindgen_futures::JsFuture::from(promise).await.is_err() {
                            log::warn!("AudioContext resume rejected");
                        }
                    });
                }
            }
        }
    }
}
