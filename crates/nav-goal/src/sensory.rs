//! Sound and point-light events, and the goals they suggest.
//!
//! The host records events as the game emits them; [`SensoryQueues`] keeps
//! the most recent ones in two bounded rings.  Each refresh, the selector
//! asks this module which events are worth investigating and how much.
//!
//! Sound scoring (`age = now - timestamp`, clamped at 0, rejected past 1 s):
//!
//! ```text
//! score = 250 + info_volume * event_volume
//!       + 300 (firing weapon) | 200 (other player sounds)
//!       + 100 * recognition
//!       + 75 * (1 - attenuation)      when attenuation < 1
//!       - 300 * age
//! score = max(score, 1)
//! ```
//!
//! Light scoring: `200 + radius + 80 * Σ positive rgb + 50 / decay`.

use std::collections::VecDeque;

use nav_core::{EntityId, FrameClock, GoalId, NavConfig, Seconds, Vec3};

/// High bits of sound-derived goal ids.
pub const SOUND_GOAL_TAG: u32 = 0x0100_0000;
/// High bits of light-derived goal ids.
pub const LIGHT_GOAL_TAG: u32 = 0x0200_0000;
const SERIAL_MASK: u32 = 0x00FF_FFFF;

/// Sounds older than this never become goals.
pub const MAX_SOUND_AGE: Seconds = 1.0;
/// Lights smaller than this never become goals.
pub const LIGHT_RADIUS_THRESHOLD: f32 = 64.0;

// ── Sound info ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum SoundType {
    Ignore             = 0,
    Player             = 1,
    PlayerSteps        = 2,
    PlayerJump         = 3,
    PlayerWaterIn      = 4,
    PlayerWaterOut     = 5,
    PlayerFall         = 6,
    FiringWeapon       = 7,
    UsingPowerup       = 8,
    PickupWeapon       = 9,
    PickupAmmo         = 10,
    PickupArmor        = 11,
    PickupArmorShard   = 12,
    PickupPowerup      = 13,
    PickupHealthSmall  = 14,
    PickupHealthNormal = 15,
    PickupHealthLarge  = 16,
    PickupHealthMega   = 17,
    Door               = 18,
    Elevator           = 19,
    Teleport           = 20,
}

impl SoundType {
    pub fn from_raw(raw: i32) -> Option<SoundType> {
        use SoundType::*;
        const ALL: [SoundType; 21] = [
            Ignore, Player, PlayerSteps, PlayerJump, PlayerWaterIn, PlayerWaterOut, PlayerFall,
            FiringWeapon, UsingPowerup, PickupWeapon, PickupAmmo, PickupArmor, PickupArmorShard,
            PickupPowerup, PickupHealthSmall, PickupHealthNormal, PickupHealthLarge,
            PickupHealthMega, Door, Elevator, Teleport,
        ];
        usize::try_from(raw).ok().and_then(|i| ALL.get(i).copied())
    }

    /// Sounds a player body or weapon makes.
    #[inline]
    pub fn is_player_category(self) -> bool {
        (1..=7).contains(&(self as i32))
    }
}

/// One entry of the sound info table, as loaded by the host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundInfo {
    pub name:        String,
    pub volume:      f32,
    pub duration:    f32,
    /// Raw type value; see [`SoundType`].  Unknown values are kept.
    pub sound_type:  i32,
    pub recognition: f32,
}

impl SoundInfo {
    pub fn new(name: impl Into<String>, sound_type: SoundType, volume: f32) -> Self {
        Self { name: name.into(), volume, duration: 0.0, sound_type: sound_type as i32, recognition: 0.0 }
    }

    pub fn with_recognition(mut self, recognition: f32) -> Self {
        self.recognition = recognition;
        self
    }

    pub fn kind(&self) -> Option<SoundType> {
        SoundType::from_raw(self.sound_type)
    }
}

/// Lowercase, forward slashes, no leading `sound/`.
fn normalize_sound_name(name: &str) -> String {
    let lowered: String = name
        .chars()
        .map(|c| if c == '\\' { '/' } else { c.to_ascii_lowercase() })
        .collect();
    match lowered.strip_prefix("sound/") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// A sound as reported by the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SoundEmission {
    pub origin:      Vec3,
    pub entity:      EntityId,
    pub channel:     i32,
    /// Engine sound index (position in the registered asset list).
    pub sound_index: i32,
    pub volume:      f32,
    pub attenuation: f32,
    pub time_offset: Seconds,
}

/// A recorded sound: the emission plus resolved info and timestamp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SoundEvent {
    pub origin:      Vec3,
    pub entity:      EntityId,
    pub channel:     i32,
    pub sound_index: i32,
    pub info:        Option<usize>,
    pub volume:      f32,
    pub attenuation: f32,
    pub time_offset: Seconds,
    pub timestamp:   Seconds,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightEmission {
    pub origin:   Vec3,
    pub entity:   EntityId,
    pub radius:   f32,
    pub color:    [f32; 3],
    pub lifetime: Seconds,
    pub decay:    f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightEvent {
    pub origin:    Vec3,
    pub entity:    EntityId,
    pub radius:    f32,
    pub color:     [f32; 3],
    pub lifetime:  Seconds,
    pub decay:     f32,
    pub timestamp: Seconds,
}

// ── SensoryQueues ─────────────────────────────────────────────────────────────

/// Bounded rings of recent sound and light events, plus the sound info table.
///
/// A full ring drops its oldest event to make room.  A ring with capacity 0
/// records nothing.
#[derive(Clone, Debug)]
pub struct SensoryQueues {
    clock:          FrameClock,
    infos:          Vec<SoundInfo>,
    /// Sound index → info index, built by `register_assets`.
    asset_info:     Vec<Option<usize>>,
    sounds:         VecDeque<SoundEvent>,
    lights:         VecDeque<LightEvent>,
    sound_capacity: usize,
    light_capacity: usize,
}

impl SensoryQueues {
    pub fn new(sound_capacity: usize, light_capacity: usize) -> Self {
        Self {
            clock: FrameClock::new(),
            infos: Vec::new(),
            asset_info: Vec::new(),
            sounds: VecDeque::with_capacity(sound_capacity),
            lights: VecDeque::with_capacity(light_capacity),
            sound_capacity,
            light_capacity,
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.sound_queue_capacity, config.light_queue_capacity)
    }

    // ── Sound info table ─────────────────────────────────────────────────

    /// Replace the info table.  Assets must be registered again afterwards.
    pub fn set_sound_infos(&mut self, infos: Vec<SoundInfo>) {
        self.infos = infos;
        self.asset_info.clear();
    }

    /// Map engine sound indices to info entries by name.  Index `i` of
    /// `assets` is sound index `i`; names without an info stay unresolved.
    /// Returns how many resolved.
    pub fn register_assets<S: AsRef<str>>(&mut self, assets: &[S]) -> usize {
        let resolved: Vec<Option<usize>> = assets.iter().map(|a| self.find_info(a.as_ref())).collect();
        self.asset_info = resolved;
        self.asset_info.iter().flatten().count()
    }

    /// Index of the info whose normalized name matches `name`.
    pub fn find_info(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        let wanted = normalize_sound_name(name);
        self.infos.iter().position(|i| normalize_sound_name(&i.name) == wanted)
    }

    pub fn info(&self, index: usize) -> Option<&SoundInfo> {
        self.infos.get(index)
    }

    pub fn info_for_sound_index(&self, sound_index: i32) -> Option<&SoundInfo> {
        let slot = usize::try_from(sound_index).ok()?;
        let info = (*self.asset_info.get(slot)?)?;
        self.infos.get(info)
    }

    // ── Frame ────────────────────────────────────────────────────────────

    pub fn set_frame_time(&mut self, now: Seconds) {
        self.clock.set_time(now);
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// Forget every recorded event.
    pub fn reset_frame_events(&mut self) {
        self.sounds.clear();
        self.lights.clear();
    }

    // ── Recording ────────────────────────────────────────────────────────

    /// Record a sound stamped at frame time + its offset.
    pub fn record_sound(&mut self, emission: SoundEmission) -> bool {
        if self.sound_capacity == 0 {
            return false;
        }
        if self.sounds.len() == self.sound_capacity {
            self.sounds.pop_front();
        }
        let info = usize::try_from(emission.sound_index)
            .ok()
            .and_then(|i| self.asset_info.get(i).copied().flatten());
        self.sounds.push_back(SoundEvent {
            origin:      emission.origin,
            entity:      emission.entity,
            channel:     emission.channel,
            sound_index: emission.sound_index,
            info,
            volume:      emission.volume,
            attenuation: emission.attenuation,
            time_offset: emission.time_offset,
            timestamp:   self.clock.now + emission.time_offset,
        });
        true
    }

    pub fn record_light(&mut self, emission: LightEmission) -> bool {
        if self.light_capacity == 0 {
            return false;
        }
        if self.lights.len() == self.light_capacity {
            self.lights.pop_front();
        }
        self.lights.push_back(LightEvent {
            origin:    emission.origin,
            entity:    emission.entity,
            radius:    emission.radius,
            color:     emission.color,
            lifetime:  emission.lifetime,
            decay:     emission.decay,
            timestamp: self.clock.now,
        });
        true
    }

    /// Oldest first.
    pub fn sounds(&self) -> impl Iterator<Item = &SoundEvent> {
        self.sounds.iter()
    }

    pub fn lights(&self) -> impl Iterator<Item = &LightEvent> {
        self.lights.iter()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

impl Default for SensoryQueues {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Worth turning into a goal: a player or weapon sound, a recognised sound,
/// or a loud one.  Sounds with no info never qualify.
pub fn sound_is_high_priority(info: Option<&SoundInfo>, event: &SoundEvent) -> bool {
    let Some(info) = info else { return false };
    if info.sound_type <= SoundType::Ignore as i32 {
        return false;
    }
    info.sound_type <= SoundType::FiringWeapon as i32 || info.recognition > 0.0 || event.volume >= 0.75
}

pub fn sound_score(info: Option<&SoundInfo>, event: &SoundEvent, age: Seconds) -> f32 {
    let info_volume = info.map_or(75.0, |i| if i.volume > 0.0 { i.volume } else { 75.0 });
    let event_volume = if event.volume > 0.0 { event.volume } else { 1.0 };
    let mut score = 250.0 + info_volume * event_volume;

    if let Some(info) = info {
        score += match info.kind() {
            Some(SoundType::FiringWeapon) => 300.0,
            Some(k) if k.is_player_category() => 200.0,
            _ => 0.0,
        };
        if info.recognition > 0.0 {
            score += info.recognition * 100.0;
        }
    }

    let attenuation = if event.attenuation > 0.0 { event.attenuation } else { 1.0 };
    if attenuation < 1.0 {
        score += (1.0 - attenuation) * 75.0;
    }
    if age > 0.0 {
        score -= age * 300.0;
    }
    score.max(1.0)
}

/// Score of a sound heard at `now`, or `None` when it should be ignored.
pub fn sound_goal_score(info: Option<&SoundInfo>, event: &SoundEvent, now: Seconds) -> Option<f32> {
    if !sound_is_high_priority(info, event) {
        return None;
    }
    let age = now - event.timestamp;
    if age > MAX_SOUND_AGE {
        return None;
    }
    Some(sound_score(info, event, age.max(0.0)))
}

pub fn light_score(event: &LightEvent) -> f32 {
    let radius = event.radius.max(0.0);
    let intensity: f32 = event.color.iter().filter(|c| **c > 0.0).sum();
    let mut score = 200.0 + radius + intensity * 80.0;
    if event.decay > 0.0 {
        score += 50.0 / event.decay;
    }
    score
}

/// Score of a light, or `None` when it is too small to matter.
pub fn light_goal_score(event: &LightEvent) -> Option<f32> {
    (event.radius >= LIGHT_RADIUS_THRESHOLD).then(|| light_score(event))
}

// ── Sensory goal ids ──────────────────────────────────────────────────────────

/// Wrapping 24-bit serial behind synthesized goal ids.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorySerial(u32);

impl SensorySerial {
    /// Resume from a saved serial.
    pub fn starting_at(serial: u32) -> Self {
        SensorySerial(serial & SERIAL_MASK)
    }

    /// Next id under `tag`: `-(tag | serial)` with serial in `1..=0xFF_FFFF`.
    pub fn next(&mut self, tag: u32) -> GoalId {
        self.0 = (self.0 + 1) & SERIAL_MASK;
        if self.0 == 0 {
            self.0 = 1;
        }
        GoalId(-((tag | self.0) as i32))
    }

    pub fn current(self) -> u32 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}
