use serde::{Deserialize, Serialize};

use crate::{DEFAULT_INTENSITY, DEGREES_PER_UNIT, Emotion, MAX_INTENSITY};

/// Screens of the exercise, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    Intro,
    SelectEmotion,
    Visualize,
    Control,
    Complete,
}

/// Animation class applied to the falling water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowClass {
    None,
    Trickle,
    Steady,
    Torrent,
}

impl FlowClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Trickle => "trickle",
            Self::Steady => "steady",
            Self::Torrent => "torrent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SessionRecord")]
pub struct ExerciseSession {
    step: Step,
    emotion: Emotion,
    initial_intensity: u8,
    current_intensity: u8,
    dragging: bool,
    /// Rotation accumulated by the current drag that has not yet added up to a
    /// whole intensity unit.
    #[serde(skip)]
    drag_residual: i32,
}

/// Wire form of a session restored by a UI host. Intensities are clamped on
/// the way in so derived values never see anything outside 0..=10.
#[derive(Deserialize)]
struct SessionRecord {
    step: Step,
    emotion: Emotion,
    initial_intensity: i64,
    current_intensity: i64,
    #[serde(default)]
    dragging: bool,
}

impl From<SessionRecord> for ExerciseSession {
    fn from(record: SessionRecord) -> Self {
        let clamp = |v: i64| v.clamp(0, MAX_INTENSITY as i64) as u8;
        Self {
            step: record.step,
            emotion: record.emotion,
            initial_intensity: clamp(record.initial_intensity),
            current_intensity: clamp(record.current_intensity),
            dragging: record.dragging && record.step == Step::Control,
            drag_residual: 0,
        }
    }
}

impl Default for ExerciseSession {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_intensity(value: i32) -> u8 {
    value.clamp(0, MAX_INTENSITY as i32) as u8
}

impl ExerciseSession {
    pub fn new() -> Self {
        Self {
            step: Step::Intro,
            emotion: Emotion::default(),
            initial_intensity: DEFAULT_INTENSITY,
            current_intensity: DEFAULT_INTENSITY,
            dragging: false,
            drag_residual: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn initial_intensity(&self) -> u8 {
        self.initial_intensity
    }

    pub fn current_intensity(&self) -> u8 {
        self.current_intensity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn water_color(&self) -> &'static str {
        self.emotion.water_color()
    }

    // -- Transitions --

    pub fn start(&mut self) -> Step {
        if self.step == Step::Intro {
            self.step = Step::SelectEmotion;
        }
        self.step
    }

    pub fn select_emotion(&mut self, emotion: Emotion) {
        if self.step == Step::SelectEmotion {
            self.emotion = emotion;
        }
    }

    /// Rating slider on the selection screen. The current level starts from
    /// whatever the user rated.
    pub fn set_initial_intensity(&mut self, value: i32) {
        if self.step == Step::SelectEmotion {
            let value = clamp_intensity(value);
            self.initial_intensity = value;
            self.current_intensity = value;
        }
    }

    pub fn begin_visualize(&mut self) -> Step {
        if self.step == Step::SelectEmotion {
            self.step = Step::Visualize;
        }
        self.step
    }

    pub fn begin_control(&mut self) -> Step {
        if self.step == Step::Visualize {
            self.step = Step::Control;
        }
        self.step
    }

    pub fn set_current_intensity(&mut self, value: i32) {
        if self.step == Step::Control {
            self.current_intensity = clamp_intensity(value);
        }
    }

    pub fn start_drag(&mut self) {
        if self.step == Step::Control {
            self.dragging = true;
            self.drag_residual = 0;
        }
    }

    /// Rotate the tap handle while dragging. Positive degrees turn the tap
    /// down (lower intensity), negative turn it back up.
    pub fn drag_by(&mut self, delta_degrees: i32) {
        if !self.dragging || self.step != Step::Control {
            return;
        }
        self.drag_residual += delta_degrees;
        let units = self.drag_residual / DEGREES_PER_UNIT;
        if units != 0 {
            self.drag_residual -= units * DEGREES_PER_UNIT;
            self.current_intensity = clamp_intensity(self.current_intensity as i32 - units);
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_residual = 0;
    }

    pub fn finish(&mut self) -> Step {
        if self.step == Step::Control {
            self.end_drag();
            self.step = Step::Complete;
        }
        self.step
    }

    pub fn back(&mut self) -> Step {
        self.step = match self.step {
            Step::SelectEmotion => Step::Intro,
            Step::Visualize => Step::SelectEmotion,
            Step::Control => {
                self.end_drag();
                Step::Visualize
            }
            other => other,
        };
        self.step
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }

    // -- Derived display values --

    pub fn water_height_percent(&self) -> u16 {
        u16::from(self.current_intensity.min(MAX_INTENSITY)) * 10
    }

    pub fn flow_class(&self) -> FlowClass {
        match self.current_intensity {
            0 => FlowClass::None,
            1..=3 => FlowClass::Trickle,
            4..=6 => FlowClass::Steady,
            _ => FlowClass::Torrent,
        }
    }

    /// 0° with the tap fully open at maximum intensity, 180° when closed.
    pub fn tap_rotation_degrees(&self) -> i32 {
        (MAX_INTENSITY as i32 - self.current_intensity as i32) * DEGREES_PER_UNIT
    }

    /// How far the user brought the intensity down.
    pub fn relief(&self) -> u8 {
        self.initial_intensity.saturating_sub(self.current_intensity)
    }
}
