use super::*;

/// A lighting, trigger or value event on one of the environment tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicEvent {
    pub id: EntityId,
    pub time: Beats,
    pub track_id: TrackId,
    pub effect: EventEffect,
    /// Only set for light events that are not `Off`.
    pub color_type: Option<EventColor>,
    /// Brightness in `0..=1`. Zero means the light is off whatever the effect is.
    pub float_value: f64,
    /// Magnitude of a `Value` event, e.g. the laser speed.
    #[serde(default)]
    pub value: i32,
}

/// Environment tracks that can be edited.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
    enum_iterator::Sequence,
)]
pub enum TrackId {
    LaserBack,
    TrackNeons,
    LaserLeft,
    LaserRight,
    PrimaryLight,
    LargeRing,
    SmallRing,
    LaserSpeedLeft,
    LaserSpeedRight,
}

/// What kind of events a track carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// On/off/color semantics.
    Light,
    /// Instant triggers without a state, like ring rotations.
    Trigger,
    /// A numeric value, like the laser speed.
    Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventEffect {
    Off,
    On,
    Flash,
    Fade,
    Transition,
    Trigger,
    Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventColor {
    /// Red.
    Primary,
    /// Blue.
    Secondary,
    White,
}

impl TrackId {
    /// Numeric event type used by every document version.
    pub fn event_type(&self) -> i32 {
        match self {
            TrackId::LaserBack => 0,
            TrackId::TrackNeons => 1,
            TrackId::LaserLeft => 2,
            TrackId::LaserRight => 3,
            TrackId::PrimaryLight => 4,
            TrackId::LargeRing => 8,
            TrackId::SmallRing => 9,
            TrackId::LaserSpeedLeft => 12,
            TrackId::LaserSpeedRight => 13,
        }
    }

    pub fn from_event_type(event_type: i32) -> Option<Self> {
        enum_iterator::all::<TrackId>().find(|track| track.event_type() == event_type)
    }

    pub fn kind(&self) -> TrackKind {
        match self {
            TrackId::LaserBack
            | TrackId::TrackNeons
            | TrackId::LaserLeft
            | TrackId::LaserRight
            | TrackId::PrimaryLight => TrackKind::Light,
            TrackId::LargeRing | TrackId::SmallRing => TrackKind::Trigger,
            TrackId::LaserSpeedLeft | TrackId::LaserSpeedRight => TrackKind::Value,
        }
    }

    pub fn is_light(&self) -> bool {
        self.kind() == TrackKind::Light
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackId::LaserBack => "laser-back",
            TrackId::TrackNeons => "track-neons",
            TrackId::LaserLeft => "laser-left",
            TrackId::LaserRight => "laser-right",
            TrackId::PrimaryLight => "primary-light",
            TrackId::LargeRing => "large-ring",
            TrackId::SmallRing => "small-ring",
            TrackId::LaserSpeedLeft => "laser-speed-left",
            TrackId::LaserSpeedRight => "laser-speed-right",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for TrackId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<TrackId>()
            .find(|track| track.to_string() == s)
            .ok_or_else(|| format!("unknown track {s:?}"))
    }
}

impl EventEffect {
    /// Whether the effect can light up a track, given a positive brightness.
    pub fn is_lit(&self) -> bool {
        matches!(
            self,
            EventEffect::On | EventEffect::Flash | EventEffect::Transition
        )
    }
}

/// Light events pack effect and color into a single integer:
/// `0` is off, otherwise `base + effect` where the effect is
/// `1` on, `2` flash, `3` fade, `4` transition and the base is
/// `0` for blue, `4` for red and `8` for white.
pub fn decode_light_value(value: i32) -> Option<(EventEffect, Option<EventColor>)> {
    if value == 0 {
        return Some((EventEffect::Off, None));
    }
    if !(1..=12).contains(&value) {
        return None;
    }
    let color = match (value - 1) / 4 {
        0 => EventColor::Secondary,
        1 => EventColor::Primary,
        _ => EventColor::White,
    };
    let effect = match (value - 1) % 4 {
        0 => EventEffect::On,
        1 => EventEffect::Flash,
        2 => EventEffect::Fade,
        _ => EventEffect::Transition,
    };
    Some((effect, Some(color)))
}

/// Inverse of [`decode_light_value`]. Returns `None` for effects that do not belong
/// on a light track, or for a lit effect without a color.
pub fn encode_light_value(effect: EventEffect, color: Option<EventColor>) -> Option<i32> {
    let effect = match effect {
        EventEffect::Off => return Some(0),
        EventEffect::On => 1,
        EventEffect::Flash => 2,
        EventEffect::Fade => 3,
        EventEffect::Transition => 4,
        EventEffect::Trigger | EventEffect::Value => return None,
    };
    let base = match color? {
        EventColor::Secondary => 0,
        EventColor::Primary => 4,
        EventColor::White => 8,
    };
    Some(base + effect)
}

impl BasicEvent {
    /// A light event at full brightness.
    pub fn light(time: Beats, track_id: TrackId, effect: EventEffect, color: EventColor) -> Self {
        Self {
            id: EntityId::new(),
            time,
            track_id,
            effect,
            color_type: Some(color),
            float_value: 1.0,
            value: 0,
        }
    }

    pub fn off(time: Beats, track_id: TrackId) -> Self {
        Self {
            id: EntityId::new(),
            time,
            track_id,
            effect: EventEffect::Off,
            color_type: None,
            float_value: 0.0,
            value: 0,
        }
    }

    pub fn trigger(time: Beats, track_id: TrackId) -> Self {
        Self {
            id: EntityId::new(),
            time,
            track_id,
            effect: EventEffect::Trigger,
            color_type: None,
            float_value: 1.0,
            value: 0,
        }
    }

    pub fn value(time: Beats, track_id: TrackId, value: i32) -> Self {
        Self {
            id: EntityId::new(),
            time,
            track_id,
            effect: EventEffect::Value,
            color_type: None,
            float_value: 1.0,
            value,
        }
    }

    pub fn with_brightness(self, float_value: f64) -> Self {
        Self {
            float_value,
            ..self
        }
    }

    /// Whether the event turns its light on: a lit effect with a color and a positive brightness.
    pub fn is_on(&self) -> bool {
        self.effect.is_lit() && self.color_type.is_some() && self.float_value > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case(0, EventEffect::Off, None)]
    #[test_case(1, EventEffect::On, Some(EventColor::Secondary))]
    #[test_case(3, EventEffect::Fade, Some(EventColor::Secondary))]
    #[test_case(5, EventEffect::On, Some(EventColor::Primary))]
    #[test_case(6, EventEffect::Flash, Some(EventColor::Primary))]
    #[test_case(8, EventEffect::Transition, Some(EventColor::Primary))]
    #[test_case(10, EventEffect::Flash, Some(EventColor::White))]
    #[test_case(12, EventEffect::Transition, Some(EventColor::White))]
    fn light_value_table(value: i32, effect: EventEffect, color: Option<EventColor>) {
        assert_eq!(decode_light_value(value), Some((effect, color)));
        assert_eq!(encode_light_value(effect, color), Some(value));
    }

    #[test]
    fn light_value_out_of_range() {
        assert_eq!(decode_light_value(13), None);
        assert_eq!(decode_light_value(-1), None);
        assert_eq!(encode_light_value(EventEffect::On, None), None);
        assert_eq!(
            encode_light_value(EventEffect::Trigger, Some(EventColor::Primary)),
            None
        );
    }

    #[test]
    fn track_classification() {
        let lights: Vec<_> = enum_iterator::all::<TrackId>()
            .filter(TrackId::is_light)
            .map(|track| track.event_type())
            .collect();
        assert_eq!(lights, vec![0, 1, 2, 3, 4]);
        assert_eq!(TrackId::LargeRing.kind(), TrackKind::Trigger);
        assert_eq!(TrackId::LaserSpeedRight.kind(), TrackKind::Value);
        assert_eq!(TrackId::from_event_type(5), None);
        assert_eq!("small-ring".parse(), Ok(TrackId::SmallRing));
    }

    #[test]
    fn zero_brightness_is_off() {
        let event = BasicEvent::light(1.0, TrackId::LaserLeft, EventEffect::On, EventColor::White);
        assert!(event.is_on());
        assert!(!event.clone().with_brightness(0.0).is_on());
        let fade = BasicEvent::light(1.0, TrackId::LaserLeft, EventEffect::Fade, EventColor::White);
        assert!(!fade.is_on());
    }
}
