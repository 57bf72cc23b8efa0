use super::*;

/// A contiguous period during which a light shows a constant color and brightness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundBox {
    /// The beat at which the light turns on.
    pub time: Beats,
    /// Length in beats, never zero.
    pub duration: Beats,
    pub start_color: EventColor,
    pub end_color: EventColor,
    pub start_brightness: f64,
    pub end_brightness: f64,
}

/// What a light track is showing at some point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LightState {
    pub color: EventColor,
    pub brightness: f64,
}

/// The part of the timeline that is being looked at: `[start_beat, start_beat + num_of_beats)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BeatWindow {
    pub start_beat: Beats,
    pub num_of_beats: Beats,
}

/// A box that has been opened but whose end is not known yet.
#[derive(Debug, Clone, Copy)]
struct TentativeBox {
    time: Beats,
    color: EventColor,
    brightness: f64,
}

impl BeatWindow {
    pub fn new(start_beat: Beats, num_of_beats: Beats) -> Self {
        Self {
            start_beat,
            num_of_beats,
        }
    }

    pub fn end_beat(&self) -> Beats {
        self.start_beat + self.num_of_beats
    }

    pub fn contains(&self, beat: Beats) -> bool {
        beat >= self.start_beat && beat < self.end_beat()
    }
}

impl TentativeBox {
    fn close(self, end: Beats) -> BackgroundBox {
        BackgroundBox {
            time: self.time,
            duration: end - self.time,
            start_color: self.color,
            end_color: self.color,
            start_brightness: self.brightness,
            end_brightness: self.brightness,
        }
    }
}

impl BackgroundBox {
    pub fn end(&self) -> Beats {
        self.time + self.duration
    }
}

/// Turns the events of a single light track into the intervals during which it is lit.
///
/// `initial` is the state the light was already in when the window starts, `None` if it was off.
/// Tracks without on/off semantics produce no boxes. Events outside of the window are ignored.
/// Consecutive "on" events always split the light into separate boxes, even if they share a color.
pub fn create_background_boxes(
    events: &[BasicEvent],
    track_id: TrackId,
    initial: Option<LightState>,
    window: BeatWindow,
) -> Vec<BackgroundBox> {
    if !track_id.is_light() {
        return Vec::new();
    }

    let mut events: Vec<&BasicEvent> = events
        .iter()
        .filter(|event| window.contains(event.time))
        .collect();
    events.sort_by(|a, b| chronological(a, b));

    let mut boxes = Vec::new();
    let mut tentative = initial.map(|state| TentativeBox {
        time: window.start_beat,
        color: state.color,
        brightness: state.brightness,
    });

    if tentative.is_some() && events.is_empty() {
        // Lit through the whole window
        boxes.extend(tentative.map(|open| open.close(window.end_beat())));
        return boxes;
    }

    for event in events {
        let lit = event
            .color_type
            .filter(|_| event.is_on())
            .map(|color| TentativeBox {
                time: event.time,
                color,
                brightness: event.float_value,
            });

        tentative = match (tentative, lit) {
            (None, lit) => lit,
            (Some(open), None) => {
                push_non_empty(&mut boxes, open.close(event.time));
                None
            }
            (Some(open), Some(lit)) => {
                // Re-triggering at the same instant must not leave an empty box behind
                push_non_empty(&mut boxes, open.close(event.time));
                Some(lit)
            }
        };
    }

    if let Some(open) = tentative {
        push_non_empty(&mut boxes, open.close(window.end_beat()));
    }

    boxes
}

/// Orders events by time. Simultaneous events are ordered by the state they leave
/// the light in, so that the lit one comes last regardless of input order.
fn chronological(a: &BasicEvent, b: &BasicEvent) -> Ordering {
    let lit_state = |event: &BasicEvent| (event.is_on(), event.color_type, event.float_value);
    let (a_lit, a_color, a_brightness) = lit_state(a);
    let (b_lit, b_color, b_brightness) = lit_state(b);
    a.time
        .total_cmp(&b.time)
        .then_with(|| a_lit.cmp(&b_lit))
        .then_with(|| a_color.cmp(&b_color))
        .then_with(|| a_brightness.total_cmp(&b_brightness))
}

fn push_non_empty(boxes: &mut Vec<BackgroundBox>, closed: BackgroundBox) {
    if closed.duration > 0.0 {
        boxes.push(closed);
    }
}

/// The state a light track is in right before `beat`, judging by the last event before it.
pub fn initial_light_state(
    events: &[BasicEvent],
    track_id: TrackId,
    beat: Beats,
) -> Option<LightState> {
    if !track_id.is_light() {
        return None;
    }

    let last = events
        .iter()
        .filter(|event| event.track_id == track_id && event.time < beat)
        .max_by(|a, b| chronological(a, b))?;
    let color = last.color_type.filter(|_| last.is_on())?;
    Some(LightState {
        color,
        brightness: last.float_value,
    })
}

/// Builds the boxes of a track for the visible window, starting from the lighting state
/// the track has at the start of the window.
pub fn visible_background_boxes(
    repository: &impl EntityRepository,
    track_id: TrackId,
    window: BeatWindow,
) -> Vec<BackgroundBox> {
    let events = repository.events_for_track(track_id);
    let initial = initial_light_state(&events, track_id, window.start_beat);
    create_background_boxes(&events, track_id, initial, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PRIMARY: EventColor = EventColor::Primary;
    const SECONDARY: EventColor = EventColor::Secondary;
    const TRACK: TrackId = TrackId::PrimaryLight;

    fn window() -> BeatWindow {
        BeatWindow::new(8.0, 8.0)
    }

    fn on(time: Beats, color: EventColor) -> BasicEvent {
        BasicEvent::light(time, TRACK, EventEffect::On, color)
    }

    fn off(time: Beats) -> BasicEvent {
        BasicEvent::off(time, TRACK)
    }

    fn lit(time: Beats, duration: Beats, color: EventColor) -> BackgroundBox {
        BackgroundBox {
            time,
            duration,
            start_color: color,
            end_color: color,
            start_brightness: 1.0,
            end_brightness: 1.0,
        }
    }

    fn primary_state() -> Option<LightState> {
        Some(LightState {
            color: PRIMARY,
            brightness: 1.0,
        })
    }

    #[test]
    fn non_light_track_is_ignored() {
        let events = vec![on(8.0, PRIMARY), off(12.0)];
        for track in [TrackId::LargeRing, TrackId::LaserSpeedLeft] {
            assert_eq!(
                create_background_boxes(&events, track, primary_state(), window()),
                vec![]
            );
        }
    }

    #[test]
    fn empty_window_without_light() {
        assert_eq!(create_background_boxes(&[], TRACK, None, window()), vec![]);
    }

    #[test]
    fn empty_window_with_initial_light() {
        assert_eq!(
            create_background_boxes(&[], TRACK, primary_state(), window()),
            vec![lit(8.0, 8.0, PRIMARY)]
        );
    }

    #[test]
    fn initial_brightness_is_kept() {
        let initial = Some(LightState {
            color: SECONDARY,
            brightness: 0.25,
        });
        let boxes = create_background_boxes(&[off(10.0)], TRACK, initial, window());
        assert_eq!(
            boxes,
            vec![BackgroundBox {
                start_brightness: 0.25,
                end_brightness: 0.25,
                ..lit(8.0, 2.0, SECONDARY)
            }]
        );
    }

    #[test]
    fn basic_on_off() {
        let events = vec![on(8.0, PRIMARY), off(12.0)];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(8.0, 4.0, PRIMARY)]
        );
    }

    #[test]
    fn retrigger_same_color_splits_boxes() {
        let events = vec![on(12.0, PRIMARY)];
        assert_eq!(
            create_background_boxes(&events, TRACK, primary_state(), window()),
            vec![lit(8.0, 4.0, PRIMARY), lit(12.0, 4.0, PRIMARY)]
        );
    }

    #[test]
    fn color_change() {
        let events = vec![on(8.0, PRIMARY), on(12.0, SECONDARY), off(14.0)];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(8.0, 4.0, PRIMARY), lit(12.0, 2.0, SECONDARY)]
        );
    }

    #[test]
    fn unsorted_events_are_sorted() {
        let events = vec![off(14.0), on(12.0, SECONDARY), on(8.0, PRIMARY)];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(8.0, 4.0, PRIMARY), lit(12.0, 2.0, SECONDARY)]
        );
    }

    #[test]
    fn retrigger_at_window_start_is_not_empty() {
        let events = vec![on(8.0, SECONDARY)];
        assert_eq!(
            create_background_boxes(&events, TRACK, primary_state(), window()),
            vec![lit(8.0, 8.0, SECONDARY)]
        );
    }

    #[test]
    fn fade_and_dark_events_do_not_open_boxes() {
        let events = vec![
            BasicEvent::light(9.0, TRACK, EventEffect::Fade, PRIMARY),
            on(10.0, PRIMARY).with_brightness(0.0),
            BasicEvent::light(11.0, TRACK, EventEffect::Flash, SECONDARY),
        ];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(11.0, 5.0, SECONDARY)]
        );
    }

    #[test]
    fn fade_closes_an_open_box() {
        let events = vec![
            on(9.0, PRIMARY),
            BasicEvent::light(10.0, TRACK, EventEffect::Fade, PRIMARY),
        ];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(9.0, 1.0, PRIMARY)]
        );
    }

    #[test]
    fn events_outside_window_are_ignored() {
        let events = vec![on(2.0, PRIMARY), on(10.0, SECONDARY), off(16.0), on(20.0, PRIMARY)];
        assert_eq!(
            create_background_boxes(&events, TRACK, None, window()),
            vec![lit(10.0, 6.0, SECONDARY)]
        );
    }

    #[test]
    fn initial_state_from_history() {
        let events = vec![on(2.0, PRIMARY), on(5.0, SECONDARY), off(9.0)];
        assert_eq!(
            initial_light_state(&events, TRACK, 8.0),
            Some(LightState {
                color: SECONDARY,
                brightness: 1.0
            })
        );
        assert_eq!(initial_light_state(&events, TRACK, 2.0), None);
        assert_eq!(initial_light_state(&events, TRACK, 10.0), None);
        assert_eq!(initial_light_state(&events, TrackId::SmallRing, 8.0), None);
    }

    #[test]
    fn simultaneous_events_do_not_depend_on_input_order() {
        let forward = vec![on(5.0, PRIMARY), off(5.0)];
        let backward = vec![off(5.0), on(5.0, PRIMARY)];
        let expected = Some(LightState {
            color: PRIMARY,
            brightness: 1.0,
        });
        assert_eq!(initial_light_state(&forward, TRACK, 8.0), expected);
        assert_eq!(initial_light_state(&backward, TRACK, 8.0), expected);

        let forward = vec![on(5.0, PRIMARY), on(5.0, SECONDARY)];
        let backward = vec![on(5.0, SECONDARY), on(5.0, PRIMARY)];
        assert_eq!(
            initial_light_state(&forward, TRACK, 8.0),
            initial_light_state(&backward, TRACK, 8.0)
        );

        let forward = vec![on(10.0, SECONDARY), off(10.0)];
        let backward = vec![off(10.0), on(10.0, SECONDARY)];
        assert_eq!(
            create_background_boxes(&forward, TRACK, None, window()),
            vec![lit(10.0, 6.0, SECONDARY)]
        );
        assert_eq!(
            create_background_boxes(&backward, TRACK, None, window()),
            vec![lit(10.0, 6.0, SECONDARY)]
        );
    }

    #[test]
    fn boxes_from_repository() {
        let mut beatmap = Beatmap::default();
        beatmap.entities.events = vec![
            on(4.0, SECONDARY),
            on(12.0, PRIMARY),
            BasicEvent::light(10.0, TrackId::LaserLeft, EventEffect::On, PRIMARY),
        ];
        assert_eq!(
            visible_background_boxes(&beatmap, TRACK, window()),
            vec![lit(8.0, 4.0, SECONDARY), lit(12.0, 4.0, PRIMARY)]
        );
    }

    fn arb_event() -> impl Strategy<Value = BasicEvent> {
        let effect = prop_oneof![
            Just(EventEffect::Off),
            Just(EventEffect::On),
            Just(EventEffect::Flash),
            Just(EventEffect::Fade),
            Just(EventEffect::Transition),
        ];
        let color = prop_oneof![Just(PRIMARY), Just(SECONDARY), Just(EventColor::White)];
        (0u32..96, effect, color, prop_oneof![Just(0.0), Just(0.5), Just(1.0)]).prop_map(
            |(quarter, effect, color, brightness)| {
                BasicEvent::light(f64::from(quarter) / 4.0, TRACK, effect, color)
                    .with_brightness(brightness)
            },
        )
    }

    proptest! {
        #[test]
        fn boxes_are_ordered_and_disjoint(
            events in proptest::collection::vec(arb_event(), 0..24),
            initially_lit in any::<bool>(),
            start in 0u32..16,
            length in 1u32..16,
        ) {
            let window = BeatWindow::new(f64::from(start), f64::from(length));
            let initial = initially_lit.then_some(LightState { color: PRIMARY, brightness: 1.0 });
            let boxes = create_background_boxes(&events, TRACK, initial, window);
            for single in &boxes {
                prop_assert!(single.duration > 0.0);
                prop_assert!(single.time >= window.start_beat);
                prop_assert!(single.end() <= window.end_beat());
            }
            for pair in boxes.windows(2) {
                prop_assert!(pair[0].end() <= pair[1].time);
            }
        }
    }
}
