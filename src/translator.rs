//! Maneuver translation — raw routing-engine steps to spoken Korean guidance
//!
//! Everything here is pure and infallible: missing street names or
//! modifiers fall back to the generic sentences instead of failing.

use crate::routing::{RawRoute, RawStep};
use crate::types::{Instruction, InstructionType, RouteResult, TurnModifier, Waypoint};

/// Translate a raw route into ordered instructions and waypoints
///
/// Step indices follow the order the engine reported the maneuvers in.
pub fn translate(route: &RawRoute) -> RouteResult {
    let mut waypoints = Vec::with_capacity(route.steps.len());
    let mut instructions = Vec::with_capacity(route.steps.len());

    for (index, step) in route.steps.iter().enumerate() {
        let instruction = translate_step(index as u32, step);
        waypoints.push(instruction.location.clone());
        instructions.push(instruction);
    }

    RouteResult {
        distance: whole_units(route.distance),
        duration: whole_units(route.duration),
        waypoints,
        instructions,
    }
}

/// Translate a single maneuver
pub fn translate_step(step: u32, raw: &RawStep) -> Instruction {
    let street = street_name(raw);
    let distance = whole_units(raw.distance);

    Instruction {
        step,
        kind: map_instruction_type(raw.maneuver_type.as_deref()),
        modifier: map_turn_modifier(raw.modifier.as_deref()),
        text: instruction_text(
            raw.maneuver_type.as_deref(),
            raw.modifier.as_deref(),
            street,
            distance,
        ),
        distance,
        location: Waypoint {
            lat: raw.location.lat,
            lng: raw.location.lng,
            name: street.map(str::to_string),
        },
    }
}

/// Map an engine maneuver type; anything unknown is `continue_straight`
pub fn map_instruction_type(raw: Option<&str>) -> InstructionType {
    match raw {
        Some("depart") => InstructionType::Depart,
        Some("arrive") => InstructionType::Arrive,
        Some("turn") => InstructionType::Turn,
        Some("crosswalk") => InstructionType::Crosswalk,
        _ => InstructionType::ContinueStraight,
    }
}

/// Map an engine modifier; anything unknown is `straight`
pub fn map_turn_modifier(raw: Option<&str>) -> TurnModifier {
    match raw {
        Some("left") => TurnModifier::Left,
        Some("right") => TurnModifier::Right,
        Some("slight left" | "slight_left") => TurnModifier::SlightLeft,
        Some("slight right" | "slight_right") => TurnModifier::SlightRight,
        Some("uturn") => TurnModifier::Uturn,
        _ => TurnModifier::Straight,
    }
}

fn direction_word(modifier: TurnModifier) -> &'static str {
    match modifier {
        TurnModifier::Left => "좌회전",
        TurnModifier::Right => "우회전",
        TurnModifier::SlightLeft => "약간 왼쪽으로",
        TurnModifier::SlightRight => "약간 오른쪽으로",
        TurnModifier::Uturn => "유턴",
        TurnModifier::Straight => "직진",
    }
}

/// Build the spoken sentence for one maneuver
pub fn instruction_text(
    maneuver_type: Option<&str>,
    modifier: Option<&str>,
    street: Option<&str>,
    distance: u32,
) -> String {
    let street = street.filter(|s| !s.is_empty());

    match (map_instruction_type(maneuver_type), modifier) {
        (InstructionType::Depart, _) => match street {
            Some(name) => format!("{name} 방향으로 출발하세요"),
            None => "경로를 따라 출발하세요".to_string(),
        },
        (InstructionType::Arrive, _) => "목적지에 도착했습니다".to_string(),
        (InstructionType::Turn, Some(raw_modifier)) => {
            let direction = direction_word(map_turn_modifier(Some(raw_modifier)));
            let distance = format_distance(distance);
            match street {
                Some(name) => format!("{distance} 후 {direction}하여 {name} 방향으로 가세요"),
                None => format!("{distance} 후 {direction}하세요"),
            }
        }
        _ => {
            let distance = format_distance(distance);
            match street {
                Some(name) => format!("{name}을(를) 따라 {distance} 직진하세요"),
                None => format!("{distance} 직진하세요"),
            }
        }
    }
}

/// Format meters for speech
///
/// Under 100 m the exact value is spoken, under 1 km it is truncated to
/// tens of meters, above that it is kilometers with one decimal.
pub fn format_distance(meters: u32) -> String {
    if meters < 100 {
        format!("{meters}미터")
    } else if meters < 1000 {
        format!("{}미터", meters / 10 * 10)
    } else {
        // Half-up rounding in integer tenths keeps e.g. 1250 → "1.3".
        let tenths = (u64::from(meters) + 50) / 100;
        format!("{}.{}킬로미터", tenths / 10, tenths % 10)
    }
}

fn street_name(raw: &RawStep) -> Option<&str> {
    raw.name.as_deref().filter(|s| !s.is_empty())
}

/// Truncate an engine-reported quantity to whole units
fn whole_units(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    fn step(kind: Option<&str>, modifier: Option<&str>, name: Option<&str>, distance: f64) -> RawStep {
        RawStep {
            maneuver_type: kind.map(str::to_string),
            modifier: modifier.map(str::to_string),
            name: name.map(str::to_string),
            distance,
            location: Coordinate::new(37.5665, 126.9780),
        }
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0), "0미터");
        assert_eq!(format_distance(45), "45미터");
        assert_eq!(format_distance(99), "99미터");
        assert_eq!(format_distance(100), "100미터");
        assert_eq!(format_distance(532), "530미터");
        assert_eq!(format_distance(999), "990미터");
        assert_eq!(format_distance(1000), "1.0킬로미터");
        assert_eq!(format_distance(1500), "1.5킬로미터");
        assert_eq!(format_distance(1250), "1.3킬로미터");
        assert_eq!(format_distance(12_345), "12.3킬로미터");
    }

    #[test]
    fn test_depart_text() {
        assert_eq!(
            instruction_text(Some("depart"), None, Some("세종대로"), 120),
            "세종대로 방향으로 출발하세요"
        );
        assert_eq!(instruction_text(Some("depart"), None, None, 120), "경로를 따라 출발하세요");
        assert_eq!(instruction_text(Some("depart"), None, Some(""), 120), "경로를 따라 출발하세요");
    }

    #[test]
    fn test_arrive_text_is_fixed() {
        assert_eq!(
            instruction_text(Some("arrive"), Some("left"), Some("세종대로"), 0),
            "목적지에 도착했습니다"
        );
    }

    #[test]
    fn test_turn_text() {
        assert_eq!(
            instruction_text(Some("turn"), Some("left"), Some("을지로"), 45),
            "45미터 후 좌회전하여 을지로 방향으로 가세요"
        );
        assert_eq!(
            instruction_text(Some("turn"), Some("slight right"), None, 532),
            "530미터 후 약간 오른쪽으로하세요"
        );
        assert_eq!(
            instruction_text(Some("turn"), Some("uturn"), None, 1500),
            "1.5킬로미터 후 유턴하세요"
        );
        assert_eq!(
            instruction_text(Some("turn"), Some("sharp left"), None, 30),
            "30미터 후 직진하세요"
        );
    }

    #[test]
    fn test_turn_without_modifier_falls_back_to_straight_text() {
        assert_eq!(instruction_text(Some("turn"), None, None, 45), "45미터 직진하세요");
    }

    #[test]
    fn test_continue_text() {
        assert_eq!(
            instruction_text(Some("new name"), None, Some("종로"), 230),
            "종로을(를) 따라 230미터 직진하세요"
        );
        assert_eq!(instruction_text(None, None, None, 80), "80미터 직진하세요");
        assert_eq!(instruction_text(Some("crosswalk"), None, None, 15), "15미터 직진하세요");
    }

    #[test]
    fn test_type_and_modifier_mapping() {
        assert_eq!(map_instruction_type(Some("roundabout")), InstructionType::ContinueStraight);
        assert_eq!(map_instruction_type(None), InstructionType::ContinueStraight);
        assert_eq!(map_turn_modifier(Some("slight left")), TurnModifier::SlightLeft);
        assert_eq!(map_turn_modifier(Some("sharp right")), TurnModifier::Straight);
        assert_eq!(map_turn_modifier(None), TurnModifier::Straight);
    }

    #[test]
    fn test_translate_preserves_order_and_waypoints() {
        let route = RawRoute {
            distance: 850.7,
            duration: 600.2,
            steps: vec![
                step(Some("depart"), None, Some("세종대로"), 300.0),
                step(Some("turn"), Some("left"), Some(""), 532.4),
                step(Some("arrive"), None, None, 0.0),
            ],
        };

        let result = translate(&route);
        assert_eq!(result.distance, 850);
        assert_eq!(result.duration, 600);
        assert_eq!(result.instructions.len(), 3);
        assert_eq!(result.waypoints.len(), 3);

        let steps: Vec<u32> = result.instructions.iter().map(|i| i.step).collect();
        assert_eq!(steps, vec![0, 1, 2]);

        assert_eq!(result.instructions[0].kind, InstructionType::Depart);
        assert_eq!(result.instructions[1].kind, InstructionType::Turn);
        assert_eq!(result.instructions[1].modifier, TurnModifier::Left);
        assert_eq!(result.instructions[1].distance, 532);
        assert_eq!(result.instructions[1].text, "530미터 후 좌회전하세요");
        assert_eq!(result.instructions[2].kind, InstructionType::Arrive);

        assert_eq!(result.waypoints[0].name.as_deref(), Some("세종대로"));
        assert_eq!(result.waypoints[1].name, None);
        assert_eq!(result.instructions[0].location, result.waypoints[0]);
    }

    #[test]
    fn test_translate_empty_route() {
        let route = RawRoute {
            distance: f64::NAN,
            duration: -1.0,
            steps: vec![],
        };
        let result = translate(&route);
        assert_eq!(result.distance, 0);
        assert_eq!(result.duration, 0);
        assert!(result.instructions.is_empty());
    }
}
