// crates/aiva-core/src/helpers/time.rs
//
// Canonical timeline units and the frame grid.
//
// Every position on the timeline is an integer in canonical units
// (100 units = 1 second). Pointer-driven edits and keyboard frame steps
// snap to a 4-unit frame quantum, which is the 25 fps editing grid.

/// Canonical units per second of timeline time.
pub const UNITS_PER_SECOND: i64 = 100;

/// Canonical units per frame at the 25 fps editing grid.
pub const UNITS_PER_FRAME: i64 = 4;

/// Editing grid frame rate implied by `UNITS_PER_FRAME`.
pub const GRID_FPS: i64 = UNITS_PER_SECOND / UNITS_PER_FRAME;

/// Lower bound for the derived timeline duration (60 s).
pub const MIN_DURATION_UNITS: i64 = 60 * UNITS_PER_SECOND;

/// Convert seconds to canonical units, rounding to the nearest unit.
///
/// Used for backend detection results (`round(timeSeconds * 100)`) and for
/// surface-driven playhead updates.
///
/// ```
/// use aiva_core::helpers::time::seconds_to_units;
/// assert_eq!(seconds_to_units(1.234), 123);
/// assert_eq!(seconds_to_units(2.5),   250);
/// ```
pub fn seconds_to_units(secs: f64) -> i64 {
    (secs * UNITS_PER_SECOND as f64).round() as i64
}

pub fn units_to_seconds(units: i64) -> f64 {
    units as f64 / UNITS_PER_SECOND as f64
}

/// Floor `x` onto the frame grid: `floor(x / 4) * 4`.
///
/// ```
/// use aiva_core::helpers::time::snap_to_frame;
/// assert_eq!(snap_to_frame(402), 400);
/// assert_eq!(snap_to_frame(400), 400);
/// assert_eq!(snap_to_frame(-3),  -4);
/// ```
pub fn snap_to_frame(x: i64) -> i64 {
    x.div_euclid(UNITS_PER_FRAME) * UNITS_PER_FRAME
}

/// One frame step backwards from `pos`.
///
/// An off-grid position first rounds down onto the grid, and that rounding
/// counts as the step. An on-grid position moves one full frame back.
/// Never goes below zero.
pub fn step_back(pos: i64) -> i64 {
    let snapped = snap_to_frame(pos);
    let next = if snapped < pos { snapped } else { snapped.saturating_sub(UNITS_PER_FRAME) };
    next.max(0)
}

/// One frame step forwards from `pos`, landing on the next grid boundary.
pub fn step_forward(pos: i64) -> i64 {
    snap_to_frame(pos).saturating_add(UNITS_PER_FRAME).max(0)
}

/// Format a position in canonical units as `MM:SS:FF` (frames at the 25 fps grid).
///
/// Used for playhead and status readouts where frame precision matters.
///
/// ```
/// use aiva_core::helpers::time::format_time;
/// assert_eq!(format_time(0),      "00:00:00");
/// assert_eq!(format_time(6150),   "01:01:12");
/// assert_eq!(format_time(359_900), "59:59:00");
/// ```
pub fn format_time(units: i64) -> String {
    let units = units.max(0);
    let total_secs = units / UNITS_PER_SECOND;
    let m  = total_secs / 60;
    let sc = total_secs % 60;
    let fr = (units % UNITS_PER_SECOND) / UNITS_PER_FRAME;
    format!("{m:02}:{sc:02}:{fr:02}")
}

/// Format a duration in canonical units as a compact human-readable string.
///
/// | Range         | Format       | Example   |
/// |---------------|--------------|-----------|
/// | ≥ 3600 s      | `H:MM:SS`    | `1:04:35` |
/// | ≥ 60 s        | `M:SS`       | `3:07`    |
/// | < 60 s        | `S.Xs`       | `4.2s`    |
///
/// ```
/// use aiva_core::helpers::time::format_duration;
/// assert_eq!(format_duration(420),     "4.2s");
/// assert_eq!(format_duration(18_700),  "3:07");
/// assert_eq!(format_duration(387_500), "1:04:35");
/// ```
pub fn format_duration(units: i64) -> String {
    let secs = units_to_seconds(units.max(0));
    let whole = secs as u64;
    if secs >= 3600.0 {
        format!("{}:{:02}:{:02}", whole / 3600, (whole % 3600) / 60, whole % 60)
    } else if secs >= 60.0 {
        format!("{}:{:02}", whole / 60, whole % 60)
    } else {
        format!("{secs:.1}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_back_rounds_down_before_stepping() {
        let first = step_back(402);
        assert_eq!(first, 400);
        assert_eq!(step_back(first), 396);
    }

    #[test]
    fn step_back_clamps_at_zero() {
        assert_eq!(step_back(0), 0);
        assert_eq!(step_back(2), 0);
        assert_eq!(step_back(4), 0);
    }

    #[test]
    fn step_forward_lands_on_next_boundary() {
        assert_eq!(step_forward(402), 404);
        assert_eq!(step_forward(400), 404);
        assert_eq!(step_forward(0), 4);
    }

    #[test]
    fn steps_saturate_at_the_extremes() {
        assert_eq!(step_forward(i64::MAX), i64::MAX);
        assert_eq!(step_back(i64::MIN), 0);
    }

    #[test]
    fn grid_is_25_fps() {
        assert_eq!(GRID_FPS, 25);
    }
}
