//! Text rendering of clock faces and info panels.

use std::fmt;

use crate::{
    country,
    model::{Location, TimeFormat},
    poller::WeatherPanel,
    timesync::{ClockState, HandAngles, offset_annotation},
};

pub const RIM: char = '·';
pub const HOUR_MARK: char = '+';
pub const HOUR_HAND: char = '#';
pub const MINUTE_HAND: char = '*';
pub const SECOND_HAND: char = '.';
const CENTER: char = 'o';

/// Radius in rows. Columns are doubled to compensate for tall terminal cells.
const RADIUS: f64 = 5.0;
const HOUR_LEN: f64 = 0.57 * RADIUS;
const MINUTE_LEN: f64 = 0.79 * RADIUS;
const SECOND_LEN: f64 = 0.86 * RADIUS;

/// The static part of a clock: rim and hour marks, rasterised once.
#[derive(Debug, Clone)]
pub struct ClockFace {
    grid: Vec<Vec<char>>,
}

impl Default for ClockFace {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockFace {
    pub const WIDTH: usize = 4 * RADIUS as usize + 3;
    pub const HEIGHT: usize = 2 * RADIUS as usize + 1;

    pub fn new() -> Self {
        let mut face = Self { grid: vec![vec![' '; Self::WIDTH]; Self::HEIGHT] };

        for step in 0..120 {
            face.plot(f64::from(step) * 3.0, RADIUS, RIM);
        }
        for hour in 0..12 {
            face.plot(f64::from(hour) * 30.0, RADIUS, HOUR_MARK);
        }
        face
    }

    /// Face plus hands, one string per row.
    pub fn draw(&self, hands: &HandAngles) -> Vec<String> {
        let mut frame = self.clone();
        frame.hand(hands.hour, HOUR_LEN, HOUR_HAND);
        frame.hand(hands.minute, MINUTE_LEN, MINUTE_HAND);
        frame.hand(hands.second, SECOND_LEN, SECOND_HAND);
        frame.set(Self::WIDTH / 2, Self::HEIGHT / 2, CENTER);
        frame.grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    fn hand(&mut self, angle: f64, length: f64, mark: char) {
        let mut r = 0.5;
        while r <= length {
            self.plot(angle, r, mark);
            r += 0.25;
        }
    }

    fn plot(&mut self, angle_deg: f64, r: f64, mark: char) {
        let theta = angle_deg.to_radians();
        let x = (Self::WIDTH / 2) as f64 + 2.0 * r * theta.sin();
        let y = (Self::HEIGHT / 2) as f64 - r * theta.cos();
        if x >= 0.0 && y >= 0.0 {
            self.set(x.round() as usize, y.round() as usize, mark);
        }
    }

    fn set(&mut self, x: usize, y: usize, mark: char) {
        if let Some(cell) = self.grid.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = mark;
        }
    }
}

/// Everything shown for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub clock: Vec<String>,
    pub info: Vec<String>,
    pub weather: Vec<String>,
}

impl Panel {
    /// Clock, info and weather columns laid side by side.
    pub fn rows(&self) -> Vec<String> {
        const INFO_WIDTH: usize = 44;
        let height = self.clock.len().max(self.info.len()).max(self.weather.len());

        (0..height)
            .map(|i| {
                let clock = self.clock.get(i).map_or("", String::as_str);
                let info = self.info.get(i).map_or("", String::as_str);
                let weather = self.weather.get(i).map_or("", String::as_str);
                let line = format!(
                    "{}{}  {}{}  {weather}",
                    clock,
                    " ".repeat(ClockFace::WIDTH.saturating_sub(clock.chars().count())),
                    info,
                    " ".repeat(INFO_WIDTH.saturating_sub(info.chars().count())),
                );
                line.trim_end().to_string()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub panels: Vec<Panel>,
    pub notices: Vec<String>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.panels.is_empty() {
            writeln!(f, "No locations yet. Add one with `add <city>`.")?;
        }
        for panel in &self.panels {
            for row in panel.rows() {
                writeln!(f, "{row}")?;
            }
            writeln!(f)?;
        }
        for notice in &self.notices {
            writeln!(f, "! {notice}")?;
        }
        Ok(())
    }
}

/// Composes frames from clock state and cached weather.
#[derive(Debug, Clone, Default)]
pub struct RenderSurface {
    face: ClockFace,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self, state: &ClockState) -> Vec<String> {
        let mut rows = self.face.draw(&state.hands);
        rows.push(format!("{:^width$}", state.label, width = ClockFace::WIDTH));
        rows
    }

    /// Info column for the location at some position; `previous` is the
    /// entry right before it in store order, if any.
    pub fn info(
        &self,
        location: &Location,
        state: &ClockState,
        previous: Option<(&Location, &ClockState)>,
        format: TimeFormat,
    ) -> Vec<String> {
        let name = country::country_name(&location.country_code).unwrap_or("");
        let flag = country::flag_emoji(&location.country_code)
            .map(|f| format!(" {f}"))
            .unwrap_or_default();

        let mut lines = vec![
            format!("{} ({}, {name}){flag}", location.city, location.timezone_region()),
            format.format(&state.local_time),
        ];

        if let Some((prev_location, prev_state)) = previous {
            let diff = offset_annotation(
                &prev_location.city,
                prev_state.utc_offset_secs,
                state.utc_offset_secs,
            );
            lines.push(format!("Δ {diff}"));
        }
        lines
    }

    pub fn frame<'a>(
        &self,
        rows: impl IntoIterator<Item = (&'a Location, &'a ClockState, &'a WeatherPanel)>,
        format: TimeFormat,
        notices: Vec<String>,
    ) -> Frame {
        let mut panels = Vec::new();
        let mut previous: Option<(&Location, &ClockState)> = None;

        for (location, state, weather) in rows {
            panels.push(Panel {
                clock: self.clock(state),
                info: self.info(location, state, previous, format),
                weather: weather.lines(),
            });
            previous = Some((location, state));
        }

        Frame { panels, notices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocationStore;
    use chrono::{TimeZone, Utc};

    fn location(city: &str, timezone: chrono_tz::Tz, cc: &str) -> Location {
        Location {
            city: city.into(),
            timezone,
            latitude: 0.0,
            longitude: 0.0,
            country_code: cc.into(),
        }
    }

    fn count(rows: &[String], mark: char) -> usize {
        rows.iter().map(|r| r.chars().filter(|c| *c == mark).count()).sum()
    }

    #[test]
    fn face_has_twelve_hour_marks() {
        let face = ClockFace::new();
        let rows = face.draw(&HandAngles { hour: 0.0, minute: 0.0, second: 0.0 });
        assert_eq!(rows.len(), ClockFace::HEIGHT);
        assert!(rows.iter().all(|r| r.chars().count() == ClockFace::WIDTH));
        // Hands stop short of the rim, so every mark stays visible.
        assert_eq!(count(&rows, HOUR_MARK), 12);
    }

    #[test]
    fn hands_point_where_expected() {
        let face = ClockFace::new();
        let mid_x = ClockFace::WIDTH / 2;
        let mid_y = ClockFace::HEIGHT / 2;

        // 3:00:30, hour hand right, minute hand up, second hand down.
        let rows = face.draw(&HandAngles { hour: 90.0, minute: 0.0, second: 180.0 });
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();

        assert_eq!(grid[mid_y][mid_x + 2], HOUR_HAND);
        assert_eq!(grid[mid_y - 2][mid_x], MINUTE_HAND);
        assert_eq!(grid[mid_y + 2][mid_x], SECOND_HAND);
        assert_eq!(grid[mid_y][mid_x - 2], ' ');
    }

    #[test]
    fn drawing_does_not_mutate_the_static_face() {
        let face = ClockFace::new();
        let before = face.draw(&HandAngles { hour: 0.0, minute: 0.0, second: 0.0 });
        face.draw(&HandAngles { hour: 120.0, minute: 240.0, second: 300.0 });
        let after = face.draw(&HandAngles { hour: 0.0, minute: 0.0, second: 0.0 });
        assert_eq!(before, after);
    }

    #[test]
    fn frame_annotates_all_but_first_location() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let store = LocationStore::from_locations([
            location("Cairo", chrono_tz::Africa::Cairo, "eg"),
            location("Mumbai", chrono_tz::Asia::Kolkata, "in"),
            location("London", chrono_tz::Europe::London, "gb"),
        ]);
        let clocks = crate::timesync::sync(store.entries(), now);
        let pending = WeatherPanel::Pending;

        let surface = RenderSurface::new();
        let frame = surface.frame(
            store.locations().zip(&clocks).map(|(l, c)| (l, c, &pending)),
            TimeFormat::TwentyFourHour,
            Vec::new(),
        );

        assert_eq!(frame.panels.len(), 3);
        assert_eq!(frame.panels[0].info.len(), 2);
        assert_eq!(frame.panels[1].info[2], "Δ 3h 30m ahead of Cairo");
        assert_eq!(frame.panels[2].info[2], "Δ 5h 30m behind Mumbai");
        assert!(frame.panels[1].info[0].starts_with("Mumbai (Asia, India)"));
        assert_eq!(frame.panels[2].info[1], "2024-01-15 12:00");
    }

    #[test]
    fn panel_rows_align_columns() {
        let panel = Panel {
            clock: vec!["abc".into()],
            info: vec!["info".into(), "second".into()],
            weather: vec!["sunny".into()],
        };
        let rows = panel.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("abc"));
        assert!(rows[0].ends_with("sunny"));
        assert_eq!(rows[0].find("info"), Some(ClockFace::WIDTH + 2));
    }

    #[test]
    fn empty_frame_hints_at_add() {
        let text = Frame::default().to_string();
        assert!(text.contains("No locations yet"));
    }
}
