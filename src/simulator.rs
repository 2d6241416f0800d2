//! The day cycle state machine.
//!
//! `DayCycle` owns the clock and weather state. `tick` is handed the current
//! local time and a random source; it rebuilds every derived value from that
//! timestamp and refreshes the weather at the top of each hour.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;
use tracing::{info, trace};

use crate::day::{self, DayProgress};
use crate::theme::Theme;
use crate::weather::{Background, WeatherIcon, WeatherKind, WeatherState};

#[derive(Clone, Debug)]
pub struct DayCycle {
    now: NaiveDateTime,
    weather: WeatherState,
    theme: Theme,
}

impl DayCycle {
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_weather(now, WeatherState::default())
    }

    pub fn with_weather(now: NaiveDateTime, weather: WeatherState) -> Self {
        Self {
            now,
            weather,
            theme: Theme::default(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn weather(&self) -> WeatherState {
        self.weather
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, now: NaiveDateTime, rng: &mut R) -> Frame {
        self.now = now;
        let weather_refreshed = day::is_weather_refresh_due(&now);
        if weather_refreshed {
            self.refresh_weather(rng);
        }
        let frame = self.build_frame(weather_refreshed);
        trace!(
            now = %frame.now,
            seconds_elapsed = frame.seconds_elapsed,
            is_daytime = frame.is_daytime,
            "tick"
        );
        frame
    }

    pub fn refresh_weather<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let previous = self.weather;
        self.weather = WeatherState::random(rng);
        info!(
            from = %previous.kind,
            to = %self.weather.kind,
            temperature_c = self.weather.temperature_c,
            "weather refreshed"
        );
    }

    /// Frame for the current state without advancing the clock.
    pub fn frame(&self) -> Frame {
        self.build_frame(false)
    }

    fn build_frame(&self, weather_refreshed: bool) -> Frame {
        let progress = DayProgress::at(&self.now);
        let is_daytime = day::is_daytime(&self.now);
        Frame {
            now: self.now,
            seconds_elapsed: progress.seconds_elapsed,
            seconds_remaining: progress.seconds_remaining,
            percent_remaining: progress.percent_remaining,
            percent_elapsed: progress.percent_elapsed(),
            is_daytime,
            weather: self.weather.kind,
            temperature_c: self.weather.temperature_c,
            icon: self.weather.kind.icon(is_daytime),
            theme: self.theme,
            background: self.weather.kind.background(self.theme),
            weather_refreshed,
        }
    }
}

/// Everything the presentation layer needs for one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub now: NaiveDateTime,
    pub seconds_elapsed: u32,
    pub seconds_remaining: u32,
    pub percent_remaining: f64,
    pub percent_elapsed: f64,
    pub is_daytime: bool,
    pub weather: WeatherKind,
    pub temperature_c: i32,
    pub icon: WeatherIcon,
    pub theme: Theme,
    pub background: Background,
    pub weather_refreshed: bool,
}
