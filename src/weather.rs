//! Simulated weather. Stands in for a real weather source; nothing here
//! fetches data.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::theme::Theme;

pub const TEMPERATURE_RANGE_C: RangeInclusive<i32> = 10..=40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 5] = [
        WeatherKind::Sunny,
        WeatherKind::Cloudy,
        WeatherKind::Rainy,
        WeatherKind::Snowy,
        WeatherKind::Stormy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherKind::Sunny => "sunny",
            WeatherKind::Cloudy => "cloudy",
            WeatherKind::Rainy => "rainy",
            WeatherKind::Snowy => "snowy",
            WeatherKind::Stormy => "stormy",
        }
    }

    /// Sunny skies show the moon at night; every other kind ignores daylight.
    pub fn icon(self, is_daytime: bool) -> WeatherIcon {
        match self {
            WeatherKind::Sunny if is_daytime => WeatherIcon::Sun,
            WeatherKind::Sunny => WeatherIcon::Moon,
            WeatherKind::Cloudy => WeatherIcon::Cloud,
            WeatherKind::Rainy => WeatherIcon::CloudRain,
            WeatherKind::Snowy => WeatherIcon::CloudSnow,
            WeatherKind::Stormy => WeatherIcon::CloudLightning,
        }
    }

    pub fn background(self, theme: Theme) -> Background {
        Background { kind: self, theme }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    Sun,
    Moon,
    Cloud,
    CloudRain,
    CloudSnow,
    CloudLightning,
}

impl WeatherIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::Moon => "☾",
            WeatherIcon::Cloud => "☁",
            WeatherIcon::CloudRain => "🌧",
            WeatherIcon::CloudSnow => "🌨",
            WeatherIcon::CloudLightning => "🌩",
        }
    }
}

/// Background asset variant for a weather kind under a theme, named
/// `<kind>-<theme>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Background {
    pub kind: WeatherKind,
    pub theme: Theme,
}

impl Background {
    pub fn name(&self) -> String {
        format!("{}-{}", self.kind, self.theme)
    }

    pub fn parse(name: &str) -> Option<Self> {
        let (kind, theme) = name.rsplit_once('-')?;
        let kind = WeatherKind::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == kind)?;
        let theme = match theme {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => return None,
        };
        Some(Self { kind, theme })
    }
}

impl Serialize for Background {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    pub temperature_c: i32,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            kind: WeatherKind::Sunny,
            temperature_c: 20,
        }
    }
}

impl WeatherState {
    /// Draws kind and temperature independently and uniformly. The previous
    /// state has no influence, so the same kind may come up again.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = WeatherKind::ALL[rng.gen_range(0..WeatherKind::ALL.len())];
        let temperature_c = rng.gen_range(TEMPERATURE_RANGE_C);
        Self {
            kind,
            temperature_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sunny_icon_follows_daylight() {
        assert_eq!(WeatherKind::Sunny.icon(true), WeatherIcon::Sun);
        assert_eq!(WeatherKind::Sunny.icon(false), WeatherIcon::Moon);
    }

    #[test]
    fn other_icons_ignore_daylight() {
        for kind in WeatherKind::ALL.into_iter().skip(1) {
            assert_eq!(kind.icon(true), kind.icon(false), "{kind}");
        }
        assert_eq!(WeatherKind::Stormy.icon(false), WeatherIcon::CloudLightning);
    }

    #[test]
    fn background_names_round_trip() {
        let background = WeatherKind::Stormy.background(Theme::Dark);
        assert_eq!(background.name(), "stormy-dark");
        assert_eq!(Background::parse("stormy-dark"), Some(background));
        assert_eq!(Background::parse("stormy-sepia"), None);
        assert_eq!(Background::parse("foggy-light"), None);
        assert_eq!(Background::parse("sunny"), None);
    }

    #[test]
    fn zero_source_draws_lowest_outcomes() {
        let mut rng = StepRng::new(0, 0);
        let weather = WeatherState::random(&mut rng);
        assert_eq!(weather.kind, WeatherKind::Sunny);
        assert_eq!(weather.temperature_c, 10);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let weather = WeatherState::random(&mut rng);
            assert!(TEMPERATURE_RANGE_C.contains(&weather.temperature_c));
            assert!(WeatherKind::ALL.contains(&weather.kind));
        }
    }

    #[test]
    fn draws_are_uniform() {
        const DRAWS: usize = 155_000;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut kinds = [0usize; 5];
        let mut temperatures = [0usize; 31];
        for _ in 0..DRAWS {
            let weather = WeatherState::random(&mut rng);
            let kind_index = WeatherKind::ALL
                .iter()
                .position(|kind| *kind == weather.kind)
                .unwrap();
            kinds[kind_index] += 1;
            temperatures[(weather.temperature_c - 10) as usize] += 1;
        }

        for (index, count) in kinds.iter().enumerate() {
            let frequency = *count as f64 / DRAWS as f64;
            assert!(
                (frequency - 0.2).abs() < 0.01,
                "kind {:?} frequency {frequency}",
                WeatherKind::ALL[index]
            );
        }
        for (offset, count) in temperatures.iter().enumerate() {
            let frequency = *count as f64 / DRAWS as f64;
            assert!(
                (frequency - 1.0 / 31.0).abs() < 0.005,
                "temperature {} frequency {frequency}",
                offset + 10
            );
        }
    }
}
