use crate::theme::Theme;
use crate::weather::{Background, WeatherKind};

pub const INDEX_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/index.html"
));
pub const APP_JS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/src/web/assets/app.js"
));

fn palette(background: &Background) -> (&'static str, &'static str) {
    match (background.kind, background.theme) {
        (WeatherKind::Sunny, Theme::Light) => ("#fde68a", "#93c5fd"),
        (WeatherKind::Sunny, Theme::Dark) => ("#1e3a8a", "#0f172a"),
        (WeatherKind::Cloudy, Theme::Light) => ("#e5e7eb", "#9ca3af"),
        (WeatherKind::Cloudy, Theme::Dark) => ("#4b5563", "#111827"),
        (WeatherKind::Rainy, Theme::Light) => ("#bfdbfe", "#64748b"),
        (WeatherKind::Rainy, Theme::Dark) => ("#334155", "#0f172a"),
        (WeatherKind::Snowy, Theme::Light) => ("#f8fafc", "#cbd5e1"),
        (WeatherKind::Snowy, Theme::Dark) => ("#64748b", "#1e293b"),
        (WeatherKind::Stormy, Theme::Light) => ("#a5b4fc", "#475569"),
        (WeatherKind::Stormy, Theme::Dark) => ("#312e81", "#020617"),
    }
}

/// Vertical gradient standing in for a photographic backdrop.
pub fn background_svg(background: &Background) -> String {
    let (top, bottom) = palette(background);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400" viewBox="0 0 600 400">"#,
            r#"<title>{name}</title>"#,
            r#"<defs><linearGradient id="sky" x1="0" y1="0" x2="0" y2="1">"#,
            r#"<stop offset="0" stop-color="{top}"/><stop offset="1" stop-color="{bottom}"/>"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="600" height="400" fill="url(#sky)"/></svg>"#
        ),
        name = background.name(),
        top = top,
        bottom = bottom,
    )
}
