use ratatui::style::Color;

/// Colors used across every widget. The default scheme is grayscale so
/// the UI works on any terminal without fighting user color schemes.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Terminal background.
    pub bg: Color,
    /// Raised rows (selection bars, hovered entries).
    pub raised: Color,
    /// Primary text.
    pub text: Color,
    /// De-emphasized text: hints, timestamps, inactive lyrics.
    pub dim: Color,
    /// Focus and highlight color.
    pub accent: Color,
    /// Secondary highlight, between text and dim.
    pub soft: Color,
    /// Pane borders.
    pub border: Color,
    /// The entry currently playing.
    pub active: Color,
    /// Failure notices. Mono keeps these white; the icon carries the meaning.
    pub alert: Color,
}

pub const MONO: Palette = Palette {
    bg: Color::Rgb(0, 0, 0),
    raised: Color::Rgb(48, 48, 48),
    text: Color::Rgb(255, 255, 255),
    dim: Color::Rgb(136, 136, 136),
    accent: Color::Rgb(255, 255, 255),
    soft: Color::Rgb(200, 200, 200),
    border: Color::Rgb(64, 64, 64),
    active: Color::Rgb(255, 255, 255),
    alert: Color::Rgb(255, 255, 255),
};

impl Default for Palette {
    fn default() -> Self {
        MONO
    }
}
