pub mod icons;
pub mod palette;

pub use icons::Icons;
pub use palette::Palette;

use ratatui::symbols::border;

/// Colors and glyphs resolved once per frame and threaded through the
/// widget tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    /// Look a theme up by its config name. Unknown names get the
    /// grayscale default rather than an error.
    pub fn named(name: &str) -> Self {
        let palette = match name {
            "mono" | "" => palette::MONO,
            other => {
                tracing::debug!("unknown theme {other:?}, using mono");
                palette::MONO
            }
        };
        Self {
            palette,
            icons: Icons::default(),
        }
    }

    pub fn borders(&self) -> border::Set<'static> {
        border::ROUNDED
    }
}
