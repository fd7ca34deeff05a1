//! Glyphs for the UI. Most come from a Nerd Font patched set
//! (https://www.nerdfonts.com); a plain font will show boxes for those.

#[derive(Debug, Clone, Copy)]
pub struct Icons {
    // transport
    pub play: &'static str,
    pub pause: &'static str,
    pub next: &'static str,
    pub prev: &'static str,

    // volume, by level
    pub vol_mute: &'static str,
    pub vol_low: &'static str,
    pub vol_high: &'static str,

    pub repeat_all: &'static str,
    pub repeat_one: &'static str,
    pub shuffle: &'static str,

    // screens
    pub clock: &'static str,
    pub magnifier: &'static str,
    pub stack: &'static str,
    pub gear: &'static str,
    pub question: &'static str,

    // status
    pub check: &'static str,
    pub cross: &'static str,
    pub hourglass: &'static str,
    pub info: &'static str,

    pub note: &'static str,
    pub gauge: &'static str,
    pub script: &'static str,
    pub disk: &'static str,

    pub caret: &'static str,
    pub dot: &'static str,

    // progress bar pieces (plain unicode, no font dependency)
    pub bar_fill: &'static str,
    pub bar_rest: &'static str,
    pub bar_knob: &'static str,
}

pub const NERD: Icons = Icons {
    play: "\u{f04b}",
    pause: "\u{f04c}",
    next: "\u{f051}",
    prev: "\u{f048}",

    vol_mute: "\u{f026}",
    vol_low: "\u{f027}",
    vol_high: "\u{f028}",

    repeat_all: "\u{f456}",
    repeat_one: "\u{f458}",
    shuffle: "\u{f49d}",

    clock: "\u{f1da}",
    magnifier: "\u{f002}",
    stack: "\u{f03a}",
    gear: "\u{f013}",
    question: "\u{f059}",

    check: "\u{f00c}",
    cross: "\u{f00d}",
    hourglass: "\u{f110}",
    info: "\u{f05a}",

    note: "\u{f001}",
    gauge: "\u{f0e4}",
    script: "\u{f15c}",
    disk: "\u{f1c0}",

    caret: "\u{f054}",
    dot: "•",

    bar_fill: "━",
    bar_rest: "─",
    bar_knob: "●",
};

impl Default for Icons {
    fn default() -> Self {
        NERD
    }
}
