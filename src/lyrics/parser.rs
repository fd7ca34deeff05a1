//! LRC format parser and playback synchronizer
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! A physical line may carry several timestamps:
//! [00:05.00][01:10.00] Repeated chorus line
//!
//! Metadata tags like [ti:Title], [ar:Artist] or [offset:500] are
//! stripped from the text and never produce lines.

/// A single line of lyrics with its start time
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from the start of the track
    pub time: f64,
    /// The lyrics text (may be empty)
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: String) -> Self {
        Self { time, text }
    }
}

/// Parsed lyrics with metadata
#[derive(Debug, Clone)]
pub struct ParsedLyrics {
    /// Individual lyrics lines, ascending by time
    pub lines: Vec<LyricLine>,
    /// Whether the lyrics are synchronized
    pub synced: bool,
}

impl ParsedLyrics {
    /// Parse LRC formatted lyrics.
    ///
    /// In synced mode, lines without a timestamp are dropped. In plain
    /// mode every non-empty line becomes an entry at time 0. Malformed
    /// tags never fail the parse; they simply contribute nothing.
    pub fn parse(content: &str, synced: bool) -> Self {
        let mut lines = Vec::new();

        for raw in content.lines() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let (timestamps, text) = split_tags(raw);

            if synced {
                // One entry per timestamp, all sharing the line's text.
                for ts in timestamps {
                    lines.push(LyricLine::new(ts, text.clone()));
                }
            } else if !text.is_empty() {
                lines.push(LyricLine::new(0.0, text));
            }
        }

        // Stable sort: equal timestamps keep their encounter order.
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));

        Self { lines, synced }
    }

    /// Index of the line active at `position_secs`, if any.
    ///
    /// Scans from the end: playback time is non-decreasing in the common
    /// case and the most recent qualifying line is wanted. With several
    /// lines at the same timestamp the last one wins.
    pub fn active_line_at(&self, position_secs: f64) -> Option<usize> {
        self.lines.iter().rposition(|l| l.time <= position_secs)
    }

    /// Contiguous slice of lines within `radius` of `active`, clipped to
    /// bounds, plus the global index of its first element.
    pub fn window(&self, active: usize, radius: usize) -> (usize, &[LyricLine]) {
        let end = (active.saturating_add(radius + 1)).min(self.lines.len());
        let start = active.saturating_sub(radius).min(end);
        (start, &self.lines[start..end])
    }

    /// New lyrics with every time shifted by `offset_ms` milliseconds,
    /// clamped at zero. The input is left unmodified.
    pub fn with_offset(&self, offset_ms: i64) -> Self {
        let shift = offset_ms as f64 / 1000.0;
        let lines = self
            .lines
            .iter()
            .map(|l| LyricLine::new((l.time + shift).max(0.0), l.text.clone()))
            .collect();
        Self {
            lines,
            synced: self.synced,
        }
    }

    /// Re-encode as LRC text, one `[mm:ss.xx]` line per entry (plain
    /// lyrics come back as bare text). Used for the on-disk lyrics cache.
    pub fn to_lrc(&self) -> String {
        self.lines
            .iter()
            .map(|l| {
                if self.synced {
                    let centis = (l.time * 100.0).round() as u64;
                    let min = centis / 6000;
                    let sec = (centis % 6000) / 100;
                    let frac = centis % 100;
                    format!("[{min:02}:{sec:02}.{frac:02}]{}", l.text)
                } else {
                    l.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Whether the text contains at least one well-formed LRC timestamp.
///
/// Used to decide between synced and plain rendering. Pure function of
/// its input; repeated calls on the same text are independent.
pub fn is_synced(content: &str) -> bool {
    content.lines().any(|line| !split_tags(line).0.is_empty())
}

/// Split a physical line into its timestamps and remaining text.
///
/// Every bracketed group that parses as a timestamp is collected;
/// metadata tags are dropped; anything else (including unterminated
/// brackets) stays in the text verbatim.
fn split_tags(line: &str) -> (Vec<f64>, String) {
    let mut timestamps = Vec::new();
    let mut text = String::new();
    let mut rest = line;

    while let Some(start) = rest.find('[') {
        let (before, tagged) = rest.split_at(start);
        text.push_str(before);

        let Some(end) = tagged.find(']') else {
            text.push_str(tagged);
            rest = "";
            break;
        };

        let body = &tagged[1..end];
        if let Some(ts) = parse_timestamp(body) {
            timestamps.push(ts);
        } else if !is_metadata_tag(body) {
            text.push_str(&tagged[..=end]);
        }
        rest = &tagged[end + 1..];
    }
    text.push_str(rest);

    (timestamps, text.trim().to_string())
}

/// Metadata tags have an alphabetic name before the colon ([ti:...],
/// [offset:500]). Timestamps start with digits, so they never match.
fn is_metadata_tag(body: &str) -> bool {
    match body.split_once(':') {
        Some((tag, _)) => !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Parse a timestamp body like "1:23", "01:23" or "01:23.45" to seconds.
fn parse_timestamp(s: &str) -> Option<f64> {
    let (min, sec) = s.split_once(':')?;

    if min.is_empty() || min.len() > 2 || !min.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (whole, frac) = match sec.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (sec, None),
    };
    if whole.len() != 2 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(f) = frac
        && (f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let minutes: f64 = min.parse().ok()?;
    let seconds: f64 = sec.parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:12"), Some(12.0));
        assert_eq!(parse_timestamp("01:30"), Some(90.0));
        assert_eq!(parse_timestamp("00:12.34"), Some(12.34));
        assert_eq!(parse_timestamp("1:02.5"), Some(62.5));
        assert_eq!(parse_timestamp("ti:Title"), None);
        assert_eq!(parse_timestamp("123:00"), None);
        assert_eq!(parse_timestamp("00:1"), None);
        assert_eq!(parse_timestamp("00:12."), None);
    }

    #[test]
    fn test_empty_and_plain_input_produce_nothing_in_synced_mode() {
        assert!(ParsedLyrics::parse("", true).lines.is_empty());
        assert!(
            ParsedLyrics::parse("plain line with no tags", true)
                .lines
                .is_empty()
        );
    }

    #[test]
    fn test_parse_basic() {
        let parsed = ParsedLyrics::parse("[00:01.00]Hello\n[00:02.50]World", true);
        assert_eq!(
            parsed.lines,
            vec![
                LyricLine::new(1.0, "Hello".into()),
                LyricLine::new(2.5, "World".into()),
            ]
        );
    }

    #[test]
    fn test_multiple_timestamps_share_text_and_sort() {
        let parsed = ParsedLyrics::parse("[00:05.00][00:03.00]Same text", true);
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].time, 3.0);
        assert_eq!(parsed.lines[1].time, 5.0);
        assert!(parsed.lines.iter().all(|l| l.text == "Same text"));
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let parsed = ParsedLyrics::parse("[00:10.00]Second\n[00:02.00]First", true);
        assert_eq!(parsed.lines[0].text, "First");
        assert_eq!(parsed.lines[1].text, "Second");
    }

    #[test]
    fn test_metadata_tags_are_stripped() {
        let lrc = "[ti:Song Name]\n[ar:Someone]\n[offset:500]\n[00:12.34]First line";
        let parsed = ParsedLyrics::parse(lrc, true);
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.lines[0].text, "First line");
        assert!(!parsed.lines.iter().any(|l| l.text.contains("Song Name")));
    }

    #[test]
    fn test_timestamp_with_empty_text() {
        let parsed = ParsedLyrics::parse("[00:30.00]", true);
        assert_eq!(parsed.lines, vec![LyricLine::new(30.0, String::new())]);
    }

    #[test]
    fn test_plain_mode_keeps_untimed_lines() {
        let parsed = ParsedLyrics::parse("first\n\nsecond", false);
        assert_eq!(parsed.lines.len(), 2);
        assert!(parsed.lines.iter().all(|l| l.time == 0.0));
        assert!(!parsed.synced);
    }

    #[test]
    fn test_active_line_boundaries() {
        let parsed = ParsedLyrics::parse("[00:01.00]a\n[00:02.00]b\n[00:03.00]c", true);
        assert_eq!(parsed.active_line_at(0.5), None);
        assert_eq!(parsed.active_line_at(1.0), Some(0));
        assert_eq!(parsed.active_line_at(2.7), Some(1));
        assert_eq!(parsed.active_line_at(99.0), Some(2));

        let empty = ParsedLyrics::parse("", true);
        assert_eq!(empty.active_line_at(10.0), None);
    }

    #[test]
    fn test_active_line_duplicate_timestamps_returns_last() {
        let parsed = ParsedLyrics::parse("[00:01.00]a\n[00:01.00]b", true);
        assert_eq!(parsed.active_line_at(1.0), Some(1));
        // Stable sort kept encounter order.
        assert_eq!(parsed.lines[1].text, "b");
    }

    #[test]
    fn test_window_clips_to_bounds() {
        let parsed =
            ParsedLyrics::parse("[00:01.00]a\n[00:02.00]b\n[00:03.00]c\n[00:04.00]d", true);

        let (start, slice) = parsed.window(0, 1);
        assert_eq!(start, 0);
        assert_eq!(slice.len(), 2);

        let (start, slice) = parsed.window(2, 1);
        assert_eq!(start, 1);
        assert_eq!(slice.len(), 3);

        let (start, slice) = parsed.window(3, 2);
        assert_eq!(start, 1);
        assert_eq!(slice.len(), 3);
    }

    #[test]
    fn test_offset_clamps_at_zero() {
        let parsed = ParsedLyrics::parse("[00:02.00]early\n[00:10.00]late", true);
        let shifted = parsed.with_offset(-5000);
        assert_eq!(shifted.lines[0].time, 0.0);
        assert_eq!(shifted.lines[1].time, 5.0);
        // Original untouched.
        assert_eq!(parsed.lines[0].time, 2.0);
    }

    #[test]
    fn test_is_synced_detection() {
        assert!(is_synced("[00:12.34]Hello"));
        assert!(is_synced("intro\n[01:00.00]verse"));
        assert!(!is_synced("just some words"));
        assert!(!is_synced("[ti:Title]\nno timestamps here"));
        // Repeated calls see the same answer.
        let text = "[00:01.00]a";
        assert!(is_synced(text));
        assert!(is_synced(text));
    }

    #[test]
    fn test_to_lrc_round_trip() {
        let parsed = ParsedLyrics::parse("[00:01.50]Hello\n[01:02.00]World", true);
        let encoded = parsed.to_lrc();
        assert_eq!(encoded, "[00:01.50]Hello\n[01:02.00]World");
        let reparsed = ParsedLyrics::parse(&encoded, true);
        assert_eq!(reparsed.lines, parsed.lines);
    }
}
