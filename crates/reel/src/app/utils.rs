use reel_core::DeckCard;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows taken by a card's border
pub(crate) const CARD_CHROME_ROWS: usize = 2;
/// Columns taken by a card's border and padding
pub(crate) const CARD_CHROME_COLS: usize = 4;

/// Greedy word wrap by display width. Words wider than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let sep = usize::from(!line.is_empty());

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // Hard-split a word that cannot fit on any line
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        lines.push(line);
    }

    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Height in rows of a card rendered `width` columns wide
pub(crate) fn card_height(card: &DeckCard, width: u16) -> usize {
    let inner = (width as usize).saturating_sub(CARD_CHROME_COLS);
    let body_rows = if card.body.trim().is_empty() {
        1
    } else {
        wrap_text(&card.body, inner).len().max(1)
    };
    CARD_CHROME_ROWS + body_rows
}

/// Slider percentage for a row inside a slider `rows` tall
pub(crate) fn percent_for_row(row: u16, rows: u16) -> f64 {
    if rows <= 1 {
        return 0.0;
    }
    (row.min(rows - 1) as f64 / (rows - 1) as f64) * 100.0
}

/// Row of the slider thumb for a percentage
pub(crate) fn row_for_percent(percent: f64, rows: u16) -> u16 {
    if rows <= 1 {
        return 0;
    }
    let row = (percent.clamp(0.0, 100.0) / 100.0 * (rows - 1) as f64).round();
    row as u16
}
