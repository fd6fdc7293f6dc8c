use ratatui::style::{Color, Modifier, Style};

use crate::models::Stage;

// ── Color palette ──────────────────────────────────────────────────

pub const BG: Color = Color::Rgb(0x0a, 0x0a, 0x0f);
pub const NEON_CYAN: Color = Color::Rgb(0x00, 0xff, 0xf5);
pub const NEON_MAGENTA: Color = Color::Rgb(0xff, 0x00, 0xff);
pub const NEON_PINK: Color = Color::Rgb(0xff, 0x2d, 0x6f);
pub const NEON_GREEN: Color = Color::Rgb(0x39, 0xff, 0x14);
pub const NEON_ORANGE: Color = Color::Rgb(0xff, 0x6e, 0x27);
pub const NEON_YELLOW: Color = Color::Rgb(0xff, 0xe6, 0x00);
pub const ELECTRIC_BLUE: Color = Color::Rgb(0x00, 0xd4, 0xff);
pub const TEXT_DIM: Color = Color::Rgb(0xb0, 0xb0, 0xb0);
pub const TEXT_BRIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const BORDER_DIM: Color = Color::Rgb(0x00, 0x5f, 0x5f);
pub const BORDER_BRIGHT: Color = Color::Rgb(0x00, 0xff, 0xf5);
pub const TRACK: Color = Color::Rgb(0x1a, 0x1a, 0x24);

// ── Style presets ──────────────────────────────────────────────────

pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(BORDER_BRIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BORDER_DIM)
    }
}

pub fn stage_color(stage: Stage) -> Color {
    match stage {
        Stage::Design => ELECTRIC_BLUE,
        Stage::InProgress => NEON_CYAN,
        Stage::Validation => NEON_MAGENTA,
        Stage::RdPrototype => NEON_YELLOW,
        Stage::Completed => NEON_GREEN,
        Stage::OnHold => TEXT_DIM,
    }
}

pub fn stage_style(stage: Stage) -> Style {
    let style = Style::default().fg(stage_color(stage));
    if stage == Stage::InProgress {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn stage_symbol(stage: Stage) -> &'static str {
    match stage {
        Stage::Design => "◇",
        Stage::InProgress => "▶",
        Stage::Validation => "◈",
        Stage::RdPrototype => "✦",
        Stage::Completed => "◉",
        Stage::OnHold => "‖",
    }
}

// ── Overdue indicator ──────────────────────────────────────────────

pub const OVERDUE_SYMBOL: &str = "⚠";

pub fn overdue_style() -> Style {
    Style::default().fg(NEON_PINK).add_modifier(Modifier::BOLD)
}

// ── Progress bar ───────────────────────────────────────────────────

pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((done * width) / total).min(width)
    };
    let empty = width - filled;
    "█".repeat(filled) + &"░".repeat(empty)
}

// ── ASCII art header ───────────────────────────────────────────────

pub const HEADER_ART: &str = "\
▐██▌ PORTFOLIO ▐██▌";

// ── Tests ──────────────────────────────────────────────────────────
