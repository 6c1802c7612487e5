use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use aimdrill::engine::Phase;
use aimdrill::geometry::Zone;
use aimdrill::settings::{GameMode, DURATION_RANGE, SIZE_RANGE};
use aimdrill::spawner::Target;
use aimdrill::stats::{rating, GameStats, Grade};

use crate::App;

// Terminal cells stand in for pixels: a cell is ~10px wide and ~20px tall,
// which keeps engine-space circles round on screen.
pub const PX_PER_COL: f64 = 10.0;
pub const PX_PER_ROW: f64 = 20.0;

const HORIZONTAL_MARGIN: u16 = 5;

/// Engine-space coordinate of a cell's center.
pub fn cell_center_px(col: u16, row: u16) -> (f64, f64) {
    (
        (col as f64 + 0.5) * PX_PER_COL,
        (row as f64 + 0.5) * PX_PER_ROW,
    )
}

/// Engine viewport for a terminal of the given cell size.
pub fn viewport_px(cols: u16, rows: u16) -> (f64, f64) {
    (cols as f64 * PX_PER_COL, rows as f64 * PX_PER_ROW)
}

pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.engine.phase() {
            Phase::Menu => render_menu(self, area, buf),
            Phase::Playing => render_arena(self, area, buf),
            Phase::Results => render_results(self, area, buf),
        }
    }
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let cyan_bold = bold.fg(Color::Cyan);

    let mut lines: Vec<Line> = vec![
        Line::styled("A I M D R I L L", cyan_bold),
        Line::styled("train your precision - track your progress", dim),
        Line::default(),
    ];

    for (idx, mode) in GameMode::ALL.iter().enumerate() {
        let selected = idx == app.menu.mode_idx;
        let marker = if selected { "▸ " } else { "  " };
        let title_style = if selected { cyan_bold } else { bold };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", mode.title()), title_style),
            Span::styled(format!("  {}", mode.blurb()), dim),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("duration ", dim),
        Span::styled(format!("{}s", app.menu.duration_secs), bold),
        Span::styled(
            format!("  ({}-{}s, ↑/↓)", DURATION_RANGE.0, DURATION_RANGE.1),
            dim,
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("target size ", dim),
        Span::styled(format!("{}px", app.menu.target_size as u64), bold),
        Span::styled(
            format!("  ({}-{}px, [/])", SIZE_RANGE.0 as u64, SIZE_RANGE.1 as u64),
            dim,
        ),
    ]));
    lines.push(Line::default());
    lines.push(Line::styled(
        "(←/→) mode  (enter) start  (esc) quit",
        Style::default().fg(Color::Magenta),
    ));

    centered_paragraph(lines, area, buf);
}

fn render_arena(app: &App, area: Rect, buf: &mut Buffer) {
    let now = app.engine.now_ms();

    // recent mouse trail, drawn first so targets paint over it
    let trail_style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM);
    let trail = app.engine.mouse_path();
    for &(px, py) in trail.iter().rev().take(60) {
        let col = (px / PX_PER_COL) as u16;
        let row = (py / PX_PER_ROW) as u16;
        if let Some(cell) = cell_in(area, buf, col, row) {
            cell.set_symbol("·").set_style(trail_style);
        }
    }

    for target in app.engine.targets() {
        render_target(target, now, area, buf);
    }

    render_hud(app.engine.stats(), app.engine.time_left_secs(), area, buf);
}

/// Paint one target as concentric rings; each cell is classified against the
/// target's current rendered diameter, so shrink shows up automatically.
fn render_target(target: &Target, now: f64, area: Rect, buf: &mut Buffer) {
    let diameter = target.effective_size(now);
    if diameter <= 0.0 {
        return;
    }
    let (cx, cy) = target.center();
    let radius = diameter / 2.0;

    let col_min = ((cx - radius) / PX_PER_COL).floor().max(0.0) as u16;
    let col_max = ((cx + radius) / PX_PER_COL).ceil() as u16;
    let row_min = ((cy - radius) / PX_PER_ROW).floor().max(0.0) as u16;
    let row_max = ((cy + radius) / PX_PER_ROW).ceil() as u16;

    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let (px, py) = cell_center_px(col, row);
            let (symbol, style) = match target.classify_click(px, py, now) {
                Zone::Inner => ("●", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Zone::Middle => ("▓", Style::default().fg(Color::Yellow)),
                Zone::Outer => ("░", Style::default().fg(Color::Red)),
                Zone::Miss => continue,
            };
            if let Some(cell) = cell_in(area, buf, col, row) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}

fn render_hud(stats: &GameStats, time_left: u64, area: Rect, buf: &mut Buffer) {
    // panel sized to the engine's reserved HUD region (280x160 px)
    let panel = Rect {
        x: area.x,
        y: area.y,
        width: 28.min(area.width),
        height: 8.min(area.height),
    };

    let dim = Style::default().add_modifier(Modifier::DIM);
    let accuracy = stats.accuracy().round() as u64;
    let avg_react = stats.avg_reaction_ms().map_or("—".into(), |ms| {
        format!("{}ms", ms.round() as u64)
    });
    let avg_lin = stats.avg_linearity().map_or("—".into(), |lin| {
        format!("{}%", lin.round() as u64)
    });

    let lines = vec![
        Line::from(vec![
            Span::styled("score     ", dim),
            Span::styled(
                stats.score.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("hits      ", dim),
            Span::raw(format!("{}/{}", stats.hits, stats.total_clicks)),
        ]),
        Line::from(vec![
            Span::styled("accuracy  ", dim),
            Span::styled(format!("{accuracy}%"), accuracy_style(accuracy)),
        ]),
        Line::from(vec![
            Span::styled("avg react ", dim),
            Span::raw(avg_react),
        ]),
        Line::from(vec![
            Span::styled("linearity ", dim),
            Span::raw(avg_lin),
        ]),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("live stats", dim)),
        )
        .render(panel, buf);

    // countdown pinned top-right, emphasized when nearly out of time
    let clock = format_clock(time_left);
    let clock_style = if time_left <= 5 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let clock_width = clock.len() as u16 + 2;
    if area.width > clock_width {
        let clock_area = Rect {
            x: area.x + area.width - clock_width,
            y: area.y,
            width: clock_width,
            height: 1,
        };
        Paragraph::new(Line::styled(clock, clock_style))
            .alignment(Alignment::Right)
            .render(clock_area, buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = app.engine.stats();
    let settings = app.engine.settings();
    let grade = rating(stats);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let grade_style = bold.fg(grade_color(grade));

    let accuracy = stats.accuracy().round() as u64;
    let avg_react = stats
        .avg_reaction_ms()
        .map_or("—".into(), |ms| format!("{}ms", ms.round() as u64));
    let best_react = stats
        .best_reaction_ms()
        .map_or("—".into(), |ms| format!("{}ms", ms.round() as u64));
    let consistency = stats
        .reaction_std_dev()
        .map_or("—".into(), |sd| format!("±{}ms", sd.round() as u64));
    let avg_lin = stats
        .avg_linearity()
        .map_or("—".into(), |lin| format!("{}%", lin.round() as u64));
    let [outer, middle, inner] = stats.zone_hits();

    let lines = vec![
        Line::styled(
            format!("{} mode — results", settings.mode.title().to_lowercase()),
            dim,
        ),
        Line::default(),
        Line::styled(grade.letter().to_string(), grade_style),
        Line::styled(grade.label().to_string(), grade_style),
        Line::default(),
        Line::from(vec![
            Span::styled("final score ", dim),
            Span::styled(
                stats.score.to_string(),
                bold.fg(Color::Yellow),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("hits ", dim),
            Span::styled(format!("{}/{}", stats.hits, stats.total_clicks), bold),
            Span::styled(format!("  ({accuracy}% accuracy)"), dim),
        ]),
        Line::from(vec![
            Span::styled("avg reaction ", dim),
            Span::styled(avg_react, bold),
            Span::styled(format!("  best {best_react}  consistency {consistency}"), dim),
        ]),
        Line::from(vec![
            Span::styled("path linearity ", dim),
            Span::styled(avg_lin, bold),
        ]),
        Line::from(vec![
            Span::styled("duration ", dim),
            Span::styled(format!("{:.1}s", stats.elapsed_secs()), bold),
            Span::styled(format!("  ({:.1} hits/s)", stats.hits_per_sec()), dim),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("zones  ", dim),
            Span::styled(format!("outer {outer} (+1)  "), Style::default().fg(Color::Red)),
            Span::styled(format!("middle {middle} (+2)  "), Style::default().fg(Color::Yellow)),
            Span::styled(format!("center {inner} (+5)"), Style::default().fg(Color::Cyan)),
        ]),
        Line::default(),
        Line::styled(
            "(r) play again  (m) menu  (esc) quit",
            Style::default().fg(Color::Magenta),
        ),
    ];

    centered_paragraph(lines, area, buf);
}

fn accuracy_style(accuracy: u64) -> Style {
    if accuracy >= 80 {
        Style::default().fg(Color::Green)
    } else if accuracy >= 50 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::SPlus => Color::Yellow,
        Grade::S => Color::Magenta,
        Grade::A => Color::Cyan,
        Grade::B => Color::Green,
        Grade::C => Color::LightYellow,
        Grade::D => Color::Red,
    }
}

fn centered_paragraph(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let content_height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(area.height.saturating_sub(content_height) / 2),
                Constraint::Length(content_height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn cell_in<'a>(
    area: Rect,
    buf: &'a mut Buffer,
    col: u16,
    row: u16,
) -> Option<&'a mut ratatui::buffer::Cell> {
    if col >= area.x + area.width || row >= area.y + area.height {
        return None;
    }
    buf.cell_mut(Position::new(col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(120), "2:00");
    }

    #[test]
    fn test_cell_px_roundtrip() {
        let (px, py) = cell_center_px(10, 5);
        assert_eq!(px, 105.0);
        assert_eq!(py, 110.0);
        assert_eq!((px / PX_PER_COL) as u16, 10);
        assert_eq!((py / PX_PER_ROW) as u16, 5);
    }

    #[test]
    fn test_viewport_px() {
        assert_eq!(viewport_px(192, 54), (1920.0, 1080.0));
    }
}
