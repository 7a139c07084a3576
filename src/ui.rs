use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::list::centered_scroll;
use crate::map::{renderer, MapLayers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// Width of the member list column in terminal cells.
pub const LIST_WIDTH: u16 = 34;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into content area and status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map + list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(LIST_WIDTH)])
        .split(rows[0]);

    render_map(frame, app, columns[0]);
    render_list(frame, app, columns[1]);
    render_status_bar(frame, app, rows[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Member Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut view = app.view.clone();
    view.resize(inner.width as usize * 2, inner.height as usize * 4);

    let layers = renderer::render(&app.artwork, &view);

    // Mouse cursor marker in inner-cell coordinates
    let cursor_pos = app.mouse_pos.and_then(|(col, row)| {
        let cx = col.checked_sub(area.x + 1)?;
        let cy = row.checked_sub(area.y + 1)?;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    let map_widget = MapWidget { layers, cursor_pos };
    frame.render_widget(map_widget, inner);

    if app.tooltip.is_visible() {
        render_tooltip(frame, app, inner);
    }
}

/// Custom widget compositing the braille layers back to front.
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: outlines, active fills, selection on top
        self.render_layer(&self.layers.outlines, Color::DarkGray, area, buf);
        self.render_layer(&self.layers.active, Color::Green, area, buf);
        self.render_layer(&self.layers.selected, Color::Yellow, area, buf);

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

/// Render the floating tooltip inside the map area. The anchor is computed
/// in braille pixels; here it lands on character cells, clamped so the box
/// always stays on screen.
fn render_tooltip(frame: &mut Frame, app: &App, inner: Rect) {
    let lines: Vec<Line> = app
        .tooltip
        .lines()
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            let style = if idx == 0 {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(text.clone(), style))
        })
        .collect();

    let width = (app.tooltip.width() / 2).max(0) as u16;
    let height = lines.len() as u16 + 2;
    if inner.width < width || inner.height < height {
        return;
    }

    let (px, py) = app.tooltip.position();
    let x = ((px.max(0) / 2) as u16).min(inner.width - width);
    let y = ((py.max(0) / 4) as u16).min(inner.height - height);
    let popup = Rect::new(inner.x + x, inner.y + y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Members ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if app.cards.show_all_visible() {
        lines.push(Line::from(Span::styled(
            "[a] show all countries",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    // Track where the highlighted card lands so it can be scrolled into view
    let mut target_top: Option<usize> = None;
    let mut visible_idx = 0;
    for card in app.cards.cards() {
        if card.filtered {
            continue;
        }
        if visible_idx > 0 {
            lines.push(Line::default());
        }
        visible_idx += 1;

        if card.highlighted && app.cards.scroll_target().is_some() {
            target_top = Some(lines.len());
        }

        let name_style = if card.highlighted {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(card.name.clone(), name_style),
            Span::styled(
                format!(" ({})", card.members.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for member in &card.members {
            lines.push(Line::from(Span::styled(
                format!("  › {}", member.title),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let scroll = target_top
        .map(|top| centered_scroll(top, 1, inner.height as usize, lines.len()))
        .unwrap_or(0);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_label(), Style::default().fg(Color::Yellow)),
    ];

    if let Some(name) = app.hovered_label() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(name, Style::default().fg(Color::Green)));
    }

    spans.push(Span::styled(
        " | +/-:zoom  click:filter  a:show all  q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
