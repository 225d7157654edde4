pub mod charting;
pub mod screen;

use glance::{
    config::Config,
    emphasis::{emphasize, Emphasis},
    orp,
    pacing::{PlayState, ReadingMode},
    retention::{format_interval, preview_intervals},
    tokenizer::Token,
    util::percent,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{ReadingView, ReviewView};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Rough average display width of a word plus its trailing space
const AVERAGE_WORD_WIDTH: usize = 6;

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn highlight_style() -> Style {
    bold_style().fg(Color::Yellow)
}

/// Spans for one word, bolding its leading part when emphasis is on
fn word_spans(text: &str, config: &Config, base: Style) -> Vec<Span<'static>> {
    if !config.emphasis {
        return vec![Span::styled(text.to_string(), base)];
    }
    match emphasize(text, config.bold_ratio) {
        Emphasis::Plain(text) => vec![Span::styled(text, base)],
        Emphasis::Split {
            prefix,
            bold,
            light,
            suffix,
        } => vec![
            Span::styled(prefix, base),
            Span::styled(bold, base.add_modifier(Modifier::BOLD)),
            Span::styled(light, base.add_modifier(Modifier::DIM)),
            Span::styled(suffix, base),
        ],
    }
}

/// A single word with its fixation character pinned to the middle column
fn orp_line(text: &str, width: u16) -> Line<'static> {
    let split = orp::split(text);
    let pad = (width as usize / 2).saturating_sub(split.left.width());

    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(split.left, bold_style()),
        Span::styled(split.center, bold_style().fg(Color::Red)),
        Span::styled(split.right, bold_style()),
    ])
}

/// Words around `position` that fit on one line of `width` columns
fn flow_line(tokens: &[Token], position: usize, config: &Config, width: u16) -> Line<'static> {
    let Some(current) = tokens.get(position) else {
        return Line::default();
    };
    let budget = (width as usize).saturating_sub(current.text.width()) / 2;

    let mut before = Vec::new();
    let mut used = 0;
    for token in tokens[..position].iter().rev() {
        used += token.text.width() + 1;
        if used > budget {
            break;
        }
        before.push(token);
    }
    before.reverse();

    let mut spans = Vec::new();
    for token in before {
        spans.extend(word_spans(&token.text, config, dim_style()));
        spans.push(Span::raw(" "));
    }
    spans.extend(word_spans(&current.text, config, highlight_style()));

    let mut used = 0;
    for token in &tokens[position + 1..] {
        used += token.text.width() + 1;
        if used > budget {
            break;
        }
        spans.push(Span::raw(" "));
        spans.extend(word_spans(&token.text, config, dim_style()));
    }

    Line::from(spans)
}

/// The page of text containing `position`, current word highlighted
fn page_spans(
    tokens: &[Token],
    position: usize,
    config: &Config,
    area: Rect,
) -> Vec<Span<'static>> {
    let capacity = ((area.width as usize * area.height as usize) / AVERAGE_WORD_WIDTH).max(1);
    let start = (position / capacity) * capacity;
    let end = (start + capacity).min(tokens.len());

    tokens[start..end]
        .iter()
        .flat_map(|token| {
            let style = if token.index == position {
                highlight_style().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let mut spans = word_spans(&token.text, config, style);
            spans.push(Span::raw(" "));
            spans
        })
        .collect()
}

fn chunk_line(chunk: &[Token], config: &Config) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, token) in chunk.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.extend(word_spans(&token.text, config, bold_style()));
    }
    Line::from(spans)
}

fn format_remaining(ms: f64) -> String {
    let secs = (ms / 1000.0).round() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// The reader: current word(s), progress and key legend
pub struct ReaderWidget<'a> {
    pub view: &'a ReadingView,
    pub config: &'a Config,
    pub status: Option<&'a str>,
}

impl Widget for ReaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.view.controller;
        let settings = controller.settings();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(3),    // text
                Constraint::Length(1), // progress
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let mode = match settings.mode {
            ReadingMode::Chunk => format!("chunk of {}", settings.chunk_size),
            mode => mode.to_string(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled(self.view.item.title.clone(), bold_style()),
            Span::styled(
                format!(
                    "   {} wpm · {mode} · {} left",
                    settings.wpm,
                    format_remaining(controller.remaining_ms())
                ),
                dim_style(),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let body = chunks[1];
        let tokens = controller.tokens();
        let position = controller.position();
        if controller.play_state() == PlayState::ContextView {
            let radius = self.config.context_radius;
            let start = position.saturating_sub(radius);
            let end = (position + radius + 1).min(tokens.len());
            let spans: Vec<Span> = tokens[start..end]
                .iter()
                .flat_map(|token| {
                    let style = if token.index == position {
                        highlight_style().add_modifier(Modifier::UNDERLINED)
                    } else {
                        Style::default()
                    };
                    [Span::styled(token.text.clone(), style), Span::raw(" ")]
                })
                .collect();

            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title(" context "))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(body, buf);
        } else if settings.mode == ReadingMode::Classic {
            let spans = page_spans(tokens, position, self.config, body);
            Paragraph::new(Line::from(spans))
                .wrap(Wrap { trim: true })
                .render(body, buf);
        } else {
            let line = match settings.mode {
                ReadingMode::Flow => flow_line(tokens, position, self.config, body.width),
                ReadingMode::Chunk => chunk_line(controller.current_chunk(), self.config),
                _ => match controller.current_token() {
                    Some(token) if self.config.show_orp && !self.config.emphasis => {
                        orp_line(&token.text, body.width)
                    }
                    Some(token) => Line::from(word_spans(&token.text, self.config, bold_style())),
                    None => Line::default(),
                },
            };
            let pinned = settings.mode == ReadingMode::Single
                && self.config.show_orp
                && !self.config.emphasis;
            let middle = Rect {
                y: body.y + body.height / 2,
                height: 1,
                ..body
            };
            Paragraph::new(line)
                .alignment(if pinned {
                    Alignment::Left
                } else {
                    Alignment::Center
                })
                .render(middle, buf);
        }

        let progress = controller.progress().clamp(0.0, 1.0);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(progress)
            .label(format!("{}%", percent(progress, 1.0)))
            .render(chunks[2], buf);

        let status = match (self.status, controller.play_state()) {
            (Some(message), _) => message.to_string(),
            (None, PlayState::Idle) => "press space to start".to_string(),
            (None, PlayState::Paused) => "paused".to_string(),
            (None, PlayState::Finished) => "finished".to_string(),
            (None, _) => String::new(),
        };
        Paragraph::new(Span::styled(status, italic_style().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let legend = if controller.play_state() == PlayState::ContextView {
            "(s)ave word / (c) back / (space) resume / (q)uit"
        } else {
            "(space) play/pause / (←→) seek / (↑↓) speed / (c)ontext / (e)mphasis / (q)uit"
        };
        Paragraph::new(Span::styled(legend, italic_style())).render(chunks[4], buf);
    }
}

/// Summary of the finished session with the item's wpm history
pub struct ResultsWidget<'a> {
    pub view: &'a ReadingView,
}

impl Widget for ResultsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let magenta_style = Style::default().fg(Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let (sessions, highest_wpm) = charting::compute_chart_params(&self.view.history);
        let tuples: Vec<(f64, f64)> = self.view.history.iter().map(|&p| p.into()).collect();
        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&tuples)];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("session")
                    .bounds([1.0, sessions])
                    .labels(vec![
                        Span::styled("1", bold_style()),
                        Span::styled(charting::format_label(sessions), bold_style()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", bold_style()),
                        Span::styled(charting::format_label(highest_wpm), bold_style()),
                    ]),
            )
            .render(chunks[0], buf);

        let stats = match (self.view.last_summary, self.view.item.last_session()) {
            (Some(summary), Some(record)) => format!(
                "{} words   {} wpm set   {:.0} wpm effective   {:.1}s",
                summary.words_read,
                summary.wpm,
                record.effective_wpm(),
                summary.duration_secs
            ),
            _ => String::from("no session recorded"),
        };
        Paragraph::new(Span::styled(stats, bold_style()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled("(r)ead again / (q)uit", italic_style()))
            .render(chunks[3], buf);
    }
}

/// Flash-card view of the review queue
pub struct ReviewWidget<'a> {
    pub view: &'a ReviewView,
    pub status: Option<&'a str>,
}

impl Widget for ReviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // counts
                Constraint::Min(3),    // card
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let session = &self.view.session;
        Paragraph::new(Span::styled(
            format!(
                "{} due · {} reviewed",
                session.remaining(),
                session.reviewed()
            ),
            dim_style(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let mut lines = Vec::new();
        let legend = match session.current() {
            Some(entry) => {
                lines.push(Line::from(Span::styled(
                    entry.word.clone(),
                    highlight_style(),
                )));
                lines.push(Line::from(Span::styled(
                    format!("level {}", entry.proficiency),
                    dim_style(),
                )));
                lines.push(Line::default());
                if self.view.revealed {
                    lines.push(if entry.definition.is_empty() {
                        Line::from(Span::styled("no definition saved", italic_style()))
                    } else {
                        Line::from(entry.definition.clone())
                    });
                    for example in &entry.examples {
                        lines.push(Line::from(Span::styled(
                            format!("“{example}”"),
                            italic_style(),
                        )));
                    }
                    let ratings: Vec<String> = preview_intervals()
                        .iter()
                        .enumerate()
                        .map(|(i, (rating, minutes))| {
                            format!("({}) {rating} {}", i + 1, format_interval(*minutes))
                        })
                        .collect();
                    format!("{} / (n)ext / (q)uit", ratings.join(" / "))
                } else {
                    String::from("(space) reveal / (n)ext / (q)uit")
                }
            }
            None => {
                lines.push(Line::from(Span::styled("all caught up", bold_style())));
                lines.push(Line::default());
                for (level, count) in self.view.mastery.iter().enumerate() {
                    lines.push(Line::from(format!(
                        "level {level}  {}  {count}",
                        "■".repeat((*count).min(40))
                    )));
                }
                String::from("(q)uit")
            }
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            self.status.unwrap_or_default().to_string(),
            italic_style().fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(legend, italic_style())).render(chunks[3], buf);
    }
}
