//! Interactive audit console
//!
//! One screen: a URL input line, a status header, and a results area
//! that tracks the request lifecycle. The event loop ticks every 100ms
//! so the spinner animates and the session settles while the console
//! stays fully interactive.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::api::AuditClient;
use crate::models::{AuditResult, ComplianceIssue, RiskLevel, SeverityTier, StatusKind};
use crate::session::{AuditSession, RequestState};

const SPINNER_FRAMES: [&str; 8] = ["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"];

fn tier_color(tier: SeverityTier) -> Color {
    match tier {
        SeverityTier::Critical => Color::Red,
        SeverityTier::High => Color::LightRed,
        SeverityTier::Medium => Color::Yellow,
        SeverityTier::Low => Color::Blue,
    }
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Completed => Color::Green,
        StatusKind::Failed => Color::Red,
        StatusKind::InProgress => Color::Yellow,
    }
}

/// One displayed issue plus its disclosure flag. Rows are rebuilt from
/// scratch whenever a new result arrives, so every flag resets.
pub struct IssueRow {
    pub issue: ComplianceIssue,
    pub expanded: bool,
}

impl IssueRow {
    pub fn new(issue: ComplianceIssue) -> Self {
        Self {
            issue,
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Results,
}

pub struct App {
    session: AuditSession,
    endpoint: String,
    input: String,
    focus: Focus,
    rows: Vec<IssueRow>,
    list_state: ListState,
    spinner_frame: usize,
    settled_at: Option<chrono::DateTime<chrono::Local>>,
}

impl App {
    pub fn new(session: AuditSession, endpoint: String) -> Self {
        Self {
            session,
            endpoint,
            input: String::new(),
            focus: Focus::Input,
            rows: Vec::new(),
            list_state: ListState::default(),
            spinner_frame: 0,
            settled_at: None,
        }
    }

    fn tick(&mut self) {
        if self.session.poll() {
            self.on_settled();
        }
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// A request settled this tick: rebuild the rows (resetting every
    /// disclosure flag) and move focus onto the results when there is
    /// something to browse.
    fn on_settled(&mut self) {
        self.settled_at = Some(chrono::Local::now());
        match self.session.state() {
            RequestState::Succeeded(result) => {
                let result = result.clone();
                self.rebuild_rows(&result);
                if !self.rows.is_empty() {
                    self.focus = Focus::Results;
                }
            }
            _ => self.rebuild_rows(&AuditResult::default()),
        }
    }

    fn rebuild_rows(&mut self, result: &AuditResult) {
        self.rows = result
            .compliance_results
            .iter()
            .cloned()
            .map(IssueRow::new)
            .collect();
        self.list_state = ListState::default();
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.rows.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn toggle_selected(&mut self) {
        if let Some(i) = self.list_state.selected() {
            if let Some(row) = self.rows.get_mut(i) {
                row.toggle();
            }
        }
    }

    /// Handle a key press. Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.focus {
            Focus::Input => match key.code {
                KeyCode::Esc => return true,
                KeyCode::Enter => self.session.submit(&self.input),
                KeyCode::Tab => self.focus = Focus::Results,
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                }
                _ => {}
            },
            Focus::Results => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Tab => self.focus = Focus::Input,
                KeyCode::Enter => self.toggle_selected(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::PageDown => {
                    for _ in 0..10 {
                        self.next();
                    }
                }
                KeyCode::PageUp => {
                    for _ in 0..10 {
                        self.previous();
                    }
                }
                _ => {}
            },
        }
        false
    }

    fn status_line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(" Reelcheck ", Style::default().fg(Color::Cyan).bold()),
            Span::styled(
                format!("| {} | ", self.endpoint),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        match self.session.state() {
            RequestState::Idle => {
                spans.push(Span::styled("ready", Style::default().fg(Color::DarkGray)));
            }
            RequestState::Submitting => {
                let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
                let elapsed = self.session.elapsed().unwrap_or_default().as_secs();
                spans.push(Span::styled(
                    format!("{frame} auditing {elapsed}s"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            RequestState::Succeeded(result) => {
                spans.push(Span::styled(
                    result.status_label().to_string(),
                    Style::default().fg(status_color(result.status_kind())).bold(),
                ));
                if let (Some(elapsed), Some(at)) = (self.session.elapsed(), self.settled_at) {
                    spans.push(Span::styled(
                        format!(
                            "  settled in {:.1}s at {}",
                            elapsed.as_secs_f64(),
                            at.format("%H:%M:%S")
                        ),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            RequestState::Failed(_) => {
                spans.push(Span::styled("error", Style::default().fg(Color::Red).bold()));
            }
        }
        Line::from(spans)
    }
}

pub fn run(endpoint: &str, timeout: Duration) -> Result<()> {
    let client = AuditClient::new(endpoint, timeout);
    let endpoint = client.endpoint().to_string();
    let session = AuditSession::new(Arc::new(client));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, endpoint);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        // 100ms tick keeps the spinner moving and the session polled
        // even when no keys arrive.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Header
    let header = Paragraph::new(app.status_line()).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    render_input(f, chunks[1], app);
    render_results(f, chunks[2], app);

    // Footer
    let help = match app.focus {
        Focus::Input => " Enter:Submit  Tab:Results  Esc:Quit",
        Focus::Results => " j/k:Navigate  Enter:Expand/Collapse  Tab:URL input  Esc/q:Back",
    };
    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[3]);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text_style = if app.session.is_submitting() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let title = if app.session.is_submitting() {
        " Video URL (auditing) "
    } else {
        " Video URL "
    };

    let input = Paragraph::new(app.input.as_str()).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(input, area);

    if focused {
        let width = app.input.chars().count() as u16;
        let x = (area.x + 1)
            .saturating_add(width)
            .min(area.x + area.width.saturating_sub(2));
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let App {
        session,
        rows,
        list_state,
        spinner_frame,
        ..
    } = app;

    match session.state() {
        RequestState::Idle => {
            let hint = Paragraph::new("\n Enter a video URL above and press Enter to start an audit.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Results "));
            f.render_widget(hint, area);
        }
        RequestState::Submitting => {
            let frame = SPINNER_FRAMES[*spinner_frame % SPINNER_FRAMES.len()];
            let text = format!(
                "\n {frame} Auditing. Transcription can take a while for long videos."
            );
            let loading = Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(" Results "));
            f.render_widget(loading, area);
        }
        RequestState::Failed(message) => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {message}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    " Edit the URL and press Enter to retry.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let error = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red))
                        .title(" Audit Failed "),
                );
            f.render_widget(error, area);
        }
        RequestState::Succeeded(result) => {
            render_result(f, area, result, rows, list_state);
        }
    }
}

fn render_result(
    f: &mut Frame,
    area: Rect,
    result: &AuditResult,
    rows: &[IssueRow],
    list_state: &mut ListState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(9),
        ])
        .split(area);

    render_metrics(f, chunks[0], result);

    if rows.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No Compliance Issues Found",
                Style::default().fg(Color::Green).bold(),
            )),
            Line::from(Span::styled(
                " The video passed all hate speech and compliance checks.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Issues (0) "));
        f.render_widget(empty, chunks[1]);
    } else {
        let items = list_items(rows);
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Issues ({}) ", rows.len())),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], list_state);
    }

    render_summary(f, chunks[2], result);
}

fn render_metrics(f: &mut Frame, area: Rect, result: &AuditResult) {
    let risk = result.risk_level();
    let risk_color = match risk {
        RiskLevel::Safe => Color::Green,
        RiskLevel::HighRisk => Color::Red,
    };

    let mut spans = vec![
        Span::styled(" Status: ", Style::default().bold()),
        Span::styled(
            result.status_label().to_string(),
            Style::default().fg(status_color(result.status_kind())),
        ),
        Span::styled("  Issues: ", Style::default().bold()),
        Span::raw(result.issue_count().to_string()),
        Span::styled("  Risk: ", Style::default().bold()),
        Span::styled(risk.label(), Style::default().fg(risk_color)),
    ];
    if !result.session_id.is_empty() || !result.video_id.is_empty() {
        spans.push(Span::styled(
            format!("  SID: {}  VID: {}", result.session_id, result.video_id),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let metrics =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(metrics, area);
}

fn list_items(rows: &[IssueRow]) -> Vec<ListItem<'_>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| ListItem::new(issue_lines(i, row)))
        .collect()
}

fn issue_lines(index: usize, row: &IssueRow) -> Vec<Line<'_>> {
    let issue = &row.issue;
    let marker = if row.expanded { "▾" } else { "▸" };

    let head = vec![
        Span::styled(
            format!("{:>3} ", index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{marker} ")),
        Span::styled(
            format!("[{}] ", issue.severity),
            Style::default().fg(tier_color(issue.tier())).bold(),
        ),
        Span::raw(issue.category.as_str()),
        Span::styled(
            format!("  @ {}", issue.time_stamp.as_deref().unwrap_or("N/A")),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let mut lines = vec![Line::from(head)];
    if row.expanded {
        for text in issue.description.lines() {
            lines.push(Line::from(format!("      {text}")));
        }
        let flagged = issue
            .flagged_text
            .as_deref()
            .unwrap_or("No text segment identified");
        lines.push(Line::from(vec![
            Span::styled("      Flagged: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("\"{flagged}\"")),
        ]));
        if let Some(reference) = &issue.legal_reference {
            lines.push(Line::from(vec![
                Span::styled("      Legal: ", Style::default().fg(Color::DarkGray)),
                Span::raw(reference.as_str()),
            ]));
        }
        let mut detail_parts = Vec::new();
        if let Some(sub) = &issue.sub_category {
            detail_parts.push(format!("Subcategory: {sub}"));
        }
        if let Some(group) = &issue.target_group {
            detail_parts.push(format!("Target: {group}"));
        }
        if let Some(score) = issue.confidence_score {
            detail_parts.push(format!("Confidence: {score:.2}"));
        }
        if !detail_parts.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      {}", detail_parts.join("  ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_summary(f: &mut Frame, area: Rect, result: &AuditResult) {
    let mut text: Vec<Line> = result
        .summary_text()
        .lines()
        .map(|l| Line::from(format!(" {l}")))
        .collect();

    let warnings = result.warnings();
    if !warnings.is_empty() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            " System Warnings",
            Style::default().fg(Color::Yellow).bold(),
        )));
        for warning in &warnings {
            text.push(Line::from(Span::styled(
                format!("  - {warning}"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let summary = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Executive Summary "),
        );
    f.render_widget(summary, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResult;
    use crate::session::AuditBackend;
    use ratatui::backend::TestBackend;

    struct NeverBackend;

    impl AuditBackend for NeverBackend {
        fn submit_audit(&self, _video_url: &str) -> ApiResult<AuditResult> {
            panic!("backend must not be called");
        }
    }

    fn test_app() -> App {
        App::new(
            AuditSession::new(Arc::new(NeverBackend)),
            "http://localhost:8000".to_string(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn issue(category: &str) -> ComplianceIssue {
        ComplianceIssue {
            category: category.to_string(),
            severity: "high".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn double_toggle_restores_prior_state() {
        let mut row = IssueRow::new(issue("a"));
        assert!(!row.expanded);
        row.toggle();
        assert!(row.expanded);
        row.toggle();
        assert!(!row.expanded);
    }

    #[test]
    fn toggling_one_row_leaves_neighbors_untouched() {
        let mut app = test_app();
        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("a"), issue("b"), issue("c")],
            ..Default::default()
        });
        app.next();
        app.toggle_selected();
        let expanded: Vec<bool> = app.rows.iter().map(|r| r.expanded).collect();
        assert_eq!(expanded, [false, true, false]);
    }

    #[test]
    fn rebuild_resets_disclosure_and_selection() {
        let mut app = test_app();
        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("a"), issue("b")],
            ..Default::default()
        });
        app.toggle_selected();
        app.next();
        assert!(app.rows[0].expanded);

        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("x"), issue("y"), issue("z")],
            ..Default::default()
        });
        assert_eq!(app.rows.len(), 3);
        assert!(app.rows.iter().all(|r| !r.expanded));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn rebuild_with_empty_result_clears_rows() {
        let mut app = test_app();
        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("a")],
            ..Default::default()
        });
        app.rebuild_rows(&AuditResult::default());
        assert!(app.rows.is_empty());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn navigation_wraps_around() {
        let mut app = test_app();
        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("a"), issue("b")],
            ..Default::default()
        });
        assert_eq!(app.list_state.selected(), Some(0));
        app.next();
        assert_eq!(app.list_state.selected(), Some(1));
        app.next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.previous();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn typing_edits_the_input_line() {
        let mut app = test_app();
        for c in "https://x".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(app.input, "https://x");
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.input, "https://");
    }

    #[test]
    fn enter_with_empty_input_stays_idle() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::Enter));
        assert!(matches!(app.session.state(), RequestState::Idle));
    }

    #[test]
    fn tab_switches_focus_and_esc_returns() {
        let mut app = test_app();
        assert_eq!(app.focus, Focus::Input);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Results);
        let quit = app.handle_key(press(KeyCode::Esc));
        assert!(!quit);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn esc_from_input_quits() {
        let mut app = test_app();
        assert!(app.handle_key(press(KeyCode::Esc)));
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = test_app();
        app.handle_key(press(KeyCode::Tab));
        let quit = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(quit);
    }

    #[test]
    fn enter_in_results_toggles_selected_row() {
        let mut app = test_app();
        app.rebuild_rows(&AuditResult {
            compliance_results: vec![issue("a")],
            ..Default::default()
        });
        app.focus = Focus::Results;
        app.handle_key(press(KeyCode::Enter));
        assert!(app.rows[0].expanded);
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.rows[0].expanded);
    }

    fn plain_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let mut row = IssueRow::new(issue("Hate Speech"));
        row.toggle();
        let text = plain_text(&issue_lines(0, &row));
        assert!(text.contains("@ N/A"));
        assert!(text.contains("\"No text segment identified\""));
    }

    #[test]
    fn present_fields_render_without_placeholders() {
        let mut row = IssueRow::new(ComplianceIssue {
            time_stamp: Some("00:01:23".to_string()),
            flagged_text: Some("quoted segment".to_string()),
            ..issue("Hate Speech")
        });
        row.toggle();
        let text = plain_text(&issue_lines(0, &row));
        assert!(text.contains("@ 00:01:23"));
        assert!(text.contains("\"quoted segment\""));
        assert!(!text.contains("N/A"));
        assert!(!text.contains("No text segment identified"));
    }

    #[test]
    fn huge_input_keeps_cursor_inside_the_panel() {
        let mut app = test_app();
        app.input = "x".repeat(usize::from(u16::MAX));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 80);
    }
}
