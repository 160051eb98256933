use maze_chase_core::{
    Position,
    agent::{AdversaryKind, Agent, AgentKind, ProtagonistPreset},
    map::Cell,
    session::Session,
};
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, MenuItem, PauseItem, Screen, format_health};

/// Renders the current screen.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Menu => render_menu(frame, app),
        Screen::Controls => render_text_screen(frame, "Controls", CONTROLS_TEXT),
        Screen::Help => render_text_screen(frame, "Help", HELP_TEXT),
        Screen::Playing => render_game(frame, app),
        Screen::Paused => {
            render_game(frame, app);
            render_pause(frame, app);
        }
        Screen::Result { victory, .. } => render_result(frame, app, victory),
    }
}

const CONTROLS_TEXT: &str = "\
Arrow keys or WASD  move one cell
Esc or p            pause
Enter               confirm menu choice
q                   quit from the main menu

Press any key to go back.";

const HELP_TEXT: &str = "\
Reach the goal (G) before the Empire catches you.

Darth Vader walks straight through walls.
Stormtroopers follow the corridors.
Kylo Ren leaps two cells at a time and falls back to
single steps when he cannot leap his way to you.

Each catch costs health and sends you back to the start (S).
Luke has 3 health and loses 1 per catch.
Yoda has 6 health and loses 0.5 per catch.

Press any key to go back.";

fn render_menu(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(7),    // Menu entries
            Constraint::Length(3), // Status line
        ])
        .split(frame.area());

    let title = Paragraph::new("MAZE CHASE")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, layout[0]);

    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let style = if index == app.menu_selected() {
                Style::default().fg(Color::Red).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(item.label()).alignment(Alignment::Center)).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), centered(layout[1], 50, 7));

    render_status(frame, layout[2], app.status());
}

fn render_text_screen(frame: &mut Frame, title: &str, text: &str) {
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, centered(frame.area(), 64, 16));
}

fn render_game(frame: &mut Frame, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Maze and pursuers
            Constraint::Length(3), // Health gauge
            Constraint::Length(3), // Status/help
        ])
        .split(frame.area());
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_layout[0]);

    render_map(frame, top[0], session);
    render_pursuers(frame, top[1], session);
    render_health(frame, main_layout[1], session.protagonist());

    let status = app
        .status()
        .unwrap_or("Arrow keys to move, Esc to pause.");
    render_status(frame, main_layout[2], Some(status));
}

/// Renders the maze with agents on top. Each cell is two columns wide.
fn render_map(frame: &mut Frame, area: Rect, session: &Session) {
    let grid = session.grid();
    let hero = session.protagonist();

    let mut lines: Vec<Line> = Vec::with_capacity(grid.height());
    for y in 0..grid.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(grid.width());
        for x in 0..grid.width() {
            let position = Position::new(x, y);
            if hero.position() == position {
                spans.push(agent_span(hero));
            } else if let Some(adversary) = session
                .adversaries()
                .iter()
                .find(|adversary| adversary.position() == position)
            {
                spans.push(agent_span(adversary));
            } else {
                spans.push(cell_span(grid[position]));
            }
        }
        lines.push(Line::from(spans));
    }

    let map = Paragraph::new(lines)
        .block(Block::default().title("Maze").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(map, area);
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Floor => Span::styled(" .", Style::default().fg(Color::DarkGray)),
        Cell::Wall => Span::styled("██", Style::default().fg(Color::Gray)),
        Cell::Door(id) => Span::styled(
            format!(" {id}"),
            Style::default().fg(Color::White).bg(Color::Blue).bold(),
        ),
        Cell::Start => Span::styled(" S", Style::default().fg(Color::Yellow)),
        Cell::Goal => Span::styled(" G", Style::default().fg(Color::Black).bg(Color::Green).bold()),
    }
}

fn agent_span(agent: &Agent) -> Span<'static> {
    let (glyph, color) = match agent.kind() {
        AgentKind::Protagonist(ProtagonistPreset::LukeSkywalker) => ("@", Color::Cyan),
        AgentKind::Protagonist(ProtagonistPreset::MasterYoda) => ("@", Color::Green),
        AgentKind::Adversary(AdversaryKind::DarthVader) => ("V", Color::Red),
        AgentKind::Adversary(AdversaryKind::KyloRen) => ("K", Color::Magenta),
        AgentKind::Adversary(AdversaryKind::Stormtrooper) => ("T", Color::White),
    };
    Span::styled(format!(" {glyph}"), Style::default().fg(color).bold())
}

/// Lists every adversary with its current path distance to the protagonist.
fn render_pursuers(frame: &mut Frame, area: Rect, session: &Session) {
    let items: Vec<ListItem> = session
        .adversaries()
        .iter()
        .enumerate()
        .map(|(id, adversary)| {
            let distance = match session.adversary_distance(id) {
                Some(distance) => format!("{distance} steps"),
                None => "no path".to_string(),
            };
            ListItem::from(Line::from(vec![
                agent_span(adversary),
                Span::raw(format!(" {:<13}", adversary.name())),
                Span::styled(distance, Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let pursuers =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Pursuers"));
    frame.render_widget(pursuers, area);
}

fn render_health(frame: &mut Frame, area: Rect, hero: &Agent) {
    let ratio = if hero.max_health() > 0.0 {
        f64::from(hero.health() / hero.max_health()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(hero.name().to_string()))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
        .ratio(ratio)
        .label(format!("Health: {}", format_health(hero)));
    frame.render_widget(gauge, area);
}

fn render_pause(frame: &mut Frame, app: &App) {
    let area = centered(frame.area(), 30, PauseItem::ALL.len() as u16 + 2);
    let items: Vec<ListItem> = PauseItem::ALL
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let style = if index == app.pause_selected() {
                Style::default().fg(Color::Red).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(item.label()).alignment(Alignment::Center)).style(style)
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        List::new(items).block(Block::default().title("Paused").borders(Borders::ALL)),
        area,
    );
}

fn render_result(frame: &mut Frame, app: &App, victory: bool) {
    let (headline, color) = if victory {
        ("YOU ESCAPED", Color::Green)
    } else {
        ("GAME OVER", Color::Red)
    };

    let mut lines = vec![
        Line::from(Span::styled(headline, Style::default().fg(color).bold())),
        Line::default(),
    ];
    if let Some(session) = app.session() {
        let hero = session.protagonist();
        lines.push(Line::from(format!(
            "{} finished with {} health.",
            hero.name(),
            format_health(hero)
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from("Press any key to return to the menu."));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
    frame.render_widget(paragraph, centered(frame.area(), 50, 8));
}

fn render_status(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let text = Paragraph::new(status.unwrap_or_default())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(text, area);
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
