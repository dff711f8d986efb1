//! Paginated table widget.
//!
//! Draws a [`TableState`] as a bordered table: optional search line, a
//! checkbox column when rows are selectable, the configured columns with the
//! sort indicator, an optional trailing actions column, and a status line
//! with the page tokens and counters.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState as TuiTableState},
    Frame,
};

use crate::table::{Body, PageToken, SortDirection, TableRow, TableState, TableView};

pub struct TableOptions<'a, T> {
    pub title: &'a str,
    pub searchable: bool,
    pub selectable: bool,
    pub accent: Color,
    /// Labels for the per-row controls shown in a trailing column.
    pub actions: Option<&'a dyn Fn(&T) -> Vec<&'static str>>,
    /// Search term being typed, if the search box has focus.
    pub search_input: Option<&'a str>,
}

impl<'a, T> TableOptions<'a, T> {
    pub fn new(title: &'a str, accent: Color) -> Self {
        Self {
            title,
            searchable: false,
            selectable: false,
            accent,
            actions: None,
            search_input: None,
        }
    }
}

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";

pub fn render_table<T: TableRow>(f: &mut Frame, area: Rect, table: &TableState<T>, options: &TableOptions<'_, T>) {
    let view = table.view();

    let block = Block::default()
        .title(format!("{} ({})", options.title, view.total_items))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = Vec::with_capacity(3);
    if options.searchable {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let (search_area, table_area, status_area) = if options.searchable {
        (Some(chunks[0]), chunks[1], chunks[2])
    } else {
        (None, chunks[0], chunks[1])
    };

    if let Some(search_area) = search_area {
        f.render_widget(search_line(table.search(), options), search_area);
    }

    render_body(f, table_area, table, &view, options);
    f.render_widget(Paragraph::new(status_line(table, &view, options)), status_area);
}

fn search_line<'a, T>(current: &'a str, options: &TableOptions<'a, T>) -> Paragraph<'a> {
    let line = match options.search_input {
        Some(input) => Line::from(vec![
            Span::styled("Buscar: ", Style::default().fg(options.accent).add_modifier(Modifier::BOLD)),
            Span::raw(input),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        None if current.is_empty() => Line::from(Span::styled(
            "/ para buscar",
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(vec![Span::raw("Buscar: "), Span::styled(current, Style::default().fg(options.accent))]),
    };
    Paragraph::new(line)
}

fn render_body<T: TableRow>(
    f: &mut Frame,
    area: Rect,
    table: &TableState<T>,
    view: &TableView<'_, T>,
    options: &TableOptions<'_, T>,
) {
    let header_style = Style::default().fg(options.accent).add_modifier(Modifier::BOLD);
    let mut header_cells = Vec::new();
    let mut widths = Vec::new();

    if options.selectable {
        let mark = if view.all_visible_selected { CHECKED } else { UNCHECKED };
        header_cells.push(Cell::from(mark).style(header_style));
        widths.push(Constraint::Length(3));
    }

    for column in table.columns() {
        let mut label = column.label.to_string();
        if let Some(sort) = table.sort() {
            if sort.field == column.key {
                label.push_str(match sort.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                });
            }
        }
        header_cells.push(Cell::from(label).style(header_style));
        widths.push(match column.width {
            Some(percent) => Constraint::Percentage(percent),
            None => Constraint::Min(6),
        });
    }

    if let Some(actions) = options.actions {
        let action_width = view
            .rows
            .iter()
            .map(|row| actions(*row).join(" ").chars().count())
            .max()
            .unwrap_or(0)
            .max("Acciones".len()) as u16;
        header_cells.push(Cell::from("Acciones").style(header_style));
        widths.push(Constraint::Length(action_width));
    }

    let header = Row::new(header_cells);

    if view.body != Body::Rows {
        let empty: Vec<Row> = Vec::new();
        f.render_widget(Table::new(empty, widths.clone()).header(header), area);

        let message = match view.body {
            Body::Loading => "Cargando...",
            _ => "No hay registros para mostrar",
        };
        let placeholder_area = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(1),
            ..area
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(placeholder, placeholder_area);
        return;
    }

    let rows = view.rows.iter().copied().map(|row| {
        let selected = row.id().map(|id| table.is_selected(&id)).unwrap_or(false);
        let mut cells = Vec::with_capacity(table.columns().len() + 2);
        if options.selectable {
            cells.push(Cell::from(if selected { CHECKED } else { UNCHECKED }));
        }
        cells.extend(table.columns().iter().map(|c| Cell::from(c.display(row))));
        if let Some(actions) = options.actions {
            cells.push(Cell::from(actions(row).join(" ")).style(Style::default().fg(Color::DarkGray)));
        }

        let style = if selected {
            Style::default().fg(options.accent)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    });

    let table_widget = Table::new(rows, widths)
        .header(header)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TuiTableState::default();
    state.select(Some(table.cursor()));
    f.render_stateful_widget(table_widget, area, &mut state);
}

fn status_line<'a, T: TableRow>(table: &TableState<T>, view: &TableView<'_, T>, options: &TableOptions<'_, T>) -> Line<'a> {
    let mut spans = Vec::new();

    if view.show_pagination() {
        spans.push(Span::raw("« "));
        for token in &view.pages {
            let style = match token {
                PageToken::Page(n) if *n == view.current_page => Style::default()
                    .fg(options.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                PageToken::Page(_) => Style::default(),
                PageToken::Ellipsis => Style::default().fg(Color::DarkGray),
            };
            spans.push(Span::styled(token.to_string(), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw("» "));
        spans.push(Span::styled(
            format!(" Página {} de {}", view.current_page, view.total_pages),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let count = if view.matched_items == view.total_items {
        format!("  {} registros", view.total_items)
    } else {
        format!("  {} de {} registros", view.matched_items, view.total_items)
    };
    spans.push(Span::styled(count, Style::default().fg(Color::DarkGray)));

    if options.selectable && !table.selection().is_empty() {
        spans.push(Span::styled(
            format!(" · {} seleccionados", table.selection().len()),
            Style::default().fg(options.accent),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, PaginationMode, TableAction};
    use ratatui::{backend::TestBackend, Terminal};

    #[derive(Debug, Clone)]
    struct Member {
        id: u32,
        name: &'static str,
    }

    impl TableRow for Member {
        type Id = u32;

        fn id(&self) -> Option<u32> {
            Some(self.id)
        }
    }

    fn members(count: u32) -> Vec<Member> {
        const NAMES: [&str; 4] = ["Ana", "Beto", "Carla", "Dario"];
        (1..=count).map(|id| Member { id, name: NAMES[(id as usize - 1) % NAMES.len()] }).collect()
    }

    fn table(mode: PaginationMode) -> TableState<Member> {
        let columns = vec![
            Column::new("id", "ID", |m: &Member| i64::from(m.id).into()).width(10),
            Column::new("name", "Nombre", |m: &Member| m.name.into()).sortable().width(40),
        ];
        TableState::new(columns, mode, 10)
    }

    fn draw(table: &TableState<Member>, options: &TableOptions<'_, Member>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal.draw(|f| render_table(f, f.size(), table, options)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_rows_with_sort_indicator() {
        let mut t = table(PaginationMode::Client);
        t.set_data(members(3), 0);
        t.dispatch(TableAction::SetSort("name".into()));
        t.dispatch(TableAction::SetSort("name".into()));

        let out = draw(&t, &TableOptions::new("Alumnos", Color::Cyan));
        assert!(out.contains("Alumnos (3)"));
        assert!(out.contains("Nombre ▼"));
        let carla = out.find("Carla").unwrap();
        let ana = out.find("Ana").unwrap();
        assert!(carla < ana);
    }

    #[test]
    fn loading_replaces_rows() {
        let mut t = table(PaginationMode::Client);
        t.set_data(members(3), 0);
        t.set_loading(true);

        let out = draw(&t, &TableOptions::new("Alumnos", Color::Cyan));
        assert!(out.contains("Cargando..."));
        assert!(!out.contains("Beto"));
        assert!(!out.contains("No hay registros"));
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let t = table(PaginationMode::Client);
        let out = draw(&t, &TableOptions::new("Alumnos", Color::Cyan));
        assert!(out.contains("No hay registros para mostrar"));
        assert!(!out.contains("«"));
    }

    #[test]
    fn pagination_tokens_are_rendered() {
        let mut t = table(PaginationMode::Server);
        t.set_data(members(10), 95);
        t.dispatch(TableAction::SetPage(5));

        let out = draw(&t, &TableOptions::new("Pagos", Color::Cyan));
        assert!(out.contains("« 1 ... 3 4 5 6 7 ... 10 »"));
        assert!(out.contains("Página 5 de 10"));
        assert!(out.contains("95 registros"));
    }

    #[test]
    fn client_search_keeps_full_total_in_title() {
        let mut t = table(PaginationMode::Client);
        t.set_data(members(8), 0);
        t.dispatch(TableAction::SetSearch("ana".into()));

        let out = draw(&t, &TableOptions::new("Alumnos", Color::Cyan));
        assert!(out.contains("Alumnos (8)"));
        assert!(out.contains("2 de 8 registros"));
        assert!(!out.contains("Beto"));
    }

    #[test]
    fn selection_column_and_actions() {
        let mut t = table(PaginationMode::Client);
        t.set_data(members(2), 0);
        t.dispatch(TableAction::ToggleAll);

        let actions = |_: &Member| vec!["[d]el"];
        let mut options = TableOptions::new("Alumnos", Color::Cyan);
        options.selectable = true;
        options.actions = Some(&actions);

        let out = draw(&t, &options);
        assert_eq!(out.matches(CHECKED).count(), 3);
        assert!(out.contains("Acciones"));
        assert!(out.contains("[d]el"));
        assert!(out.contains("2 seleccionados"));
    }

    #[test]
    fn search_box_shows_typed_term() {
        let t = table(PaginationMode::Client);
        let mut options = TableOptions::new("Alumnos", Color::Cyan);
        options.searchable = true;
        assert!(draw(&t, &options).contains("/ para buscar"));

        options.search_input = Some("ana");
        assert!(draw(&t, &options).contains("Buscar: ana_"));
    }
}
