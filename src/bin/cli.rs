use std::io::{self, Write};
use task_table::{
    AlertReport, Cell, ColumnDef, ColumnType, FilterSession, FixedField, NewTask, SortKey,
    TableConfig, Task, Workspace,
};
use tracing_subscriber::EnvFilter;

const MAX_CELL_WIDTH: usize = 20;

fn fit_to_width(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else if width >= 4 {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{kept}...")
    } else {
        text.chars().take(width).collect()
    }
}

fn render_tasks_as_text_table(columns: &[ColumnDef], tasks: &[Task]) -> String {
    let col_names: Vec<String> = FixedField::ALL
        .iter()
        .map(|f| f.header().to_string())
        .chain(columns.iter().map(|c| c.name.clone()))
        .collect();
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            FixedField::ALL
                .iter()
                .map(|f| task.fixed_value(*f))
                .chain(task.cells.iter().map(Cell::render))
                .map(|s| fit_to_width(&s, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (ci, s) in row.iter().enumerate() {
            if ci < widths.len() && s.chars().count() > widths[ci] {
                widths[ci] = s.chars().count();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, cells: &[String]| {
        out.push('|');
        for (ci, w) in widths.iter().enumerate() {
            let s = cells.get(ci).map(String::as_str).unwrap_or("");
            out.push(' ');
            out.push_str(s);
            out.push_str(&" ".repeat(w.saturating_sub(s.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn show(ws: &Workspace) {
    let table = ws.table();
    println!("=== {} ===", table.name());
    println!("{}", render_tasks_as_text_table(table.columns(), table.tasks()));
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the table\n  addcol <name> <type>               Add a column (int|text|bool|float|date|link), default values\n  dropcol <name>                     Delete a column\n  add <name> | <priority> | <yyyy-mm-dd hh:mm> [| <cell>...]\n                                     Add a task; one cell per custom column\n  set <id> <field> <value...>        Update a fixed field or custom column\n  view <id> <field>                  Show the full value of one field\n  delete <id>                        Delete a task\n  sort <field|column|index>          Sort the table\n  filter <field> <value...>          Filter by a fixed field (starts a filter session)\n  cfilter <index> <value...>         Filter by custom column index\n  unfilter                           Undo the last filter\n  filtered                           Show the filtered tasks\n  endfilter                          Leave the filter session\n  stats                              Task count\n  undo                               Undo the last change\n  schedule                           Execution order by priority and deadline\n  alerts                             Upcoming deadlines by urgency\n  cleanup                            Remove tasks with status Completed\n  save <file>                        Save as CSV (.csv appended)\n  load <file>                        Load from CSV\n  quit|exit                          Exit"
    );
}

fn parse_id(s: Option<&str>) -> Option<u32> {
    s.and_then(|s| s.parse::<u32>().ok())
}

fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

/// Returns whether a task was added.
fn add_task(ws: &mut Workspace, args: &str) -> bool {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();
    if fields.len() < 3 || fields[0].is_empty() {
        println!("Usage: add <name> | <priority> | <yyyy-mm-dd hh:mm> [| <cell>...]");
        return false;
    }
    let columns = ws.table().columns().to_vec();
    let raw_cells = &fields[3..];
    if raw_cells.len() != columns.len() {
        println!("Expected {} custom value(s), got {}.", columns.len(), raw_cells.len());
        return false;
    }
    let mut cells = Vec::with_capacity(columns.len());
    for (column, raw) in columns.iter().zip(raw_cells) {
        match Cell::parse(column.column_type, raw) {
            Ok(cell) => cells.push(cell),
            Err(e) => {
                println!("Column '{}': {}", column.name, e);
                return false;
            }
        }
    }
    match ws.add_task(NewTask::new(fields[0], fields[1], fields[2]), cells) {
        Ok(id) => {
            println!("Task {id} added.");
            true
        }
        Err(e) => {
            println!("Error: {e}");
            false
        }
    }
}

fn print_alerts(report: &AlertReport) {
    match report {
        AlertReport::NothingUpcoming => println!("No upcoming tasks within a week."),
        AlertReport::Upcoming(alerts) => {
            for alert in alerts {
                println!(
                    "{}: Task #{} - \"{}\" | Deadline: {}",
                    alert.category, alert.task_id, alert.task_name, alert.deadline
                );
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => match TableConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {path}: {e}");
                std::process::exit(2);
            }
        },
        None => TableConfig::default(),
    };
    let mut ws = Workspace::with_config(config);
    // Dropped whenever the table changes so `filtered` never shows stale rows.
    let mut filter: Option<FilterSession> = None;

    println!("Task Table (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let mut parts = args.split_whitespace();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => show(&ws),
            "addcol" => match (parts.next(), parts.next().map(str::parse::<ColumnType>)) {
                (Some(name), Some(Ok(column_type))) => {
                    match ws.add_column_with_default(name, column_type) {
                        Ok(()) => {
                            filter = None;
                            println!("Column '{name}' added.");
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                (Some(_), Some(Err(e))) => println!("Error: {e}"),
                _ => println!("Usage: addcol <name> <type>"),
            },
            "dropcol" => match parts.next() {
                Some(name) => match ws.remove_column(name) {
                    Ok(_) => {
                        filter = None;
                        println!("Column '{name}' deleted.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: dropcol <name>"),
            },
            "add" => {
                if add_task(&mut ws, args) {
                    filter = None;
                }
            }
            "set" => {
                let id = parse_id(parts.next());
                let field = parts.next();
                let value = rest_of_line(parts);
                match (id, field) {
                    (Some(id), Some(field)) => match ws.update_field(id, field, &value) {
                        Ok(()) => {
                            filter = None;
                            println!("Update complete.");
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    _ => println!("Usage: set <id> <field> <value...>"),
                }
            }
            "view" => match (parse_id(parts.next()), parts.next()) {
                (Some(id), Some(field)) => match ws.table().view_field(id, field) {
                    Ok(value) => println!("{field}: {value}"),
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: view <id> <field>"),
            },
            "delete" => match parse_id(parts.next()) {
                Some(id) => match ws.delete_task(id) {
                    Ok(_) => {
                        filter = None;
                        println!("Deleted task {id}.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: delete <id>"),
            },
            "sort" => match parts.next() {
                Some(selector) => {
                    let key = SortKey::parse(selector, ws.table());
                    match key.and_then(|key| ws.sort_by(key)) {
                        Ok(()) => {
                            filter = None;
                            println!("Sorted successfully.");
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: sort <field|column|index>"),
            },
            "filter" => {
                let field = parts.next().and_then(FixedField::from_name);
                let value = rest_of_line(parts);
                match field {
                    Some(field) => {
                        let session = filter.get_or_insert_with(|| ws.filter_session());
                        let remaining = session.apply_fixed_filter(field, &value);
                        println!("{remaining} task(s) match.");
                    }
                    None => println!("Usage: filter <id|name|priority|deadline|status> <value...>"),
                }
            }
            "cfilter" => {
                let index = parts.next().and_then(|s| s.parse::<usize>().ok());
                let value = rest_of_line(parts);
                match index {
                    Some(index) => {
                        let session = filter.get_or_insert_with(|| ws.filter_session());
                        match session.apply_custom_filter(index, &value) {
                            Ok(remaining) => println!("{remaining} task(s) match."),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    None => println!("Usage: cfilter <index> <value...>"),
                }
            }
            "unfilter" => match filter.as_mut().map(FilterSession::undo_filter) {
                Some(Ok(())) => println!("Undid last filter."),
                Some(Err(e)) => println!("Error: {e}"),
                None => println!("No filter to undo."),
            },
            "filtered" => match &filter {
                Some(session) if !session.current_view().is_empty() => println!(
                    "{}",
                    render_tasks_as_text_table(ws.table().columns(), session.current_view())
                ),
                _ => println!("No tasks to show."),
            },
            "endfilter" => {
                filter = None;
                println!("Exiting filter mode.");
            }
            "stats" => println!("Total tasks: {}", ws.table().task_count()),
            "undo" => match ws.undo() {
                Ok(()) => {
                    filter = None;
                    println!("Undo successful.");
                }
                Err(e) => println!("Error: {e}"),
            },
            "schedule" => {
                for task in ws.schedule() {
                    println!(
                        "Task #{}: {} [Priority: {}, Deadline: {}, Status: {}]",
                        task.id, task.name, task.priority, task.deadline, task.status
                    );
                }
            }
            "alerts" => print_alerts(&ws.alerts()),
            "cleanup" => {
                let removed = ws.remove_completed();
                filter = None;
                println!("Removed {removed} completed task(s).");
            }
            "save" => match parts.next() {
                Some(path) => match ws.save_csv(path) {
                    Ok(written) => println!("Saved to {}", written.display()),
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: save <file>"),
            },
            "load" => match parts.next() {
                Some(path) => match ws.load_csv(path) {
                    Ok(()) => {
                        filter = None;
                        println!("Loaded successfully.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: load <file>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
