use anyhow::Context;
use chrono::{NaiveDateTime, NaiveTime};
use clap::Parser;
use mockable::{Clock, DefaultClock};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::path::PathBuf;
use study_planner::{
    CsvTaskFile, PlannerConfig, PriorityOrder, TaskDraft, TaskPersistence, TaskStore,
    TimetableOptions, assistant, load_tasks_from_json, save_tasks_to_json,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "study-planner")]
#[command(about = "Record study tasks and lay them out as a timetable")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file holding the task list
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Do not write the task file after every change
    #[arg(long)]
    no_autosave: bool,

    /// Schedule priority 5 before priority 1
    #[arg(long)]
    lowest_first: bool,
}

/// Logs go to stderr so the REPL owns stdout.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "study_planner=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let mut col_names: Vec<String> = vec!["#".to_string()];
    col_names.extend(columns.iter().map(|c| c.name().to_string()));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut row = vec![(row_idx + 1).to_string()];
        for col in columns {
            let cell = match col.get(row_idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(AnyValue::Int32(v)) => v.to_string(),
                Ok(av) => av.to_string(),
            };
            row.push(cell);
        }
        rows.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the task table\n  list                               List tasks, one per line\n  add <subject> <H:MM> <priority> [deadline...]\n                                     Add a task (priority 1-5, 1 runs first)\n  delete <n>                         Delete task number n (see 'list')\n  clear                              Remove all tasks\n  save [path]                        Save tasks to the CSV file\n  load [path]                        Load tasks from the CSV file\n  export <path>                      Export tasks as JSON\n  import <path>                      Import tasks from JSON\n  generate [HH:MM] [json]            Generate a timetable starting now or at HH:MM\n  chat <text...>                     Ask the study assistant\n  quit|exit                          Exit"
    );
}

fn print_task_list(store: &TaskStore) {
    match store.tasks() {
        Ok(tasks) if tasks.is_empty() => println!("No tasks."),
        Ok(tasks) => {
            for (idx, task) in tasks.iter().enumerate() {
                println!("{:>3}. {}", idx + 1, task.list_line());
            }
        }
        Err(e) => println!("Error reading tasks: {}", e),
    }
}

fn autosave(store: &TaskStore, file: &CsvTaskFile, enabled: bool) {
    if !enabled {
        return;
    }
    match file.save_tasks(store) {
        Ok(()) => println!("Tasks saved!"),
        Err(e) => println!("Error saving tasks: {}", e),
    }
}

fn parse_start(arg: &str, clock: &impl Clock) -> Option<NaiveDateTime> {
    NaiveTime::parse_from_str(arg, "%H:%M")
        .ok()
        .map(|time| clock.local().date_naive().and_time(time))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match &cli.config {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if cli.no_autosave {
        config.autosave = false;
    }
    if cli.lowest_first {
        config.priority_order = PriorityOrder::LowestFirst;
    }
    let options: TimetableOptions = config.timetable_options()?;
    let clock = DefaultClock;

    let task_file = CsvTaskFile::new(config.data_file.clone());
    let mut store = match task_file.load_tasks() {
        Ok(Some(store)) => store,
        Ok(None) => TaskStore::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not load task file, starting empty with autosave off");
            println!("Error loading tasks: {}", e);
            if config.autosave {
                config.autosave = false;
                println!(
                    "Autosave is off for this session so {} is not overwritten. Use 'save <path>' to keep new tasks.",
                    task_file.path().display()
                );
            }
            TaskStore::new()
        }
    };

    println!("Smart Study Planner (CLI) - type 'help' for commands\n");
    println!("{}\n", assistant::WELCOME_MESSAGE);
    println!("{}", render_df_as_text_table(store.dataframe()));

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

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_df_as_text_table(store.dataframe())),
            "list" => print_task_list(&store),
            "add" => {
                let subject = parts.next();
                let duration = parts.next();
                let priority = parts.next();
                let deadline = parts.collect::<Vec<_>>().join(" ");
                match (subject, duration, priority) {
                    (Some(subject), Some(duration), Some(priority)) => {
                        let draft = TaskDraft::new(subject, duration, priority, deadline);
                        match store.add_task(&draft) {
                            Ok(task) => {
                                println!("Task added! {}", task.list_line());
                                autosave(&store, &task_file, config.autosave);
                            }
                            Err(e) => println!("Warning: {}", e),
                        }
                    }
                    _ => println!("Usage: add <subject> <H:MM> <priority> [deadline...]"),
                }
            }
            "delete" => match parts.next() {
                Some(n_s) => match n_s.parse::<usize>() {
                    Ok(n) if n >= 1 => match store.delete_task(n - 1) {
                        Ok(task) => {
                            println!("Task deleted! ({})", task.subject);
                            autosave(&store, &task_file, config.autosave);
                        }
                        Err(e) => println!("Error deleting task: {}", e),
                    },
                    _ => println!("Invalid task number"),
                },
                None => println!("Warning: Please select a task to delete. Usage: delete <n>"),
            },
            "clear" => {
                store.clear();
                println!("All tasks cleared!");
                autosave(&store, &task_file, config.autosave);
            }
            "save" => {
                let target = parts
                    .next()
                    .map(|path| CsvTaskFile::new(path))
                    .unwrap_or_else(|| task_file.clone());
                match target.save_tasks(&store) {
                    Ok(()) => println!("Tasks saved to {}.", target.path().display()),
                    Err(e) => println!("Error saving tasks: {}", e),
                }
            }
            "load" => {
                let source = parts
                    .next()
                    .map(|path| CsvTaskFile::new(path))
                    .unwrap_or_else(|| task_file.clone());
                match source.load_tasks() {
                    Ok(Some(loaded)) => {
                        store = loaded;
                        println!("Tasks loaded from {}.", source.path().display());
                        print_task_list(&store);
                    }
                    Ok(None) => println!("Warning: No tasks to load."),
                    Err(e) => println!("Error loading tasks: {}", e),
                }
            }
            "export" => match parts.next() {
                Some(path) => match save_tasks_to_json(&store, path) {
                    Ok(()) => println!("Tasks exported to {}.", path),
                    Err(e) => println!("Error exporting tasks: {}", e),
                },
                None => println!("Usage: export <path>"),
            },
            "import" => match parts.next() {
                Some(path) => match load_tasks_from_json(path) {
                    Ok(loaded) => {
                        store = loaded;
                        println!("Tasks imported from {}.", path);
                        print_task_list(&store);
                        autosave(&store, &task_file, config.autosave);
                    }
                    Err(e) => println!("Error importing tasks: {}", e),
                },
                None => println!("Usage: import <path>"),
            },
            "generate" => {
                let mut start = None;
                let mut as_json = false;
                let mut bad_arg = None;
                for arg in parts {
                    if arg == "json" {
                        as_json = true;
                    } else if let Some(at) = parse_start(arg, &clock) {
                        start = Some(at);
                    } else {
                        bad_arg = Some(arg);
                    }
                }
                if let Some(arg) = bad_arg {
                    println!("Invalid start time '{}' (HH:MM)", arg);
                    continue;
                }
                let start = start.unwrap_or_else(|| clock.local().naive_local());
                match store.generate_timetable(start, &options) {
                    Ok(timetable) if as_json => match serde_json::to_string_pretty(&timetable) {
                        Ok(json) => println!("{}", json),
                        Err(e) => println!("Error serializing timetable: {}", e),
                    },
                    Ok(timetable) => {
                        for diagnostic in timetable.diagnostics() {
                            println!("Warning: {}", diagnostic);
                        }
                        if !timetable.is_empty() {
                            print!("{}", timetable.render_text());
                            println!("({})", timetable.to_cli_summary());
                        }
                    }
                    Err(e) => println!("Error generating timetable: {}", e),
                }
            }
            "chat" => {
                let text = parts.collect::<Vec<_>>().join(" ");
                match assistant::respond(&text) {
                    Some(reply) => println!("You: {}\nAI: {}", text.to_lowercase(), reply),
                    None => println!("Usage: chat <text...>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}
