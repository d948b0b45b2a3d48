use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use caremart_cli::project::ResolvedProject;
use caremart_model::{Layer, SeedEntry, StageDiagnostics, TestReport, TestResult, TestStatus};

use crate::types::{RunOutcome, SeedStatus};

pub fn print_seed_summary(seeds: &[SeedEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Seed"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for seed in seeds {
        table.add_row(vec![
            relation_cell(seed.source.as_str()),
            Cell::new(seed.rows),
            Cell::new(seed.columns.len()),
            dim_cell(short_hash(&seed.sha256)),
        ]);
    }
    println!("{table}");
}

pub fn print_debug(project: &ResolvedProject, seeds: &[SeedStatus]) {
    let config_file = project
        .config_path
        .as_ref()
        .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
    let reference_date = project
        .reference_date
        .map_or_else(|| "today".to_string(), |d| d.to_string());
    let departments = if project.config.marts.departments.is_empty() {
        "-".to_string()
    } else {
        project.config.marts.departments.join(", ")
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Value")]);
    apply_table_style(&mut table);
    let rows = [
        ("project", project.config.name.clone()),
        ("config file", config_file),
        ("target", project.target_name.clone()),
        ("dataset", project.target.dataset.clone()),
        ("location", project.target.location.clone()),
        ("refresh", project.target.refresh.as_str().to_string()),
        ("seed dir", project.seed_dir.display().to_string()),
        ("output dir", project.output_dir.display().to_string()),
        ("reference date", reference_date),
        (
            "fiscal year start",
            project.config.vars.fiscal_year_start_month.to_string(),
        ),
        ("departments", departments),
    ];
    for (setting, value) in rows {
        table.add_row(vec![Cell::new(setting).fg(Color::Blue), Cell::new(value)]);
    }
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Seed file"), header_cell("Found")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for seed in seeds {
        let found = if seed.exists {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new("missing").fg(Color::Red)
        };
        table.add_row(vec![Cell::new(seed.path.display()), found]);
    }
    println!("{table}");
}

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Project: {} (target {})", outcome.project, outcome.target);
    println!("Reference date: {}", outcome.reference_date);
    if let Some(dir) = &outcome.output_dir {
        println!("Output: {}", dir.display());
    }
    if let Some(path) = &outcome.manifest {
        println!("Manifest: {}", path.display());
    }
    if let Some(path) = &outcome.run_results {
        println!("Run results: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Relation"),
        header_cell("Layer"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Rejected"),
        header_cell("Degraded"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_rows = 0usize;
    for entry in &outcome.relations {
        total_rows += entry.rows;
        let diagnostics = outcome
            .diagnostics
            .iter()
            .find(|d| d.relation == entry.name);
        let (rejected, degraded) = match diagnostics {
            Some(d) => (Some(d.rejected_rows()), Some(d.degraded_values())),
            None => (None, None),
        };
        table.add_row(vec![
            relation_cell(entry.name.as_str()),
            layer_cell(entry.layer),
            Cell::new(entry.rows),
            Cell::new(entry.columns.len()),
            count_cell(rejected, Color::Yellow),
            count_cell(degraded, Color::Yellow),
        ]);
    }
    let (rejected, degraded) = diagnostic_totals(&outcome.diagnostics);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(Some(rejected), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(degraded), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(report) = &outcome.tests {
        print_test_report(report);
    }
}

fn diagnostic_totals(diagnostics: &[StageDiagnostics]) -> (usize, usize) {
    diagnostics.iter().fold((0, 0), |(rejected, degraded), d| {
        (rejected + d.rejected_rows(), degraded + d.degraded_values())
    })
}

fn print_test_report(report: &TestReport) {
    println!();
    println!(
        "Data tests: {} passed, {} warned, {} failed",
        report.passed_count(),
        report.warning_count(),
        report.failure_count()
    );
    let mut failing: Vec<&TestResult> = report
        .results
        .iter()
        .filter(|result| result.status() != TestStatus::Pass)
        .collect();
    if failing.is_empty() {
        return;
    }
    failing.sort_by_key(|result| (status_rank(result.status()), result.name.clone()));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Test"),
        header_cell("Rows"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for result in failing {
        table.add_row(vec![
            status_cell(result.status()),
            Cell::new(&result.name),
            Cell::new(result.failures).fg(status_color(result.status())),
            Cell::new(result.message.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(110);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn short_hash(sha256: &str) -> String {
    sha256.chars().take(12).collect()
}

fn relation_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn layer_cell(layer: Layer) -> Cell {
    match layer {
        Layer::Staging => Cell::new(layer.as_str()),
        Layer::Mart => Cell::new(layer.as_str()).fg(Color::Magenta),
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn status_cell(status: TestStatus) -> Cell {
    match status {
        TestStatus::Fail => Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        TestStatus::Warn => Cell::new("WARN").fg(Color::Yellow),
        TestStatus::Pass => Cell::new("PASS").fg(Color::Green),
    }
}

fn status_rank(status: TestStatus) -> u8 {
    match status {
        TestStatus::Fail => 0,
        TestStatus::Warn => 1,
        TestStatus::Pass => 2,
    }
}

fn status_color(status: TestStatus) -> Color {
    match status {
        TestStatus::Fail => Color::Red,
        TestStatus::Warn => Color::Yellow,
        TestStatus::Pass => Color::Green,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
